//! Mutation orchestration around the scheduling engine.
//!
//! Every structural change (create, delete, edit, manual drag, completion
//! toggle, day-off toggle) funnels through [`mutate_and_rebalance`]: load the
//! persisted set, apply the mutation, run one full rebalance, persist the
//! result. The persisted set is therefore always post-rebalance; a stale
//! pre-rebalance snapshot is never written.

use std::time::Instant;

use chrono::Local;

use em_db::repositories::sessions as session_repo;
use em_planner::{ExamSession, rebalance};

use crate::error::ApiError;
use crate::metrics;
use crate::state::ApiState;

/// Load the persisted set, rebalance it for the current day and persist the
/// result. Used on first load, by the explicit rebalance endpoint and by the
/// daily background job.
pub async fn load_rebalanced(state: &ApiState) -> Result<Vec<ExamSession>, ApiError> {
    mutate_and_rebalance(state, Ok).await
}

/// The single mutation path: load → mutate → rebalance → persist → return.
///
/// Passes serialize on the state's plan lock, so two rapid mutations (say,
/// two drags in a row) apply one after the other against fresh state and the
/// last full set wins. "Today" is captured once per pass and threaded through
/// the scheduler, keeping date comparisons consistent even when the pass
/// straddles midnight.
pub async fn mutate_and_rebalance<F>(
    state: &ApiState,
    mutate: F,
) -> Result<Vec<ExamSession>, ApiError>
where
    F: FnOnce(Vec<ExamSession>) -> Result<Vec<ExamSession>, ApiError>,
{
    let _guard = state.plan_lock.lock().await;

    let sessions = session_repo::load_all(&state.pool).await?;
    let mutated = mutate(sessions)?;

    let today = Local::now().date_naive();

    let started = Instant::now();
    let rebalanced = rebalance(mutated, today);
    metrics::record_rebalance(started.elapsed().as_secs_f64(), &rebalanced);

    session_repo::replace_all(&state.pool, &rebalanced).await?;

    Ok(rebalanced)
}
