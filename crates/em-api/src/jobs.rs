//! Background jobs.
//!
//! The scheduler's "today" input advances at midnight: modules dated
//! yesterday flip to locked and every remaining float spreads over a window
//! one day shorter. Mutating requests each run their own pass, but an idle
//! server would otherwise serve a plan frozen on the day of the last
//! mutation — the daily job keeps the persisted set aligned with the
//! calendar.

use std::time::Duration;

use crate::{plan, state::ApiState};

/// Start all background jobs.
///
/// Returns the join handles so the caller can keep them alive for the
/// process lifetime.
pub fn start_background_jobs(state: ApiState) -> Vec<tokio::task::JoinHandle<()>> {
    vec![tokio::spawn(daily_rebalance_job(state))]
}

/// Re-run the full scheduling pass once a day.
async fn daily_rebalance_job(state: ApiState) {
    // Brief startup delay so the first pass doesn't race boot-time requests.
    tokio::time::sleep(Duration::from_secs(60)).await;

    let mut ticker = tokio::time::interval(Duration::from_secs(86_400));

    loop {
        ticker.tick().await;

        match plan::load_rebalanced(&state).await {
            Ok(sessions) => {
                tracing::info!("daily rebalance complete over {} sessions", sessions.len());
            }
            Err(e) => {
                tracing::error!("daily rebalance failed: {e}");
            }
        }
    }
}
