//! The full multi-session rebalancing pass.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::model::{ExamSession, StudyModule};
use crate::occupancy::Occupancy;

/// Safety bound on the window walk: a corrupt or reversed exam date must not
/// turn the pass into an unbounded loop.
pub const WINDOW_SCAN_LIMIT: usize = 180;

/// Recompute date assignments for every floating module across the whole
/// session set.
///
/// Pure and deterministic: the same input set and the same `today` always
/// produce the same output, and running the pass on its own output changes
/// nothing. Locked modules (see [`StudyModule::is_locked`]) keep their dates
/// and uids untouched; passed sessions are returned exactly as given.
///
/// Sessions are placed in exam-date order so earlier exams claim contested
/// days first, but the returned vector preserves the input order. The
/// occupancy accumulator is threaded explicitly through the pass: placements
/// made for an earlier exam are visible to every later one, including the
/// synthesized final-review modules, which count toward the per-day subject
/// cap for subsequent sessions.
///
/// Degenerate inputs (exam date in the past, every day blocked) leave the
/// affected floating modules unplaced rather than erroring; the function is
/// total over well-typed input.
pub fn rebalance(sessions: Vec<ExamSession>, today: NaiveDate) -> Vec<ExamSession> {
    if sessions.is_empty() {
        return sessions;
    }

    // Exam days of active sessions are blocked for studying globally, own
    // exam included.
    let blocked: HashSet<NaiveDate> = sessions
        .iter()
        .filter(|s| !s.is_passed)
        .map(|s| s.exam_date)
        .collect();

    // Locked placements claim their days before any floating module moves,
    // so manual pins and started work always take precedence.
    let mut occupancy = Occupancy::new();
    for session in &sessions {
        for module in &session.material.study_plan {
            if let Some(date) = module.assigned_date {
                if module.is_locked(today) {
                    occupancy.register(date, session.id);
                }
            }
        }
    }

    let mut indexed: Vec<(usize, ExamSession)> = sessions.into_iter().enumerate().collect();
    indexed.sort_by_key(|(_, s)| s.exam_date);

    let mut placed: Vec<(usize, ExamSession)> = Vec::with_capacity(indexed.len());
    for (position, session) in indexed {
        let session = if session.is_passed {
            session
        } else {
            let (session, next) = reschedule_session(session, today, &blocked, occupancy);
            occupancy = next;
            session
        };
        placed.push((position, session));
    }

    placed.sort_by_key(|(position, _)| *position);
    placed.into_iter().map(|(_, s)| s).collect()
}

/// Re-place one session's floating modules and synthesize its final-review
/// module, feeding every new placement back into the occupancy accumulator.
fn reschedule_session(
    mut session: ExamSession,
    today: NaiveDate,
    blocked: &HashSet<NaiveDate>,
    mut occupancy: Occupancy,
) -> (ExamSession, Occupancy) {
    let plan = std::mem::take(&mut session.material.study_plan);

    let (locked, rest): (Vec<StudyModule>, Vec<StudyModule>) =
        plan.into_iter().partition(|m| m.is_locked(today));

    // An unlocked review module is regenerated below, never carried as
    // floating work.
    let mut floating: Vec<StudyModule> = rest.into_iter().filter(|m| !m.is_final_review()).collect();
    floating.sort_by_key(|m| m.day);

    let window = available_dates(&session, today, blocked, &occupancy);

    let mut final_plan = locked;
    let count = floating.len();
    if count > 0 && !window.is_empty() {
        for (index, mut module) in floating.into_iter().enumerate() {
            // Spread over the whole window instead of front-loading: module i
            // of n lands at slot floor(i * len / n).
            let slot = ((index * window.len()) / count).min(window.len() - 1);
            module.assigned_date = Some(window[slot]);
            module.is_manually_placed = false;
            occupancy.register(window[slot], session.id);
            final_plan.push(module);
        }
    } else {
        // No room anywhere: carry the modules through unplaced so the plan
        // never silently loses work. Surfacing this is the caller's job.
        final_plan.extend(floating);
    }

    if let Some(review_date) = session.exam_date.pred_opt() {
        let already_planned = final_plan.iter().any(StudyModule::is_final_review);
        if !already_planned && !blocked.contains(&review_date) && review_date >= today {
            occupancy.register(review_date, session.id);
            final_plan.push(StudyModule::final_review(session.id, review_date));
        }
    }

    session.material.study_plan = final_plan;
    (session, occupancy)
}

/// Walk the calendar from `today` up to (excluding) the exam date, collecting
/// the days this session may still study on: not any active session's exam
/// day, not one of its own day-offs, and not a day already at the subject cap
/// unless the session itself is among the occupants.
///
/// The walk is capped at [`WINDOW_SCAN_LIMIT`] days.
fn available_dates(
    session: &ExamSession,
    today: NaiveDate,
    blocked: &HashSet<NaiveDate>,
    occupancy: &Occupancy,
) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut cursor = today;
    let mut steps = 0;

    while cursor < session.exam_date && steps < WINDOW_SCAN_LIMIT {
        let open = !blocked.contains(&cursor)
            && !session.day_offs.contains(&cursor)
            && occupancy.has_slot(cursor, session.id);
        if open {
            dates.push(cursor);
        }
        match cursor.succ_opt() {
            Some(next) => cursor = next,
            None => break,
        }
        steps += 1;
    }

    dates
}
