//! Study-plan scheduling engine for Exam Master.
//!
//! This crate owns the algorithmic core of the planner: given the full set of
//! exam sessions and a calendar day acting as "today", it (re)computes which
//! date every movable study module lands on. The pass is pure and synchronous:
//! no I/O, no clock reads, no async. Callers capture "today" once and thread
//! it through, so a pass that straddles midnight stays internally consistent.
//!
//! Two entry points:
//!
//! * [`rebalance()`](rebalance::rebalance) — the full multi-session pass, run
//!   after every structural mutation (add/remove/edit/drag/completion).
//!   Idempotent: re-running it on its own output with the same "today" is a
//!   no-op.
//! * [`seed_dates()`](seeding::seed_dates) — first-pass placement for a
//!   brand-new session, before it joins the set subject to full rebalancing.

pub mod model;
pub mod occupancy;
pub mod rebalance;
pub mod seeding;

pub use model::{
    DepthLevel, ExamQuestion, ExamSession, ExamType, FINAL_REVIEW_TOPIC, Flashcard, MockExam,
    Priority, QuestionType, StudyMaterial, StudyModule, SummaryUnit,
};
pub use occupancy::{MAX_SUBJECTS_PER_DAY, Occupancy};
pub use rebalance::rebalance;
pub use seeding::seed_dates;
