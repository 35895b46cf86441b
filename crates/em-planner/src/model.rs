//! Domain model shared between the scheduler, persistence and the API.
//!
//! Wire names follow the original client payloads (camelCase, enum values in
//! SCREAMING case, dates as `YYYY-MM-DD`), so a stored session round-trips
//! byte-compatible with what the calendar UI produces and consumes.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// First topic of the auto-generated final-review module. A module carrying
/// this marker is synthesized by the scheduler, never by the content
/// provider, and is regenerated on every pass instead of floating.
pub const FINAL_REVIEW_TOPIC: &str = "SIMULAZIONE";

/// Relative weight of a study module or summary unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// How the exam is administered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExamType {
    Written,
    Oral,
    Mixed,
}

/// Requested depth of the generated study material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DepthLevel {
    Basic,
    Medium,
    Advanced,
}

/// Question style used in probable-question lists and mock exams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    Open,
    Short,
    Connect,
}

/// One unit of study work, eligible for date assignment.
///
/// Despite the historical name "day" for the ordering field, a module is not
/// a calendar day: `day` is the authoring order the content provider emitted,
/// kept as the tie-break so repeated rebalances never shuffle topic order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyModule {
    /// Stable identity across rebalances; join key for drag-drop moves and
    /// completion toggles.
    pub uid: String,
    /// Original authoring order; floating modules are re-placed in this order.
    pub day: i32,
    pub topics: Vec<String>,
    pub tasks: Vec<String>,
    pub priority: Priority,
    /// Calendar day the module is currently scheduled on, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_date: Option<NaiveDate>,
    /// Per-task completion flags, parallel to `tasks`.
    #[serde(default)]
    pub completed_tasks: Vec<bool>,
    /// Set by a manual drag; cleared whenever the scheduler re-places the
    /// module itself.
    #[serde(default)]
    pub is_manually_placed: bool,
}

impl StudyModule {
    /// A locked module is never moved by the scheduler: pinned by hand,
    /// already in the past, or started (any task ticked off).
    ///
    /// This is the single source of truth for placement mutability; both the
    /// occupancy pre-pass and the floating partition go through it.
    pub fn is_locked(&self, today: NaiveDate) -> bool {
        self.is_manually_placed
            || self.assigned_date.is_some_and(|date| date < today)
            || self.completed_tasks.iter().any(|&done| done)
    }

    /// Whether this is the synthesized pre-exam review module.
    pub fn is_final_review(&self) -> bool {
        self.topics.first().map(String::as_str) == Some(FINAL_REVIEW_TOPIC)
    }

    /// Build the final-review module for a session, scheduled on `date`
    /// (the day before the exam).
    ///
    /// The uid is derived from the session id so the module keeps its
    /// identity across rebalances even though it is regenerated each pass.
    pub fn final_review(session_id: Uuid, date: NaiveDate) -> Self {
        Self {
            uid: format!("auto-sim-{session_id}"),
            day: 9999,
            topics: vec![FINAL_REVIEW_TOPIC.to_string()],
            tasks: vec![
                "[PRATICA] Simulazione d'Esame integrale - 3h".to_string(),
                "[PRATICA] Analisi finale - 2h".to_string(),
            ],
            priority: Priority::High,
            assigned_date: Some(date),
            completed_tasks: vec![false, false],
            is_manually_placed: false,
        }
    }
}

/// A condensed summary block of the uploaded material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryUnit {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub details: String,
    pub importance: Priority,
}

/// A question/answer pair for active recall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub difficulty: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}

/// A probable exam question with its model answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamQuestion {
    pub question: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub model_answer: String,
    #[serde(default)]
    pub grading_criteria: Vec<String>,
}

/// A timed mock exam generated on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockExam {
    pub title: String,
    pub instructions: String,
    pub questions: Vec<ExamQuestion>,
    pub time_minutes: i32,
}

/// Everything the content provider produced for a session, plus the study
/// plan the scheduler maintains.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyMaterial {
    #[serde(default)]
    pub summary: Vec<SummaryUnit>,
    #[serde(default)]
    pub questions: Vec<ExamQuestion>,
    #[serde(default)]
    pub flashcards: Vec<Flashcard>,
    #[serde(default)]
    pub study_plan: Vec<StudyModule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mock_exam: Option<MockExam>,
}

/// One tracked exam with its own material, study plan and exam date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamSession {
    pub id: Uuid,
    pub faculty: String,
    pub course: String,
    pub exam_type: ExamType,
    pub depth: DepthLevel,
    /// Calendar day of the exam. Globally blocked for studying while the
    /// session is active.
    pub exam_date: NaiveDate,
    /// Terminal: once passed, the session is excluded from all scheduling
    /// and returned untouched by every pass.
    #[serde(default)]
    pub is_passed: bool,
    /// Days the student opted out of studying for this session.
    #[serde(default)]
    pub day_offs: Vec<NaiveDate>,
    /// Calendar color slot assigned at creation.
    #[serde(default)]
    pub color_index: u8,
    /// Raw uploaded material, kept for incremental re-analysis.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub past_exams_content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update_date: Option<NaiveDate>,
    #[serde(rename = "data")]
    pub material: StudyMaterial,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn module() -> StudyModule {
        StudyModule {
            uid: "m1".to_string(),
            day: 1,
            topics: vec!["Topic".to_string()],
            tasks: vec!["[TEORIA] Read - 2h".to_string()],
            priority: Priority::Medium,
            assigned_date: None,
            completed_tasks: vec![],
            is_manually_placed: false,
        }
    }

    #[test]
    fn unassigned_untouched_module_is_floating() {
        assert!(!module().is_locked(date(2024, 6, 1)));
    }

    #[test]
    fn manually_placed_module_is_locked() {
        let m = StudyModule {
            is_manually_placed: true,
            ..module()
        };
        assert!(m.is_locked(date(2024, 6, 1)));
    }

    #[test]
    fn past_dated_module_is_locked() {
        let m = StudyModule {
            assigned_date: Some(date(2024, 5, 31)),
            ..module()
        };
        assert!(m.is_locked(date(2024, 6, 1)));
        // Today itself is not the past.
        let m = StudyModule {
            assigned_date: Some(date(2024, 6, 1)),
            ..module()
        };
        assert!(!m.is_locked(date(2024, 6, 1)));
    }

    #[test]
    fn started_module_is_locked() {
        let m = StudyModule {
            completed_tasks: vec![false, true],
            ..module()
        };
        assert!(m.is_locked(date(2024, 6, 1)));
    }

    #[test]
    fn final_review_detected_by_first_topic_only() {
        let review = StudyModule::final_review(Uuid::nil(), date(2024, 6, 9));
        assert!(review.is_final_review());

        let m = StudyModule {
            topics: vec!["Integrali".to_string(), FINAL_REVIEW_TOPIC.to_string()],
            ..module()
        };
        assert!(!m.is_final_review());
    }

    #[test]
    fn final_review_uid_is_stable_per_session() {
        let id = Uuid::new_v4();
        let a = StudyModule::final_review(id, date(2024, 6, 9));
        let b = StudyModule::final_review(id, date(2024, 6, 10));
        assert_eq!(a.uid, b.uid);
    }

    #[test]
    fn module_serializes_with_client_field_names() {
        let m = StudyModule {
            assigned_date: Some(date(2024, 6, 3)),
            ..module()
        };
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["assignedDate"], "2024-06-03");
        assert_eq!(json["isManuallyPlaced"], false);
        assert_eq!(json["priority"], "MEDIUM");
    }

    #[test]
    fn module_deserializes_with_sparse_fields() {
        let m: StudyModule = serde_json::from_str(
            r#"{"uid":"x","day":2,"topics":["T"],"tasks":["[PRATICA] Es. - 1h"],"priority":"HIGH"}"#,
        )
        .unwrap();
        assert_eq!(m.assigned_date, None);
        assert!(m.completed_tasks.is_empty());
        assert!(!m.is_manually_placed);
    }
}
