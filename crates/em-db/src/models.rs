use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use em_planner::ExamSession;

/// One `exam_sessions` row.
///
/// The scalar columns mirror fields inside `payload`; `payload` is the source
/// of truth and the scalars exist for indexing and ad-hoc queries only.
#[derive(Debug, Clone, FromRow)]
pub struct SessionRow {
    /// Session id (also the payload's `id`)
    pub id: Uuid,
    /// Course name, denormalized for listing queries
    pub course: String,
    /// Exam calendar day, denormalized for date-range scans
    pub exam_date: NaiveDate,
    /// Terminal flag, denormalized for active-session filters
    pub is_passed: bool,
    /// Full session document as served by the API
    pub payload: Value,
    /// When the row was first inserted
    pub created_at: DateTime<Utc>,
    /// When the row was last rewritten
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<SessionRow> for ExamSession {
    type Error = serde_json::Error;

    fn try_from(row: SessionRow) -> Result<Self, Self::Error> {
        serde_json::from_value(row.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use em_planner::{DepthLevel, ExamType, StudyMaterial};

    #[test]
    fn row_payload_round_trips_into_a_session() {
        let session = ExamSession {
            id: Uuid::new_v4(),
            faculty: "Ingegneria".to_string(),
            course: "Analisi".to_string(),
            exam_type: ExamType::Written,
            depth: DepthLevel::Medium,
            exam_date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            is_passed: false,
            day_offs: vec![],
            color_index: 2,
            content: "testo".to_string(),
            past_exams_content: String::new(),
            created_at: Utc::now(),
            last_update_date: None,
            material: StudyMaterial::default(),
        };

        let row = SessionRow {
            id: session.id,
            course: session.course.clone(),
            exam_date: session.exam_date,
            is_passed: session.is_passed,
            payload: serde_json::to_value(&session).unwrap(),
            created_at: session.created_at,
            updated_at: session.created_at,
        };

        let restored = ExamSession::try_from(row).unwrap();
        assert_eq!(restored, session);
    }
}
