use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use em_planner::{DepthLevel, ExamType};

/// Payload for creating a session from uploaded material.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    #[validate(length(min = 1, max = 255))]
    pub faculty: String,
    #[validate(length(min = 1, max = 255))]
    pub course: String,
    pub exam_type: ExamType,
    pub depth: DepthLevel,
    pub exam_date: NaiveDate,
    /// Raw study material to analyze.
    #[validate(length(min = 20, max = 200_000))]
    pub content: String,
    #[serde(default)]
    pub past_exams_content: String,
}

/// Payload for re-analyzing an existing session with an updated exam setup
/// and, optionally, additional material.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSessionRequest {
    pub exam_type: ExamType,
    pub depth: DepthLevel,
    pub exam_date: NaiveDate,
    /// Extra material; merged onto the stored text when long enough to
    /// matter, ignored otherwise.
    #[serde(default)]
    #[validate(length(max = 200_000))]
    pub content: String,
}

/// Target date of a manual drag.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveModuleRequest {
    pub date: NaiveDate,
}

/// Day to toggle in a session's day-off set.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayOffRequest {
    pub date: NaiveDate,
}
