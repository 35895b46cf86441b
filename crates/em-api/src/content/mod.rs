//! The generative content collaborator.
//!
//! The scheduler never talks to it; the API does, once per create/update, and
//! hands the resulting material to the orchestration layer. Behind the trait
//! sits whatever provider is configured — all the core needs is structured
//! study content with at minimum topics and tasks per module.

pub mod client;

pub use client::ContentClient;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use em_planner::{DepthLevel, ExamType, MockExam, StudyMaterial};

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("content provider quota exhausted")]
    QuotaExceeded,
    #[error("content provider rejected the configured API key")]
    InvalidApiKey,
    #[error("content provider returned status {0}")]
    UpstreamStatus(reqwest::StatusCode),
    #[error("content provider request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("content provider returned a malformed payload: {0}")]
    MalformedResponse(String),
}

/// Parameters of one material-analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub content: String,
    pub faculty: String,
    pub course: String,
    pub exam_type: ExamType,
    pub depth: DepthLevel,
    pub exam_date: NaiveDate,
}

#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Turn uploaded material into structured study content: summary units,
    /// probable questions, flashcards and an unscheduled module list. Module
    /// uids and completion arrays are filled in before the result is handed
    /// to the scheduler.
    async fn analyze_materials(
        &self,
        request: &AnalysisRequest,
    ) -> Result<StudyMaterial, ContentError>;

    /// Generate a timed mock exam from a session's material and past exam
    /// papers.
    async fn generate_mock_exam(
        &self,
        content: &str,
        past_exams: &str,
        course: &str,
    ) -> Result<MockExam, ContentError>;
}
