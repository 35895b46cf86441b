use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use uuid::Uuid;

use em_planner::{
    DepthLevel, ExamQuestion, ExamType, Flashcard, MockExam, Priority, StudyMaterial, StudyModule,
    SummaryUnit,
};

use super::{AnalysisRequest, ContentError, ContentProvider};
use crate::metrics;

/// Raw material forwarded per analysis call is capped; the provider does not
/// accept arbitrarily long prompts.
const MAX_ANALYSIS_CHARS: usize = 30_000;
const MAX_MOCK_CONTENT_CHARS: usize = 15_000;
const MAX_PAST_EXAMS_CHARS: usize = 5_000;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);
/// Quota responses are retried a couple of times with a flat pause before
/// surfacing as an error.
const QUOTA_RETRIES: u32 = 2;
const QUOTA_BACKOFF: Duration = Duration::from_secs(4);

/// HTTP client for the generative study-content service.
pub struct ContentClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    hours_pattern: Regex,
}

impl ContentClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            hours_pattern: Regex::new(r"(?i)\d+(?:\.\d+)?\s*h").unwrap(),
        }
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ContentError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);
        let mut retries_left = QUOTA_RETRIES;

        loop {
            let response = self
                .http
                .post(&url)
                .bearer_auth(&self.api_key)
                .timeout(REQUEST_TIMEOUT)
                .json(body)
                .send()
                .await?;

            let status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS {
                if retries_left == 0 {
                    metrics::record_content_event(path, false);
                    return Err(ContentError::QuotaExceeded);
                }
                retries_left -= 1;
                tracing::warn!("content provider quota hit, retrying {url}");
                tokio::time::sleep(QUOTA_BACKOFF).await;
                continue;
            }
            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                metrics::record_content_event(path, false);
                return Err(ContentError::InvalidApiKey);
            }
            if !status.is_success() {
                metrics::record_content_event(path, false);
                return Err(ContentError::UpstreamStatus(status));
            }

            metrics::record_content_event(path, true);
            return response
                .json::<T>()
                .await
                .map_err(|e| ContentError::MalformedResponse(e.to_string()));
        }
    }

    /// Promote raw generated modules into scheduler-ready ones: backfill
    /// uids, start every task as not-done, and patch missing duration
    /// estimates. The estimates are display data only; placement never reads
    /// them.
    fn finalize(&self, generated: GeneratedMaterial) -> StudyMaterial {
        let study_plan = generated
            .study_plan
            .into_iter()
            .map(|module| {
                let tasks: Vec<String> = module
                    .tasks
                    .into_iter()
                    .map(|task| self.ensure_duration(task))
                    .collect();

                StudyModule {
                    uid: module.uid.unwrap_or_else(generate_uid),
                    day: module.day,
                    topics: module.topics,
                    priority: module.priority,
                    assigned_date: None,
                    completed_tasks: vec![false; tasks.len()],
                    is_manually_placed: false,
                    tasks,
                }
            })
            .collect();

        StudyMaterial {
            summary: generated.summary,
            questions: generated.questions,
            flashcards: generated.flashcards,
            study_plan,
            mock_exam: None,
        }
    }

    /// The model occasionally emits tasks without a duration; append a
    /// default so the calendar's load summaries have something to sum.
    fn ensure_duration(&self, task: String) -> String {
        if self.hours_pattern.is_match(&task) {
            task
        } else {
            format!("{task} - 2h")
        }
    }
}

#[async_trait]
impl ContentProvider for ContentClient {
    async fn analyze_materials(
        &self,
        request: &AnalysisRequest,
    ) -> Result<StudyMaterial, ContentError> {
        let body = AnalyzeBody {
            content: truncate_chars(&request.content, MAX_ANALYSIS_CHARS),
            faculty: &request.faculty,
            course: &request.course,
            exam_type: request.exam_type,
            depth: request.depth,
            exam_date: request.exam_date.to_string(),
        };

        let generated: GeneratedMaterial = self.post_json("/v1/analyze", &body).await?;
        Ok(self.finalize(generated))
    }

    async fn generate_mock_exam(
        &self,
        content: &str,
        past_exams: &str,
        course: &str,
    ) -> Result<MockExam, ContentError> {
        let body = MockExamBody {
            content: truncate_chars(content, MAX_MOCK_CONTENT_CHARS),
            past_exams: truncate_chars(past_exams, MAX_PAST_EXAMS_CHARS),
            course,
        };

        self.post_json("/v1/mock-exam", &body).await
    }
}

fn generate_uid() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// Truncate to a character count without splitting a code point.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeBody<'a> {
    content: &'a str,
    faculty: &'a str,
    course: &'a str,
    exam_type: ExamType,
    depth: DepthLevel,
    exam_date: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MockExamBody<'a> {
    content: &'a str,
    past_exams: &'a str,
    course: &'a str,
}

/// Analysis payload as the provider returns it: module uids and completion
/// state may be missing and are filled in by [`ContentClient::finalize`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedMaterial {
    #[serde(default)]
    summary: Vec<SummaryUnit>,
    #[serde(default)]
    questions: Vec<ExamQuestion>,
    #[serde(default)]
    flashcards: Vec<Flashcard>,
    #[serde(default)]
    study_plan: Vec<GeneratedModule>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedModule {
    #[serde(default)]
    uid: Option<String>,
    day: i32,
    topics: Vec<String>,
    tasks: Vec<String>,
    priority: Priority,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ContentClient {
        ContentClient::new("http://localhost:9", "test-key")
    }

    #[test]
    fn tasks_without_estimates_get_a_default() {
        let c = client();
        assert_eq!(
            c.ensure_duration("[TEORIA] Limiti e continuità".to_string()),
            "[TEORIA] Limiti e continuità - 2h"
        );
        assert_eq!(
            c.ensure_duration("[PRATICA] Esercizi - 1.5h".to_string()),
            "[PRATICA] Esercizi - 1.5h"
        );
        assert_eq!(
            c.ensure_duration("[TEORIA] Ripasso - 2 H".to_string()),
            "[TEORIA] Ripasso - 2 H"
        );
    }

    #[test]
    fn finalize_backfills_uids_and_completion() {
        let generated = GeneratedMaterial {
            summary: vec![],
            questions: vec![],
            flashcards: vec![],
            study_plan: vec![
                GeneratedModule {
                    uid: None,
                    day: 1,
                    topics: vec!["Derivate".to_string()],
                    tasks: vec!["[TEORIA] Regole - 2h".to_string(), "[PRATICA] Es.".to_string()],
                    priority: Priority::High,
                },
                GeneratedModule {
                    uid: Some("keep-me".to_string()),
                    day: 2,
                    topics: vec!["Integrali".to_string()],
                    tasks: vec![],
                    priority: Priority::Low,
                },
            ],
        };

        let material = client().finalize(generated);
        let plan = &material.study_plan;

        assert_eq!(plan[0].uid.len(), 8);
        assert_eq!(plan[0].completed_tasks, vec![false, false]);
        assert_eq!(plan[0].tasks[1], "[PRATICA] Es. - 2h");
        assert_eq!(plan[0].assigned_date, None);
        assert_eq!(plan[1].uid, "keep-me");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("università", 7), "univers");
        assert_eq!(truncate_chars("breve", 100), "breve");
    }
}
