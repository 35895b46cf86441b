use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use chrono::{Local, Utc};
use uuid::Uuid;
use validator::Validate;

use em_db::repositories::sessions as session_repo;
use em_planner::{ExamSession, MockExam, StudyModule, seed_dates};

use crate::{
    content::AnalysisRequest, error::ApiError, plan, state::ApiState, validation,
};

use super::model::{
    CreateSessionRequest, DayOffRequest, MoveModuleRequest, UpdateSessionRequest,
};

/// Number of calendar color slots the frontend cycles through.
const COLOR_SLOTS: usize = 6;

/// Create the session routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/sessions", get(list_sessions))
        .route("/sessions", post(create_session))
        .route("/sessions/{id}", put(update_session))
        .route("/sessions/{id}", delete(delete_session))
        .route("/sessions/{id}/passed", post(mark_passed))
        .route("/sessions/{id}/modules/{uid}/move", post(move_module))
        .route(
            "/sessions/{id}/modules/{uid}/tasks/{index}/toggle",
            post(toggle_task),
        )
        .route("/sessions/{id}/day-offs/toggle", post(toggle_day_off))
        .route("/sessions/{id}/mock-exam", post(generate_mock_exam))
        .route("/rebalance", post(rebalance_plan))
}

/// Return the full session set, rebalanced for the current day before first
/// render. Persists the post-rebalance set so what the client sees is what
/// is stored.
async fn list_sessions(State(state): State<ApiState>) -> Result<Json<Vec<ExamSession>>, ApiError> {
    let sessions = plan::load_rebalanced(&state).await?;
    Ok(Json(sessions))
}

/// Analyze uploaded material into a new session, seed its first-pass dates
/// and fold it into the globally rebalanced plan.
async fn create_session(
    State(state): State<ApiState>,
    Json(payload): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<Vec<ExamSession>>), ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;
    let today = Local::now().date_naive();
    validation::validate_exam_date(payload.exam_date, today)?;

    // The provider round-trip is slow; run it before touching the plan so the
    // lock is only held for the cheap part.
    let request = AnalysisRequest {
        content: payload.content.clone(),
        faculty: payload.faculty.clone(),
        course: payload.course.clone(),
        exam_type: payload.exam_type,
        depth: payload.depth,
        exam_date: payload.exam_date,
    };
    let material = state.content.analyze_materials(&request).await?;

    let sessions = plan::mutate_and_rebalance(&state, move |mut sessions| {
        let session = ExamSession {
            id: Uuid::new_v4(),
            faculty: payload.faculty,
            course: payload.course,
            exam_type: payload.exam_type,
            depth: payload.depth,
            exam_date: payload.exam_date,
            is_passed: false,
            day_offs: vec![],
            color_index: (sessions.len() % COLOR_SLOTS) as u8,
            content: payload.content,
            past_exams_content: payload.past_exams_content,
            created_at: Utc::now(),
            last_update_date: None,
            material,
        };

        sessions.push(seed_dates(session, today));
        Ok(sessions)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(sessions)))
}

/// Re-analyze a session with an updated exam setup and optional new material.
///
/// New text is merged onto a truncated base of the stored material rather
/// than replacing it, so incremental uploads accumulate.
async fn update_session(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSessionRequest>,
) -> Result<Json<Vec<ExamSession>>, ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;
    let today = Local::now().date_naive();
    validation::validate_exam_date(payload.exam_date, today)?;

    // Merge against the currently stored text. Only this endpoint rewrites
    // the material text, so reading it outside the plan lock is safe.
    let sessions = session_repo::load_all(&state.pool).await?;
    let existing = sessions
        .iter()
        .find(|s| s.id == id)
        .ok_or_else(|| ApiError::NotFound(format!("session {id}")))?;

    let merged = if payload.content.trim().len() > 20 {
        let base: String = existing.content.chars().take(10_000).collect();
        format!("{base}\n\n[UPDATE]\n{}", payload.content)
    } else {
        existing.content.clone()
    };

    let request = AnalysisRequest {
        content: merged.clone(),
        faculty: existing.faculty.clone(),
        course: existing.course.clone(),
        exam_type: payload.exam_type,
        depth: payload.depth,
        exam_date: payload.exam_date,
    };
    let material = state.content.analyze_materials(&request).await?;

    let sessions = plan::mutate_and_rebalance(&state, move |mut sessions| {
        let session = find_session_mut(&mut sessions, id)?;
        session.exam_type = payload.exam_type;
        session.depth = payload.depth;
        session.exam_date = payload.exam_date;
        session.content = merged;
        session.material = material;
        session.last_update_date = Some(today);
        Ok(sessions)
    })
    .await?;

    Ok(Json(sessions))
}

/// Remove a session; the freed days are redistributed immediately.
async fn delete_session(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ExamSession>>, ApiError> {
    let sessions = plan::mutate_and_rebalance(&state, move |mut sessions| {
        let before = sessions.len();
        sessions.retain(|s| s.id != id);
        if sessions.len() == before {
            return Err(ApiError::NotFound(format!("session {id}")));
        }
        Ok(sessions)
    })
    .await?;

    Ok(Json(sessions))
}

/// Mark a session passed. Terminal: its modules never move again and its
/// exam day stops blocking the others, so the rest of the plan relaxes.
async fn mark_passed(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ExamSession>>, ApiError> {
    let sessions = plan::mutate_and_rebalance(&state, move |mut sessions| {
        let session = find_session_mut(&mut sessions, id)?;
        session.is_passed = true;
        Ok(sessions)
    })
    .await?;

    Ok(Json(sessions))
}

/// Manual drag: pin a module to a date, then rebalance everything else
/// around it.
async fn move_module(
    State(state): State<ApiState>,
    Path((id, uid)): Path<(Uuid, String)>,
    Json(payload): Json<MoveModuleRequest>,
) -> Result<Json<Vec<ExamSession>>, ApiError> {
    let sessions = plan::mutate_and_rebalance(&state, move |mut sessions| {
        let session = find_session_mut(&mut sessions, id)?;
        let module = find_module_mut(session, &uid)?;
        module.assigned_date = Some(payload.date);
        module.is_manually_placed = true;
        Ok(sessions)
    })
    .await?;

    Ok(Json(sessions))
}

/// Toggle one task's completion flag. A module with any task done is locked
/// in place, so this converts floating work into an anchor.
async fn toggle_task(
    State(state): State<ApiState>,
    Path((id, uid, index)): Path<(Uuid, String, usize)>,
) -> Result<Json<Vec<ExamSession>>, ApiError> {
    let sessions = plan::mutate_and_rebalance(&state, move |mut sessions| {
        let session = find_session_mut(&mut sessions, id)?;
        let module = find_module_mut(session, &uid)?;
        validation::validate_task_index(index, module.tasks.len())?;

        if module.completed_tasks.len() < module.tasks.len() {
            module.completed_tasks.resize(module.tasks.len(), false);
        }
        module.completed_tasks[index] = !module.completed_tasks[index];
        Ok(sessions)
    })
    .await?;

    Ok(Json(sessions))
}

/// Toggle a day in the session's day-off set and reflow its plan around it.
async fn toggle_day_off(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DayOffRequest>,
) -> Result<Json<Vec<ExamSession>>, ApiError> {
    let sessions = plan::mutate_and_rebalance(&state, move |mut sessions| {
        let session = find_session_mut(&mut sessions, id)?;
        if let Some(position) = session.day_offs.iter().position(|d| *d == payload.date) {
            session.day_offs.remove(position);
        } else {
            session.day_offs.push(payload.date);
        }
        Ok(sessions)
    })
    .await?;

    Ok(Json(sessions))
}

/// Generate and store a mock exam for a session. Not a structural change:
/// module placement is untouched, so no rebalance runs.
async fn generate_mock_exam(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MockExam>, ApiError> {
    let sessions = session_repo::load_all(&state.pool).await?;
    let session = sessions
        .iter()
        .find(|s| s.id == id)
        .ok_or_else(|| ApiError::NotFound(format!("session {id}")))?;

    let exam = state
        .content
        .generate_mock_exam(&session.content, &session.past_exams_content, &session.course)
        .await?;

    {
        let _guard = state.plan_lock.lock().await;
        let mut sessions = session_repo::load_all(&state.pool).await?;
        let session = find_session_mut(&mut sessions, id)?;
        session.material.mock_exam = Some(exam.clone());
        session_repo::replace_all(&state.pool, &sessions).await?;
    }

    Ok(Json(exam))
}

/// Explicit full rebalance, for the calendar's refresh control.
async fn rebalance_plan(
    State(state): State<ApiState>,
) -> Result<Json<Vec<ExamSession>>, ApiError> {
    let sessions = plan::load_rebalanced(&state).await?;
    Ok(Json(sessions))
}

fn find_session_mut(sessions: &mut [ExamSession], id: Uuid) -> Result<&mut ExamSession, ApiError> {
    sessions
        .iter_mut()
        .find(|s| s.id == id)
        .ok_or_else(|| ApiError::NotFound(format!("session {id}")))
}

fn find_module_mut<'a>(
    session: &'a mut ExamSession,
    uid: &str,
) -> Result<&'a mut StudyModule, ApiError> {
    session
        .material
        .study_plan
        .iter_mut()
        .find(|m| m.uid == uid)
        .ok_or_else(|| ApiError::NotFound(format!("module {uid}")))
}
