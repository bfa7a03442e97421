use axum::{
    body::Bytes,
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;

use crate::{
    error::ApiError,
    models::*,
    state::AppState,
    store::Completion,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        // lesson catalog
        .route("/api/lessons", get(list_lessons))
        .route("/api/lessons/:slug", get(get_lesson))
        // learner progress
        .route("/api/progress", get(get_progress).post(complete_lesson))
        .with_state(state)
}

async fn list_lessons(State(state): State<AppState>) -> Json<Vec<Lesson>> {
    match state.lessons.list_lessons().await {
        Ok(lessons) => Json(lessons),
        Err(e) => {
            tracing::warn!(error = %e, "lesson store unavailable, serving fallback lessons");
            Json(state.fallback.lessons())
        }
    }
}

async fn get_lesson(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Lesson>, ApiError> {
    let found = match state.lessons.find_lesson(&slug).await {
        Ok(found) => found,
        Err(e) => {
            tracing::warn!(error = %e, %slug, "lesson store unavailable, using fallback lessons");
            state.fallback.find(&slug)
        }
    };
    found.map(Json).ok_or(ApiError::NotFound)
}

async fn get_progress(State(state): State<AppState>) -> Json<ProgressSummary> {
    match state.progress.list_progress().await {
        Ok(records) => Json(ProgressSummary::from_records(&records)),
        Err(e) => {
            tracing::warn!(error = %e, "progress store unavailable, returning empty progress");
            Json(ProgressSummary::default())
        }
    }
}

async fn complete_lesson(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<CompleteLessonResp>, ApiError> {
    let req = parse_completion(&body)?;
    let lesson_id = req
        .lesson_id
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::bad_request("lessonId required"))?;
    let xp = req.xp.unwrap_or(DEFAULT_XP);
    if xp < 0 {
        return Err(ApiError::bad_request("xp must not be negative"));
    }

    let resp = match state.progress.complete_lesson(lesson_id, xp, Utc::now()).await {
        Ok(Completion::Created(progress)) => {
            tracing::info!(lesson_id, xp, "lesson completed");
            CompleteLessonResp {
                success: true,
                progress: Some(progress),
                message: None,
            }
        }
        Ok(Completion::AlreadyCompleted) => {
            tracing::debug!(lesson_id, "lesson already completed");
            CompleteLessonResp {
                success: true,
                progress: None,
                message: Some("Lesson already completed".into()),
            }
        }
        Err(e) => {
            // forward progress is never blocked on storage
            tracing::error!(error = %e, lesson_id, "failed to persist lesson completion");
            CompleteLessonResp {
                success: true,
                progress: None,
                message: Some("Progress saved (database unavailable)".into()),
            }
        }
    };
    Ok(Json(resp))
}

fn parse_completion(body: &[u8]) -> Result<CompleteLessonReq, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(CompleteLessonReq::default());
    }
    // a JSON `null` carries no fields, same as an empty body
    serde_json::from_slice::<Option<CompleteLessonReq>>(body)
        .map(Option::unwrap_or_default)
        .map_err(|e| ApiError::bad_request(format!("invalid request body: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_parses_as_missing_fields() {
        let req = parse_completion(b"  ").unwrap();
        assert!(req.lesson_id.is_none());
        assert!(req.xp.is_none());
    }

    #[test]
    fn null_body_parses_as_missing_fields() {
        let req = parse_completion(b"null").unwrap();
        assert!(req.lesson_id.is_none());
    }

    #[test]
    fn malformed_body_is_a_bad_request() {
        assert!(matches!(parse_completion(b"{lessonId"), Err(ApiError::BadRequest(_))));
        assert!(matches!(
            parse_completion(br#"{"lessonId":"one"}"#),
            Err(ApiError::BadRequest(_))
        ));
    }
}
