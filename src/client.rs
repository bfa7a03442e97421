//! HTTP client for the lesson API.
//!
//! Every call degrades to an empty or default value on failure so a UI built
//! on it always has something to render.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::learning::{overview, LessonOverview};
use crate::models::{Lesson, ProgressSummary};

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json(&self, path: &str) -> Result<Value, reqwest::Error> {
        self.http
            .get(self.url(path))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    pub async fn fetch_lessons(&self) -> Vec<Lesson> {
        let body = match self.get_json("/api/lessons").await {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(error = %e, "error fetching lessons");
                return Vec::new();
            }
        };
        if !body.is_array() {
            tracing::error!("invalid lessons data format");
            return Vec::new();
        }
        serde_json::from_value(body).unwrap_or_else(|e| {
            tracing::error!(error = %e, "invalid lesson entries");
            Vec::new()
        })
    }

    pub async fn fetch_lesson(&self, lesson_id: i64) -> Option<Lesson> {
        self.fetch_lessons()
            .await
            .into_iter()
            .find(|l| l.id == lesson_id)
    }

    pub async fn fetch_progress(&self) -> ProgressSummary {
        match self.get_json("/api/progress").await {
            Ok(body) => summary_from_value(&body),
            Err(e) => {
                tracing::error!(error = %e, "error fetching progress");
                ProgressSummary::default()
            }
        }
    }

    /// Returns whether the server acknowledged the completion.
    pub async fn mark_lesson_completed(&self, lesson_id: i64, xp: i64) -> bool {
        #[derive(Deserialize)]
        struct Ack {
            #[serde(default)]
            success: bool,
        }

        let sent = self
            .http
            .post(self.url("/api/progress"))
            .json(&json!({ "lessonId": lesson_id, "xp": xp }))
            .send()
            .await
            .and_then(|r| r.error_for_status());
        let ack = match sent {
            Ok(resp) => resp.json::<Ack>().await,
            Err(e) => Err(e),
        };
        match ack {
            Ok(ack) => ack.success,
            Err(e) => {
                tracing::error!(error = %e, lesson_id, "error marking lesson as completed");
                false
            }
        }
    }

    /// Lessons with unlock status derived from progress fetched in the same call.
    pub async fn lesson_overview(&self) -> Vec<LessonOverview> {
        let (lessons, summary) = tokio::join!(self.fetch_lessons(), self.fetch_progress());
        overview(lessons, &summary)
    }
}

// Field-by-field so one bad field does not discard the others.
fn summary_from_value(body: &Value) -> ProgressSummary {
    let completed_lessons = body
        .get("completedLessons")
        .and_then(Value::as_array)
        .map(|ids| ids.iter().filter_map(Value::as_i64).collect())
        .unwrap_or_default();
    ProgressSummary {
        completed_lessons,
        total_xp: body.get("totalXP").and_then(Value::as_i64).unwrap_or(0),
        streak: body
            .get("streak")
            .and_then(Value::as_u64)
            .and_then(|s| u32::try_from(s).ok())
            .unwrap_or(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_fields_default_independently() {
        let s = summary_from_value(&json!({"completedLessons": "oops", "totalXP": 25, "streak": -1}));
        assert_eq!(
            s,
            ProgressSummary { completed_lessons: vec![], total_xp: 25, streak: 0 }
        );
        assert_eq!(summary_from_value(&json!(null)), ProgressSummary::default());
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:8081/");
        assert_eq!(client.url("/api/lessons"), "http://localhost:8081/api/lessons");
    }
}
