#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tower::ServiceExt;

use lingua_server::fixtures::{BuiltinFixtures, FallbackLessons};
use lingua_server::models::{Lesson, ProgressRecord};
use lingua_server::state::AppState;
use lingua_server::store::{
    Completion, LessonStore, MemoryStore, ProgressStore, StoreError,
};

/// Store whose every call fails, standing in for an unreachable database.
pub struct DownStore;

#[async_trait]
impl LessonStore for DownStore {
    async fn list_lessons(&self) -> Result<Vec<Lesson>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn find_lesson(&self, _key: &str) -> Result<Option<Lesson>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn insert_lesson(&self, _lesson: &Lesson) -> Result<bool, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn clear_lessons(&self) -> Result<u64, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }
}

#[async_trait]
impl ProgressStore for DownStore {
    async fn list_progress(&self) -> Result<Vec<ProgressRecord>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn complete_lesson(
        &self,
        _lesson_id: i64,
        _xp: i64,
        _at: DateTime<Utc>,
    ) -> Result<Completion, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn clear_progress(&self) -> Result<u64, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }
}

pub fn memory_state() -> (AppState, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::with_lessons(BuiltinFixtures.lessons()));
    let state = AppState::new(store.clone(), store.clone(), Arc::new(BuiltinFixtures));
    (state, store)
}

pub fn memory_app() -> (Router, Arc<MemoryStore>) {
    let (state, store) = memory_state();
    (lingua_server::app(state), store)
}

pub fn down_app(fallback: Arc<dyn FallbackLessons>) -> Router {
    let store = Arc::new(DownStore);
    lingua_server::app(AppState::new(store.clone(), store, fallback))
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

pub async fn post_json(app: &Router, uri: &str, body: &str) -> (StatusCode, Vec<u8>) {
    let req = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}

pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

pub fn json(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap()
}
