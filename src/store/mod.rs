//! Storage seams for lesson content and learner progress.
//!
//! Handlers only see the traits; `PgStore` backs production and
//! `MemoryStore` backs local runs without a database and the tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{Lesson, ProgressRecord};

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Outcome of recording a lesson completion.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Created(ProgressRecord),
    AlreadyCompleted,
}

#[async_trait]
pub trait LessonStore: Send + Sync {
    /// All lessons ordered by id.
    async fn list_lessons(&self) -> Result<Vec<Lesson>, StoreError>;

    /// Lookup by slug, then by numeric id when `key` parses as one.
    async fn find_lesson(&self, key: &str) -> Result<Option<Lesson>, StoreError>;

    /// Inserts the lesson unless its slug or id is taken. Returns whether a row was written.
    async fn insert_lesson(&self, lesson: &Lesson) -> Result<bool, StoreError>;

    /// Removes every lesson. Returns how many were deleted.
    async fn clear_lessons(&self) -> Result<u64, StoreError>;
}

#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// All records, most recent completion first.
    async fn list_progress(&self) -> Result<Vec<ProgressRecord>, StoreError>;

    /// Records a completion at most once per lesson.
    async fn complete_lesson(
        &self,
        lesson_id: i64,
        xp: i64,
        at: DateTime<Utc>,
    ) -> Result<Completion, StoreError>;

    /// Removes every progress record. Returns how many were deleted.
    async fn clear_progress(&self) -> Result<u64, StoreError>;
}

pub(crate) fn parse_lesson_id(key: &str) -> Option<i64> {
    key.trim().parse::<i64>().ok()
}
