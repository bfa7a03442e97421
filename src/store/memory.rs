use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{parse_lesson_id, Completion, LessonStore, ProgressStore, StoreError};
use crate::models::{Lesson, ProgressRecord};

#[derive(Default)]
pub struct MemoryStore {
    lessons: RwLock<Vec<Lesson>>,
    progress: RwLock<Vec<ProgressRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lessons(mut lessons: Vec<Lesson>) -> Self {
        lessons.sort_by_key(|l| l.id);
        Self {
            lessons: RwLock::new(lessons),
            progress: RwLock::default(),
        }
    }

    pub async fn progress_len(&self) -> usize {
        self.progress.read().await.len()
    }
}

#[async_trait]
impl LessonStore for MemoryStore {
    async fn list_lessons(&self) -> Result<Vec<Lesson>, StoreError> {
        Ok(self.lessons.read().await.clone())
    }

    async fn find_lesson(&self, key: &str) -> Result<Option<Lesson>, StoreError> {
        let lessons = self.lessons.read().await;
        let by_slug = lessons.iter().find(|l| l.slug == key);
        let found = by_slug.or_else(|| {
            parse_lesson_id(key).and_then(|id| lessons.iter().find(|l| l.id == id))
        });
        Ok(found.cloned())
    }

    async fn insert_lesson(&self, lesson: &Lesson) -> Result<bool, StoreError> {
        let mut lessons = self.lessons.write().await;
        if lessons.iter().any(|l| l.id == lesson.id || l.slug == lesson.slug) {
            return Ok(false);
        }
        let at = lessons.partition_point(|l| l.id < lesson.id);
        lessons.insert(at, lesson.clone());
        Ok(true)
    }

    async fn clear_lessons(&self) -> Result<u64, StoreError> {
        let mut lessons = self.lessons.write().await;
        let removed = lessons.len() as u64;
        lessons.clear();
        Ok(removed)
    }
}

#[async_trait]
impl ProgressStore for MemoryStore {
    async fn list_progress(&self) -> Result<Vec<ProgressRecord>, StoreError> {
        let mut records = self.progress.read().await.clone();
        records.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        Ok(records)
    }

    async fn complete_lesson(
        &self,
        lesson_id: i64,
        xp: i64,
        at: DateTime<Utc>,
    ) -> Result<Completion, StoreError> {
        // check and insert under one write lock
        let mut progress = self.progress.write().await;
        if progress.iter().any(|r| r.lesson_id == lesson_id && r.completed) {
            return Ok(Completion::AlreadyCompleted);
        }
        let record = ProgressRecord {
            id: Uuid::new_v4(),
            lesson_id,
            completed: true,
            xp_earned: xp,
            completed_at: at,
        };
        progress.push(record.clone());
        Ok(Completion::Created(record))
    }

    async fn clear_progress(&self) -> Result<u64, StoreError> {
        let mut progress = self.progress.write().await;
        let removed = progress.len() as u64;
        progress.clear();
        Ok(removed)
    }
}
