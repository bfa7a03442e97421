use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{query, query_as};
use uuid::Uuid;

use super::{parse_lesson_id, Completion, LessonStore, ProgressStore, StoreError};
use crate::db::Db;
use crate::models::{Lesson, LessonRow, ProgressRecord};

const LESSON_COLUMNS: &str = "id, slug, title, description, vocab, exercises";

#[derive(Clone)]
pub struct PgStore {
    db: Db,
}

impl PgStore {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub fn pool(&self) -> &Db {
        &self.db
    }
}

#[async_trait]
impl LessonStore for PgStore {
    async fn list_lessons(&self) -> Result<Vec<Lesson>, StoreError> {
        let rows =
            query_as::<_, LessonRow>(&format!("SELECT {LESSON_COLUMNS} FROM lessons ORDER BY id"))
                .fetch_all(&self.db)
                .await?;
        Ok(rows.into_iter().map(LessonRow::into_lesson).collect())
    }

    async fn find_lesson(&self, key: &str) -> Result<Option<Lesson>, StoreError> {
        let row =
            query_as::<_, LessonRow>(&format!("SELECT {LESSON_COLUMNS} FROM lessons WHERE slug = $1"))
                .bind(key)
                .fetch_optional(&self.db)
                .await?;
        if let Some(row) = row {
            return Ok(Some(row.into_lesson()));
        }

        let Some(id) = parse_lesson_id(key) else {
            return Ok(None);
        };
        let row =
            query_as::<_, LessonRow>(&format!("SELECT {LESSON_COLUMNS} FROM lessons WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.db)
                .await?;
        Ok(row.map(LessonRow::into_lesson))
    }

    async fn insert_lesson(&self, lesson: &Lesson) -> Result<bool, StoreError> {
        let res = query(
            r#"
            INSERT INTO lessons (id, slug, title, description, vocab, exercises)
            VALUES ($1,$2,$3,$4,$5,$6)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(lesson.id)
        .bind(&lesson.slug)
        .bind(&lesson.title)
        .bind(&lesson.description)
        .bind(Json(&lesson.vocabulary))
        .bind(Json(&lesson.exercises))
        .execute(&self.db)
        .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn clear_lessons(&self) -> Result<u64, StoreError> {
        let res = query("DELETE FROM lessons").execute(&self.db).await?;
        Ok(res.rows_affected())
    }
}

#[async_trait]
impl ProgressStore for PgStore {
    async fn list_progress(&self) -> Result<Vec<ProgressRecord>, StoreError> {
        let rows = query_as::<_, ProgressRecord>(
            r#"
            SELECT id, lesson_id, completed, xp_earned, completed_at
            FROM progress
            ORDER BY completed_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn complete_lesson(
        &self,
        lesson_id: i64,
        xp: i64,
        at: DateTime<Utc>,
    ) -> Result<Completion, StoreError> {
        // the unique index on lesson_id turns a repeat completion into zero rows
        let rec = query_as::<_, ProgressRecord>(
            r#"
            INSERT INTO progress (id, lesson_id, completed, xp_earned, completed_at)
            VALUES ($1,$2,TRUE,$3,$4)
            ON CONFLICT (lesson_id) DO NOTHING
            RETURNING id, lesson_id, completed, xp_earned, completed_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(lesson_id)
        .bind(xp)
        .bind(at)
        .fetch_optional(&self.db)
        .await?;

        Ok(match rec {
            Some(rec) => Completion::Created(rec),
            None => Completion::AlreadyCompleted,
        })
    }

    async fn clear_progress(&self) -> Result<u64, StoreError> {
        let res = query("DELETE FROM progress").execute(&self.db).await?;
        Ok(res.rows_affected())
    }
}
