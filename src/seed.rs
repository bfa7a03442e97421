use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::models::{Exercise, Lesson, VocabularyItem};
use crate::store::{LessonStore, ProgressStore, StoreError};

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse seed file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Seed entry; `id` falls back to the 1-based position in the file.
#[derive(Deserialize, Debug, Clone)]
struct SeedLesson {
    id: Option<i64>,
    slug: String,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, alias = "vocab")]
    vocabulary: Vec<VocabularyItem>,
    #[serde(default)]
    exercises: Vec<Exercise>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub inserted: usize,
    pub skipped: usize,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ResetReport {
    pub cleared_progress: u64,
    pub cleared_lessons: u64,
    pub seeded: SeedReport,
}

pub fn parse_lessons(json: &str) -> Result<Vec<Lesson>, serde_json::Error> {
    let entries: Vec<SeedLesson> = serde_json::from_str(json)?;
    Ok(entries
        .into_iter()
        .zip(1i64..)
        .map(|(e, position)| Lesson {
            id: e.id.unwrap_or(position),
            slug: e.slug,
            title: e.title,
            description: e.description,
            vocabulary: e.vocabulary,
            exercises: e.exercises,
        })
        .collect())
}

/// Inserts lessons whose slug and id are both free; existing lessons are left as they are.
pub async fn seed_lessons(store: &dyn LessonStore, lessons: &[Lesson]) -> Result<SeedReport, SeedError> {
    let mut report = SeedReport::default();
    for lesson in lessons {
        if store.insert_lesson(lesson).await? {
            tracing::info!(slug = %lesson.slug, id = lesson.id, "seeded lesson");
            report.inserted += 1;
        } else {
            report.skipped += 1;
        }
    }
    Ok(report)
}

/// Wipes learner progress and all lessons, then seeds `lessons` into the empty store.
pub async fn reset_and_seed(
    lessons_store: &dyn LessonStore,
    progress_store: &dyn ProgressStore,
    lessons: &[Lesson],
) -> Result<ResetReport, SeedError> {
    // progress first, it refers to lesson ids
    let cleared_progress = progress_store.clear_progress().await?;
    let cleared_lessons = lessons_store.clear_lessons().await?;
    tracing::info!(cleared_progress, cleared_lessons, "cleared existing data");
    let seeded = seed_lessons(lessons_store, lessons).await?;
    Ok(ResetReport {
        cleared_progress,
        cleared_lessons,
        seeded,
    })
}

pub async fn read_seed_file(path: &Path) -> Result<Vec<Lesson>, SeedError> {
    let json = tokio::fs::read_to_string(path).await?;
    Ok(parse_lessons(&json)?)
}

pub async fn seed_from_file(store: &dyn LessonStore, path: &Path) -> Result<SeedReport, SeedError> {
    let lessons = read_seed_file(path).await?;
    seed_lessons(store, &lessons).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{BuiltinFixtures, FallbackLessons};
    use crate::store::MemoryStore;
    use chrono::Utc;

    const SEED: &str = r#"[
        {"slug": "basics-1", "title": "French Basics 1",
         "vocab": [{"id": 1, "french": "merci", "english": "thank you", "pronunciation": "mer-SEE"}],
         "exercises": [{"id": 1, "type": "translate", "question": "Translate to French: 'goodbye'",
                        "correctAnswer": "au revoir", "xpReward": 10}]},
        {"slug": "basics-2", "title": "French Basics 2", "description": "Numbers"},
        {"id": 7, "slug": "family", "title": "Family Members"}
    ]"#;

    #[test]
    fn ids_default_to_position() {
        let lessons = parse_lessons(SEED).unwrap();
        let ids: Vec<i64> = lessons.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1, 2, 7]);
        assert_eq!(lessons[0].vocabulary[0].french, "merci");
        assert!(lessons[1].exercises.is_empty());
    }

    #[tokio::test]
    async fn seeding_twice_skips_existing_slugs() {
        let store = MemoryStore::new();
        let lessons = parse_lessons(SEED).unwrap();
        let first = seed_lessons(&store, &lessons).await.unwrap();
        assert_eq!(first, SeedReport { inserted: 3, skipped: 0 });
        let second = seed_lessons(&store, &lessons).await.unwrap();
        assert_eq!(second, SeedReport { inserted: 0, skipped: 3 });
    }

    #[tokio::test]
    async fn new_slug_with_taken_id_is_skipped() {
        let store = MemoryStore::with_lessons(BuiltinFixtures.lessons());
        let extra = parse_lessons(r#"[{"slug": "travel", "title": "Travel"}]"#).unwrap();
        let report = seed_lessons(&store, &extra).await.unwrap();
        assert_eq!(report, SeedReport { inserted: 0, skipped: 1 });

        let ids: Vec<i64> = store.list_lessons().await.unwrap().iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert!(store.find_lesson("travel").await.unwrap().is_none());
        assert_eq!(store.find_lesson("1").await.unwrap().unwrap().slug, "basic-greetings");
    }

    #[tokio::test]
    async fn reset_replaces_lessons_and_drops_progress() {
        let store = MemoryStore::with_lessons(BuiltinFixtures.lessons());
        store.complete_lesson(1, 10, Utc::now()).await.unwrap();
        store.complete_lesson(2, 15, Utc::now()).await.unwrap();

        let lessons = parse_lessons(SEED).unwrap();
        let report = reset_and_seed(&store, &store, &lessons).await.unwrap();
        assert_eq!(
            report,
            ResetReport {
                cleared_progress: 2,
                cleared_lessons: 5,
                seeded: SeedReport { inserted: 3, skipped: 0 },
            }
        );
        assert!(store.list_progress().await.unwrap().is_empty());
        let slugs: Vec<String> = store.list_lessons().await.unwrap().into_iter().map(|l| l.slug).collect();
        assert_eq!(slugs, vec!["basics-1", "basics-2", "family"]);
        assert_eq!(store.find_lesson("1").await.unwrap().unwrap().title, "French Basics 1");
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let store = MemoryStore::new();
        let err = seed_from_file(&store, Path::new("does/not/exist.json")).await.unwrap_err();
        assert!(matches!(err, SeedError::Io(_)));
    }
}
