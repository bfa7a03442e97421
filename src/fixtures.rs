//! Lessons served when the lesson store cannot be reached.

use crate::models::Lesson;

const BUILTIN_LESSONS: &str = include_str!("../data/lessons.json");

/// Source of the lesson set used in place of the store on storage failure.
pub trait FallbackLessons: Send + Sync {
    fn lessons(&self) -> Vec<Lesson>;

    /// Same key semantics as `LessonStore::find_lesson`.
    fn find(&self, key: &str) -> Option<Lesson> {
        let lessons = self.lessons();
        let id = key.trim().parse::<i64>().ok();
        let pos = lessons
            .iter()
            .position(|l| l.slug == key)
            .or_else(|| id.and_then(|id| lessons.iter().position(|l| l.id == id)))?;
        lessons.into_iter().nth(pos)
    }
}

/// The lesson set bundled with the binary (`data/lessons.json`).
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinFixtures;

impl FallbackLessons for BuiltinFixtures {
    fn lessons(&self) -> Vec<Lesson> {
        match serde_json::from_str(BUILTIN_LESSONS) {
            Ok(lessons) => lessons,
            Err(e) => {
                tracing::error!(error = %e, "bundled lesson fixtures are invalid");
                Vec::new()
            }
        }
    }
}

/// A fixed lesson set supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct StaticLessons(pub Vec<Lesson>);

impl FallbackLessons for StaticLessons {
    fn lessons(&self) -> Vec<Lesson> {
        self.0.clone()
    }
}
