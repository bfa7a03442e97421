use std::sync::Arc;

use crate::fixtures::{BuiltinFixtures, FallbackLessons};
use crate::store::{LessonStore, MemoryStore, PgStore, ProgressStore};

#[derive(Clone)]
pub struct AppState {
    pub lessons: Arc<dyn LessonStore>,
    pub progress: Arc<dyn ProgressStore>,
    pub fallback: Arc<dyn FallbackLessons>,
}

impl AppState {
    pub fn new(
        lessons: Arc<dyn LessonStore>,
        progress: Arc<dyn ProgressStore>,
        fallback: Arc<dyn FallbackLessons>,
    ) -> Self {
        Self {
            lessons,
            progress,
            fallback,
        }
    }

    pub fn postgres(store: PgStore) -> Self {
        let store = Arc::new(store);
        Self::new(store.clone(), store, Arc::new(BuiltinFixtures))
    }

    /// In-memory store preloaded with the bundled lessons.
    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::with_lessons(BuiltinFixtures.lessons()));
        Self::new(store.clone(), store, Arc::new(BuiltinFixtures))
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn FallbackLessons>) -> Self {
        self.fallback = fallback;
        self
    }
}
