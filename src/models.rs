use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

/// XP credited when a completion or an exercise carries no explicit reward.
pub const DEFAULT_XP: i64 = 10;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: i64,
    pub slug: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, alias = "vocab")]
    pub vocabulary: Vec<VocabularyItem>,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VocabularyItem {
    pub id: i64,
    pub french: String,
    pub english: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseKind {
    #[serde(rename = "mcq", alias = "multiple-choice")]
    MultipleChoice,
    #[serde(rename = "translate", alias = "translation")]
    Translate,
    #[serde(rename = "listening")]
    Listening,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: ExerciseKind,
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    pub correct_answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xp_reward: Option<i64>,
}

impl Exercise {
    /// A missing or zero reward grants `DEFAULT_XP`.
    pub fn reward(&self) -> i64 {
        self.xp_reward.filter(|xp| *xp != 0).unwrap_or(DEFAULT_XP)
    }
}

// Raw row; vocab/exercises are JSONB and decoded leniently in `into_lesson`.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct LessonRow {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub vocab: sqlx::types::Json<serde_json::Value>,
    pub exercises: sqlx::types::Json<serde_json::Value>,
}

impl LessonRow {
    pub fn into_lesson(self) -> Lesson {
        Lesson {
            vocabulary: decode_list(self.vocab.0, self.id, "vocab"),
            exercises: decode_list(self.exercises.0, self.id, "exercises"),
            id: self.id,
            slug: self.slug,
            title: self.title,
            description: self.description,
        }
    }
}

/// Decodes a JSON column that is expected to hold an array.
///
/// Anything that is not an array decodes to an empty list, and elements that
/// do not fit `T` are dropped.
pub fn decode_list<T: DeserializeOwned>(value: serde_json::Value, lesson_id: i64, column: &str) -> Vec<T> {
    let items = match value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Null => return Vec::new(),
        _ => {
            tracing::warn!(lesson_id, column, "stored value is not a list, treating as empty");
            return Vec::new();
        }
    };
    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::warn!(lesson_id, column, index, error = %e, "skipping undecodable entry");
                None
            }
        })
        .collect()
}

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub id: Uuid,
    pub lesson_id: i64,
    pub completed: bool,
    pub xp_earned: i64,
    pub completed_at: DateTime<Utc>,
}

/// Aggregate view served by `GET /api/progress`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressSummary {
    #[serde(rename = "completedLessons", default)]
    pub completed_lessons: Vec<i64>,
    #[serde(rename = "totalXP", default)]
    pub total_xp: i64,
    #[serde(default)]
    pub streak: u32,
}

impl ProgressSummary {
    /// Expects records most-recent-first and keeps that order.
    pub fn from_records(records: &[ProgressRecord]) -> Self {
        let mut completed_lessons: Vec<i64> = Vec::new();
        for r in records.iter().filter(|r| r.completed) {
            if !completed_lessons.contains(&r.lesson_id) {
                completed_lessons.push(r.lesson_id);
            }
        }
        Self {
            completed_lessons,
            total_xp: records.iter().map(|r| r.xp_earned).sum(),
            // no streak definition yet; always reported as zero
            streak: 0,
        }
    }

    pub fn completed_count(&self) -> usize {
        self.completed_lessons.len()
    }

    pub fn is_completed(&self, lesson_id: i64) -> bool {
        self.completed_lessons.contains(&lesson_id)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct CompleteLessonReq {
    #[serde(default)]
    pub lesson_id: Option<i64>,
    #[serde(default)]
    pub xp: Option<i64>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CompleteLessonResp {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<ProgressRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
