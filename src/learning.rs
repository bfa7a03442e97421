// Grading and unlock rules shared by every learner-facing surface.

use serde::Serialize;

use crate::models::{Exercise, Lesson, ProgressSummary};

/// Case-insensitive comparison of trimmed answers. No partial credit.
pub fn answers_match(submitted: &str, correct: &str) -> bool {
    submitted.trim().to_lowercase() == correct.trim().to_lowercase()
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feedback {
    pub correct: bool,
    pub xp: i64,
}

pub fn grade(exercise: &Exercise, submitted: &str) -> Feedback {
    let correct = answers_match(submitted, &exercise.correct_answer);
    Feedback {
        correct,
        xp: if correct { exercise.reward() } else { 0 },
    }
}

/// Lessons unlock strictly in order: `lesson_id` is locked once it is more
/// than one past the number of completed lessons.
pub fn is_locked(lesson_id: i64, completed_count: usize) -> bool {
    lesson_id > completed_count as i64 + 1
}

pub fn next_lesson_id(summary: &ProgressSummary) -> i64 {
    summary.completed_count() as i64 + 1
}

pub fn progress_percentage(summary: &ProgressSummary, total_lessons: usize) -> u32 {
    if total_lessons == 0 {
        return 0;
    }
    let pct = summary.completed_count() as f64 * 100.0 / total_lessons as f64;
    pct.round().min(100.0) as u32
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LessonStatus {
    Completed,
    Available,
    Locked,
}

pub fn lesson_status(lesson_id: i64, summary: &ProgressSummary) -> LessonStatus {
    if summary.is_completed(lesson_id) {
        LessonStatus::Completed
    } else if is_locked(lesson_id, summary.completed_count()) {
        LessonStatus::Locked
    } else {
        LessonStatus::Available
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct LessonOverview {
    #[serde(flatten)]
    pub lesson: Lesson,
    pub status: LessonStatus,
}

/// Annotates lessons with their status. Call with a freshly fetched summary.
pub fn overview(lessons: Vec<Lesson>, summary: &ProgressSummary) -> Vec<LessonOverview> {
    lessons
        .into_iter()
        .map(|lesson| LessonOverview {
            status: lesson_status(lesson.id, summary),
            lesson,
        })
        .collect()
}

#[derive(Serialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatusCounts {
    pub completed: usize,
    pub available: usize,
    pub locked: usize,
}

pub fn status_counts(items: &[LessonOverview]) -> StatusCounts {
    items.iter().fold(StatusCounts::default(), |mut acc, item| {
        match item.status {
            LessonStatus::Completed => acc.completed += 1,
            LessonStatus::Available => acc.available += 1,
            LessonStatus::Locked => acc.locked += 1,
        }
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{BuiltinFixtures, FallbackLessons};
    use crate::models::{ExerciseKind, DEFAULT_XP};

    fn exercise(answer: &str, xp: Option<i64>) -> Exercise {
        Exercise {
            id: 1,
            kind: ExerciseKind::Translate,
            question: "Translate: Hello".into(),
            options: None,
            correct_answer: answer.into(),
            audio_url: None,
            xp_reward: xp,
        }
    }

    fn summary(completed: &[i64]) -> ProgressSummary {
        ProgressSummary {
            completed_lessons: completed.to_vec(),
            total_xp: 0,
            streak: 0,
        }
    }

    #[test]
    fn matching_ignores_case_and_surrounding_space() {
        assert!(answers_match(" Bonjour ", "Bonjour"));
        assert!(answers_match("MERCI", "merci"));
        assert!(!answers_match("bonsoir", "Bonjour"));
        assert!(!answers_match("bon jour", "Bonjour"));
    }

    #[test]
    fn grading_awards_reward_only_when_correct() {
        assert_eq!(grade(&exercise("Merci", Some(15)), "merci"), Feedback { correct: true, xp: 15 });
        assert_eq!(grade(&exercise("Merci", None), "merci").xp, DEFAULT_XP);
        assert_eq!(grade(&exercise("Merci", Some(0)), "merci").xp, DEFAULT_XP);
        assert_eq!(grade(&exercise("Merci", Some(15)), "pardon"), Feedback { correct: false, xp: 0 });
    }

    #[test]
    fn unlock_boundary() {
        for completed in 0..10usize {
            let c = completed as i64;
            assert!(!is_locked(c + 1, completed));
            assert!(is_locked(c + 2, completed));
            assert!(!is_locked(1, completed));
        }
    }

    #[test]
    fn status_follows_fresh_summary() {
        let before = summary(&[]);
        assert_eq!(lesson_status(1, &before), LessonStatus::Available);
        assert_eq!(lesson_status(2, &before), LessonStatus::Locked);

        let after = summary(&[1]);
        assert_eq!(lesson_status(1, &after), LessonStatus::Completed);
        assert_eq!(lesson_status(2, &after), LessonStatus::Available);
        assert_eq!(next_lesson_id(&after), 2);
    }

    #[test]
    fn percentage_rounds_and_handles_empty_catalog() {
        assert_eq!(progress_percentage(&summary(&[1]), 3), 33);
        assert_eq!(progress_percentage(&summary(&[1, 2]), 3), 67);
        assert_eq!(progress_percentage(&summary(&[1]), 0), 0);
    }

    #[test]
    fn overview_counts_statuses() {
        let items = overview(BuiltinFixtures.lessons(), &summary(&[1, 2]));
        assert_eq!(items[2].status, LessonStatus::Available);
        assert_eq!(
            status_counts(&items),
            StatusCounts { completed: 2, available: 1, locked: 2 }
        );
        let json = serde_json::to_value(&items[0]).unwrap();
        assert_eq!(json["status"], "completed");
        assert_eq!(json["slug"], "basic-greetings");
    }
}
