//! Walking a learner through one lesson's exercises.
//!
//! Wrong answers never block progression: an exercise counts as done once any
//! answer was submitted, and the lesson completes when every exercise is done.

use std::collections::HashMap;
use thiserror::Error;

use crate::learning::{grade, Feedback};
use crate::models::{Exercise, Lesson};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AttemptError {
    #[error("lesson {0} has no exercises")]
    NoExercises(i64),
    #[error("exercise {exercise_id} is not part of lesson {lesson_id}")]
    UnknownExercise { lesson_id: i64, exercise_id: i64 },
}

/// Completion to persist through `POST /api/progress`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LessonCompletion {
    pub lesson_id: i64,
    pub xp: i64,
    pub correct: usize,
    pub total: usize,
}

/// Result of moving past the current exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The cursor moved to the next exercise.
    Moved,
    /// Already on the last exercise but some exercises have no answer yet.
    Incomplete { unanswered: usize },
    Completed(LessonCompletion),
}

#[derive(Debug, Clone)]
pub struct LessonAttempt {
    lesson_id: i64,
    exercises: Vec<Exercise>,
    answers: HashMap<i64, (String, Feedback)>,
    cursor: usize,
}

impl LessonAttempt {
    pub fn start(lesson: &Lesson) -> Result<Self, AttemptError> {
        if lesson.exercises.is_empty() {
            return Err(AttemptError::NoExercises(lesson.id));
        }
        Ok(Self {
            lesson_id: lesson.id,
            exercises: lesson.exercises.clone(),
            answers: HashMap::new(),
            cursor: 0,
        })
    }

    pub fn lesson_id(&self) -> i64 {
        self.lesson_id
    }

    pub fn current(&self) -> Option<&Exercise> {
        self.exercises.get(self.cursor)
    }

    /// Grades an answer; resubmitting replaces the earlier answer.
    pub fn submit(&mut self, exercise_id: i64, answer: &str) -> Result<Feedback, AttemptError> {
        let exercise = self
            .exercises
            .iter()
            .find(|e| e.id == exercise_id)
            .ok_or(AttemptError::UnknownExercise {
                lesson_id: self.lesson_id,
                exercise_id,
            })?;
        let feedback = grade(exercise, answer);
        self.answers.insert(exercise_id, (answer.to_string(), feedback));
        Ok(feedback)
    }

    pub fn feedback(&self, exercise_id: i64) -> Option<Feedback> {
        self.answers.get(&exercise_id).map(|(_, f)| *f)
    }

    pub fn answer(&self, exercise_id: i64) -> Option<&str> {
        self.answers.get(&exercise_id).map(|(a, _)| a.as_str())
    }

    /// Moves to the next exercise, or finishes the lesson from the last one.
    pub fn advance(&mut self) -> Advance {
        if self.cursor + 1 < self.exercises.len() {
            self.cursor += 1;
            return Advance::Moved;
        }
        match self.completion() {
            Some(done) => Advance::Completed(done),
            None => Advance::Incomplete {
                unanswered: self.exercises.len() - self.answered(),
            },
        }
    }

    pub fn answered(&self) -> usize {
        self.exercises
            .iter()
            .filter(|e| self.answers.contains_key(&e.id))
            .count()
    }

    pub fn is_complete(&self) -> bool {
        self.answered() == self.exercises.len()
    }

    pub fn earned_xp(&self) -> i64 {
        self.answers.values().map(|(_, f)| f.xp).sum()
    }

    pub fn correct_count(&self) -> usize {
        self.answers.values().filter(|(_, f)| f.correct).count()
    }

    pub fn completion(&self) -> Option<LessonCompletion> {
        self.is_complete().then(|| LessonCompletion {
            lesson_id: self.lesson_id,
            xp: self.earned_xp(),
            correct: self.correct_count(),
            total: self.exercises.len(),
        })
    }
}
