use std::fmt;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::NotebookEntry;
use crate::errors::CoreError;

/// Natural key of an attempt. At most one live (incomplete) attempt exists per key.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub struct AttemptKey {
    pub participant_id: String,
    pub exercise_id: String,
}

impl AttemptKey {
    #[must_use]
    pub fn new(participant_id: impl Into<String>, exercise_id: impl Into<String>) -> Self {
        Self {
            participant_id: participant_id.into(),
            exercise_id: exercise_id.into(),
        }
    }
}

impl fmt::Display for AttemptKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.participant_id, self.exercise_id)
    }
}

/// One participant's run through an exercise.
///
/// `completed_at` and `score` are set together, once, by [`AttemptRecord::complete`].
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AttemptRecord {
    pub id: String,
    pub participant_id: String,
    pub exercise_id: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub score: Option<u8>,
    #[serde(default)]
    pub notebook_entries: Vec<NotebookEntry>,
}

impl AttemptRecord {
    /// A fresh, incomplete attempt with no notebook entries.
    #[must_use]
    pub fn start(id: impl Into<String>, key: &AttemptKey, started_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            participant_id: key.participant_id.clone(),
            exercise_id: key.exercise_id.clone(),
            started_at,
            completed_at: None,
            score: None,
            notebook_entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn key(&self) -> AttemptKey {
        AttemptKey::new(self.participant_id.clone(), self.exercise_id.clone())
    }

    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Finalize the attempt. `completed_at` never precedes `started_at`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` if the attempt is already complete,
    /// and `CoreError::Validation` if `score` exceeds 100.
    pub fn complete(&mut self, score: u8, at: DateTime<Utc>) -> Result<(), CoreError> {
        if self.is_completed() {
            return Err(CoreError::InvalidTransition {
                entity_type: "attempt".into(),
                id: self.id.clone(),
                from: "completed".into(),
                to: "completed".into(),
            });
        }
        if score > 100 {
            return Err(CoreError::Validation(format!(
                "score {score} is outside 0..=100"
            )));
        }
        self.completed_at = Some(at.max(self.started_at));
        self.score = Some(score);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn record() -> AttemptRecord {
        AttemptRecord::start("att-00000001", &AttemptKey::new("stu-1", "titration"), Utc::now())
    }

    #[test]
    fn complete_sets_score_and_timestamp_together() {
        let mut attempt = record();
        attempt.complete(85, Utc::now()).unwrap();
        assert_eq!(attempt.score, Some(85));
        assert!(attempt.completed_at.unwrap() >= attempt.started_at);
    }

    #[test]
    fn complete_twice_is_rejected() {
        let mut attempt = record();
        attempt.complete(40, Utc::now()).unwrap();
        let err = attempt.complete(90, Utc::now()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidTransition { .. }));
        assert_eq!(attempt.score, Some(40));
    }

    #[test]
    fn completion_before_start_is_clamped_to_start() {
        let mut attempt = record();
        let earlier = attempt.started_at - Duration::seconds(5);
        attempt.complete(10, earlier).unwrap();
        assert_eq!(attempt.completed_at, Some(attempt.started_at));
    }

    #[test]
    fn out_of_range_score_is_rejected() {
        let mut attempt = record();
        assert!(matches!(
            attempt.complete(101, Utc::now()),
            Err(CoreError::Validation(_))
        ));
        assert!(!attempt.is_completed());
    }

    #[test]
    fn key_display() {
        assert_eq!(record().key().to_string(), "stu-1/titration");
    }
}
