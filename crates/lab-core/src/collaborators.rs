//! Collaborator traits the session engine calls out to.
//!
//! The engine never talks to a database or an achievement service directly.
//! It is handed implementations of these traits; `lab-db` provides the libSQL
//! ones and `lab-engine::memory` provides in-memory ones.
//!
//! Async methods return `impl Future + Send` so the engine can move calls onto
//! its dispatch worker.

use std::future::Future;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Achievement, AttemptKey, AttemptRecord, ExerciseMetadata, NotebookEntry};
use crate::enums::CollaboratorOp;
use crate::errors::CoreError;

/// Persistence for attempts and their notebook entries.
pub trait AttemptStore: Send + Sync {
    /// Resume the live attempt for `key`, or create one if none is live.
    ///
    /// Calling this twice for the same key must return the same attempt.
    fn initialize_attempt(
        &self,
        key: &AttemptKey,
    ) -> impl Future<Output = Result<AttemptRecord, CoreError>> + Send;

    /// Append a notebook entry to the live attempt for `key`.
    fn save_notebook_entry(
        &self,
        key: &AttemptKey,
        entry: &NotebookEntry,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Finalize the live attempt for `key` with `score`, recording the
    /// session's own `completed_at` rather than the time of the write.
    fn complete_attempt(
        &self,
        key: &AttemptKey,
        score: u8,
        completed_at: DateTime<Utc>,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}

/// Inspects a participant's history after a completed attempt and awards
/// recognitions. Returns the achievements newly awarded by this check.
pub trait AchievementEvaluator: Send + Sync {
    fn trigger_check(
        &self,
        participant_id: &str,
    ) -> impl Future<Output = Result<Vec<Achievement>, CoreError>> + Send;
}

/// Resolves exercise metadata before a session is mounted.
pub trait ExerciseCatalog {
    fn get_by_id(&self, exercise_id: &str) -> Option<ExerciseMetadata>;
}

/// A collaborator call that failed without interrupting the session.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CollaboratorFailure {
    pub operation: CollaboratorOp,
    pub key: AttemptKey,
    pub message: String,
}

/// Side channel for collaborator failures.
pub trait FailureReporter: Send + Sync {
    fn report(&self, failure: &CollaboratorFailure);
}
