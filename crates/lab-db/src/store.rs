//! `AttemptStore` and `AchievementEvaluator` for [`LabService`].

use chrono::{DateTime, Utc};
use lab_core::collaborators::{AchievementEvaluator, AttemptStore};
use lab_core::entities::{Achievement, AttemptKey, AttemptRecord, NotebookEntry};
use lab_core::errors::CoreError;

use crate::error::DatabaseError;
use crate::service::LabService;

impl AttemptStore for LabService {
    async fn initialize_attempt(&self, key: &AttemptKey) -> Result<AttemptRecord, CoreError> {
        Ok(self.start_attempt(key).await?)
    }

    async fn save_notebook_entry(
        &self,
        key: &AttemptKey,
        entry: &NotebookEntry,
    ) -> Result<(), CoreError> {
        let attempt = self
            .find_live_attempt(key)
            .await?
            .ok_or_else(|| DatabaseError::InvalidState(format!("no live attempt for {key}")))?;
        self.append_notebook_entry(&attempt.id, entry).await?;
        Ok(())
    }

    async fn complete_attempt(
        &self,
        key: &AttemptKey,
        score: u8,
        completed_at: DateTime<Utc>,
    ) -> Result<(), CoreError> {
        self.complete_live_attempt(key, score, completed_at).await?;
        Ok(())
    }
}

impl AchievementEvaluator for LabService {
    async fn trigger_check(&self, participant_id: &str) -> Result<Vec<Achievement>, CoreError> {
        Ok(self.evaluate_achievements(participant_id).await?)
    }
}
