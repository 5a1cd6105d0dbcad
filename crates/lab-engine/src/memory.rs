//! In-memory collaborators.
//!
//! Useful for scenes that run without a database, and for tests. The store can
//! be told to fail or slow down its writes to exercise the non-blocking
//! failure path.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use lab_core::achievements;
use lab_core::collaborators::{AchievementEvaluator, AttemptStore};
use lab_core::entities::{Achievement, AttemptKey, AttemptRecord, NotebookEntry};
use lab_core::errors::CoreError;
use lab_core::ids::{PREFIX_ATTEMPT, generate_id};

/// Attempt store backed by a `Vec` behind a mutex.
#[derive(Debug, Default)]
pub struct MemoryStore {
    attempts: Mutex<Vec<AttemptRecord>>,
    fail_writes: AtomicBool,
    write_delay: Mutex<Option<Duration>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later write fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Sleep this long before each write.
    pub fn set_write_delay(&self, delay: Option<Duration>) {
        if let Ok(mut slot) = self.write_delay.lock() {
            *slot = delay;
        }
    }

    /// Snapshot of every stored attempt, live and completed.
    #[must_use]
    pub fn attempts(&self) -> Vec<AttemptRecord> {
        self.lock().map(|a| a.clone()).unwrap_or_default()
    }

    /// Completed and live attempts of one participant.
    #[must_use]
    pub fn history(&self, participant_id: &str) -> Vec<AttemptRecord> {
        self.attempts()
            .into_iter()
            .filter(|a| a.participant_id == participant_id)
            .collect()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<AttemptRecord>>, CoreError> {
        self.attempts
            .lock()
            .map_err(|_| CoreError::Other(anyhow::anyhow!("memory store lock poisoned")))
    }

    async fn before_write(&self) -> Result<(), CoreError> {
        let delay = self.write_delay.lock().ok().and_then(|d| *d);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CoreError::Other(anyhow::anyhow!("memory store: write rejected")));
        }
        Ok(())
    }
}

fn not_live(key: &AttemptKey) -> CoreError {
    CoreError::NotFound {
        entity_type: "live attempt".into(),
        id: key.to_string(),
    }
}

impl AttemptStore for MemoryStore {
    async fn initialize_attempt(&self, key: &AttemptKey) -> Result<AttemptRecord, CoreError> {
        self.before_write().await?;
        let mut attempts = self.lock()?;
        if let Some(live) = attempts
            .iter()
            .find(|a| !a.is_completed() && a.key() == *key)
        {
            return Ok(live.clone());
        }
        let attempt = AttemptRecord::start(generate_id(PREFIX_ATTEMPT)?, key, Utc::now());
        attempts.push(attempt.clone());
        Ok(attempt)
    }

    async fn save_notebook_entry(
        &self,
        key: &AttemptKey,
        entry: &NotebookEntry,
    ) -> Result<(), CoreError> {
        self.before_write().await?;
        let mut attempts = self.lock()?;
        let live = attempts
            .iter_mut()
            .find(|a| !a.is_completed() && a.key() == *key)
            .ok_or_else(|| not_live(key))?;
        if !live.notebook_entries.iter().any(|e| e.id == entry.id) {
            live.notebook_entries.push(entry.clone());
        }
        Ok(())
    }

    async fn complete_attempt(
        &self,
        key: &AttemptKey,
        score: u8,
        completed_at: DateTime<Utc>,
    ) -> Result<(), CoreError> {
        self.before_write().await?;
        let mut attempts = self.lock()?;
        let live = attempts
            .iter_mut()
            .find(|a| !a.is_completed() && a.key() == *key)
            .ok_or_else(|| not_live(key))?;
        live.complete(score, completed_at)
    }
}

/// Achievement evaluator applying the standard rules to a [`MemoryStore`]'s history.
#[derive(Debug)]
pub struct MemoryEvaluator {
    store: Arc<MemoryStore>,
    awarded: Mutex<Vec<Achievement>>,
    fail: AtomicBool,
}

impl MemoryEvaluator {
    #[must_use]
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self {
            store,
            awarded: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        }
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Everything awarded so far, in award order.
    #[must_use]
    pub fn awarded(&self) -> Vec<Achievement> {
        self.awarded.lock().map(|a| a.clone()).unwrap_or_default()
    }
}

impl AchievementEvaluator for MemoryEvaluator {
    async fn trigger_check(&self, participant_id: &str) -> Result<Vec<Achievement>, CoreError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(CoreError::Other(anyhow::anyhow!(
                "achievement service unavailable"
            )));
        }
        let history = self.store.history(participant_id);
        let mut awarded = self
            .awarded
            .lock()
            .map_err(|_| CoreError::Other(anyhow::anyhow!("evaluator lock poisoned")))?;

        let mut fresh = Vec::new();
        for (kind, attempt_id) in achievements::earned(&history) {
            let known = awarded
                .iter()
                .any(|a| a.participant_id == participant_id && a.kind == kind);
            if !known {
                let achievement = Achievement {
                    participant_id: participant_id.to_string(),
                    kind,
                    attempt_id,
                    awarded_at: Utc::now(),
                };
                awarded.push(achievement.clone());
                fresh.push(achievement);
            }
        }
        Ok(fresh)
    }
}

#[cfg(test)]
mod tests {
    use lab_core::enums::AchievementKind;

    use super::*;

    #[tokio::test]
    async fn initialize_resumes_the_live_attempt() {
        let store = MemoryStore::new();
        let key = AttemptKey::new("stu-1", "ph");
        let first = store.initialize_attempt(&key).await.unwrap();
        let second = store.initialize_attempt(&key).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(store.attempts().len(), 1);
    }

    #[tokio::test]
    async fn completed_attempt_is_not_resumed() {
        let store = MemoryStore::new();
        let key = AttemptKey::new("stu-1", "ph");
        let first = store.initialize_attempt(&key).await.unwrap();
        store.complete_attempt(&key, 90, Utc::now()).await.unwrap();
        let second = store.initialize_attempt(&key).await.unwrap();
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn saving_the_same_entry_twice_keeps_one_copy() {
        let store = MemoryStore::new();
        let key = AttemptKey::new("stu-1", "ph");
        store.initialize_attempt(&key).await.unwrap();
        let entry = NotebookEntry {
            id: "nte-1".into(),
            timestamp: Utc::now(),
            text: "litmus red".into(),
            context_tag: None,
        };
        store.save_notebook_entry(&key, &entry).await.unwrap();
        store.save_notebook_entry(&key, &entry).await.unwrap();
        assert_eq!(store.attempts()[0].notebook_entries.len(), 1);
    }

    #[tokio::test]
    async fn writes_without_live_attempt_fail() {
        let store = MemoryStore::new();
        let err = store
            .complete_attempt(&AttemptKey::new("stu-1", "ph"), 50, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn evaluator_awards_each_kind_once() {
        let store = Arc::new(MemoryStore::new());
        let evaluator = MemoryEvaluator::new(Arc::clone(&store));
        let key = AttemptKey::new("stu-1", "ph");
        store.initialize_attempt(&key).await.unwrap();
        store.complete_attempt(&key, 100, Utc::now()).await.unwrap();

        let first = evaluator.trigger_check("stu-1").await.unwrap();
        let kinds: Vec<_> = first.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![AchievementKind::FirstCompletion, AchievementKind::PerfectScore]
        );
        assert!(evaluator.trigger_check("stu-1").await.unwrap().is_empty());
    }
}
