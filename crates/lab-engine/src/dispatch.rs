//! Fire-and-forget dispatch of collaborator calls.
//!
//! The controller never awaits persistence or achievement checks. It queues them
//! on an unbounded channel drained by a single worker task, so calls run in the
//! order they were made and a slow or failing collaborator never blocks a step
//! change or a tick. Failures are logged and handed to an optional
//! [`FailureReporter`].

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use lab_core::collaborators::{
    AchievementEvaluator, AttemptStore, CollaboratorFailure, FailureReporter,
};
use lab_core::entities::{AttemptKey, NotebookEntry};
use lab_core::enums::CollaboratorOp;
use lab_core::errors::CoreError;
use tokio::sync::{mpsc, oneshot};

enum DispatchOp {
    SaveNote {
        key: AttemptKey,
        entry: NotebookEntry,
    },
    Complete {
        key: AttemptKey,
        score: u8,
        completed_at: DateTime<Utc>,
    },
    CheckAchievements {
        key: AttemptKey,
    },
    Flush(oneshot::Sender<()>),
}

/// Queue of pending collaborator calls.
///
/// Dropping the dispatcher closes the queue; the worker still drains what was
/// already queued before it exits.
pub struct Dispatcher {
    tx: mpsc::UnboundedSender<DispatchOp>,
}

impl Dispatcher {
    /// Spawn the worker. Must be called inside a tokio runtime.
    pub fn spawn<S, E>(
        store: Arc<S>,
        evaluator: Arc<E>,
        reporter: Option<Arc<dyn FailureReporter>>,
    ) -> Self
    where
        S: AttemptStore + 'static,
        E: AchievementEvaluator + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_worker(store, evaluator, reporter, rx));
        Self { tx }
    }

    pub fn save_note(&self, key: &AttemptKey, entry: &NotebookEntry) {
        self.send(DispatchOp::SaveNote {
            key: key.clone(),
            entry: entry.clone(),
        });
    }

    pub fn complete(&self, key: &AttemptKey, score: u8, completed_at: DateTime<Utc>) {
        self.send(DispatchOp::Complete {
            key: key.clone(),
            score,
            completed_at,
        });
    }

    pub fn check_achievements(&self, key: &AttemptKey) {
        self.send(DispatchOp::CheckAchievements { key: key.clone() });
    }

    /// Wait until every call queued before this one has finished.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(DispatchOp::Flush(done_tx)).is_ok() {
            let _ = done_rx.await;
        }
    }

    fn send(&self, op: DispatchOp) {
        if self.tx.send(op).is_err() {
            tracing::warn!("dispatch: worker has exited, dropping collaborator call");
        }
    }
}

async fn run_worker<S, E>(
    store: Arc<S>,
    evaluator: Arc<E>,
    reporter: Option<Arc<dyn FailureReporter>>,
    mut rx: mpsc::UnboundedReceiver<DispatchOp>,
) where
    S: AttemptStore,
    E: AchievementEvaluator,
{
    while let Some(op) = rx.recv().await {
        match op {
            DispatchOp::SaveNote { key, entry } => {
                if let Err(error) = store.save_notebook_entry(&key, &entry).await {
                    report_failure(
                        reporter.as_deref(),
                        CollaboratorOp::SaveNotebookEntry,
                        key,
                        &error,
                    );
                }
            }
            DispatchOp::Complete {
                key,
                score,
                completed_at,
            } => {
                if let Err(error) = store.complete_attempt(&key, score, completed_at).await {
                    report_failure(
                        reporter.as_deref(),
                        CollaboratorOp::CompleteAttempt,
                        key,
                        &error,
                    );
                }
            }
            DispatchOp::CheckAchievements { key } => {
                match evaluator.trigger_check(&key.participant_id).await {
                    Ok(awarded) if !awarded.is_empty() => {
                        let kinds: Vec<_> = awarded.iter().map(|a| a.kind.as_str()).collect();
                        tracing::info!(participant = %key.participant_id, ?kinds, "achievements awarded");
                    }
                    Ok(_) => {}
                    Err(error) => report_failure(
                        reporter.as_deref(),
                        CollaboratorOp::TriggerAchievementCheck,
                        key,
                        &error,
                    ),
                }
            }
            DispatchOp::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    tracing::debug!("dispatch: queue closed, worker exiting");
}

/// Log a collaborator failure and forward it to the reporter, if any.
pub(crate) fn report_failure(
    reporter: Option<&dyn FailureReporter>,
    operation: CollaboratorOp,
    key: AttemptKey,
    error: &CoreError,
) {
    tracing::warn!(%operation, %key, %error, "collaborator call failed; session continues");
    if let Some(reporter) = reporter {
        reporter.report(&CollaboratorFailure {
            operation,
            key,
            message: error.to_string(),
        });
    }
}

/// Reporter that keeps every failure in memory.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    failures: Mutex<Vec<CollaboratorFailure>>,
}

impl RecordingReporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the failures reported so far, oldest first.
    #[must_use]
    pub fn failures(&self) -> Vec<CollaboratorFailure> {
        self.failures
            .lock()
            .map(|failures| failures.clone())
            .unwrap_or_default()
    }
}

impl FailureReporter for RecordingReporter {
    fn report(&self, failure: &CollaboratorFailure) {
        if let Ok(mut failures) = self.failures.lock() {
            failures.push(failure.clone());
        }
    }
}
