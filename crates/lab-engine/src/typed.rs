//! Compile-time step sets.
//!
//! An exercise with a fixed step list can describe it as an enum implementing
//! [`StepSet`]. [`TypedSession`] then accepts only that enum, so an unknown step
//! is a type error rather than an `UnknownStep` at runtime.

use std::sync::Arc;

use lab_core::collaborators::{AchievementEvaluator, AttemptStore};
use lab_core::entities::{NotebookEntry, StepConfig};

use crate::controller::{LabOutcome, SessionController, SessionOptions, SessionSetup};
use crate::error::EngineError;

/// A closed, ordered set of steps.
pub trait StepSet: Copy + Eq + Send + Sync + 'static {
    /// Every step, in exercise order.
    const ALL: &'static [Self];

    fn id(self) -> &'static str;

    fn label(self) -> &'static str;

    fn configs() -> Vec<StepConfig> {
        Self::ALL
            .iter()
            .map(|step| StepConfig::new(step.id(), step.label()))
            .collect()
    }

    fn from_id(id: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|step| step.id() == id)
    }
}

/// A [`SessionController`] whose steps are the variants of `S`.
pub struct TypedSession<S: StepSet> {
    inner: SessionController,
    current: S,
}

impl<S: StepSet> TypedSession<S> {
    /// # Errors
    ///
    /// Same as [`SessionController::initialize`]; `NoSteps` if `S::ALL` is empty.
    pub async fn initialize<St, E>(
        store: Arc<St>,
        evaluator: Arc<E>,
        participant_id: &str,
        exercise_id: &str,
        passing_score: i64,
        options: SessionOptions,
    ) -> Result<Self, EngineError>
    where
        St: AttemptStore + 'static,
        E: AchievementEvaluator + 'static,
    {
        let first = S::ALL.first().copied().ok_or(EngineError::NoSteps)?;
        let setup = SessionSetup::new(participant_id, exercise_id, S::configs(), passing_score);
        let inner = SessionController::initialize(store, evaluator, setup, options).await?;
        Ok(Self {
            inner,
            current: first,
        })
    }

    /// # Errors
    ///
    /// Returns `AlreadyCompleted` or `StepNotAllowed`.
    pub fn set_step(&mut self, step: S) -> Result<(), EngineError> {
        self.inner.set_step(step.id())?;
        self.current = step;
        Ok(())
    }

    #[must_use]
    pub const fn current_step(&self) -> S {
        self.current
    }

    /// # Errors
    ///
    /// See [`SessionController::add_note`].
    pub fn add_note(
        &mut self,
        text: &str,
        context_tag: Option<&str>,
    ) -> Result<NotebookEntry, EngineError> {
        self.inner.add_note(text, context_tag)
    }

    /// # Errors
    ///
    /// See [`SessionController::complete_lab`].
    pub fn complete_lab(&mut self, score: i64) -> Result<LabOutcome, EngineError> {
        self.inner.complete_lab(score)
    }

    pub fn exit(&mut self) {
        self.inner.exit();
    }

    pub async fn flush(&self) {
        self.inner.flush().await;
    }

    /// Untyped read-only view.
    #[must_use]
    pub const fn controller(&self) -> &SessionController {
        &self.inner
    }
}
