//! The lab session state machine.
//!
//! ```text
//! initialize ──► active ──complete_lab──► completed
//!                 │  ▲
//!                 └──┘ set_step / add_note
//! ```
//!
//! A controller owns one attempt for one `(participant, exercise)` key. Every
//! operation is synchronous from the scene's point of view: persistence and
//! achievement checks are queued on a [`Dispatcher`] and never awaited, and the
//! elapsed-time counter runs on its own [`Ticker`] task.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use lab_config::EngineConfig;
use lab_core::collaborators::{AchievementEvaluator, AttemptStore, FailureReporter};
use lab_core::entities::{AttemptKey, AttemptRecord, ExerciseMetadata, NotebookEntry, StepConfig};
use lab_core::enums::{CollaboratorOp, ScorePolicy, SessionStatus, StepPolicy};
use lab_core::ids::{PREFIX_ATTEMPT, generate_id};
use serde::Serialize;

use crate::clock::{ElapsedClock, Ticker};
use crate::dispatch::{Dispatcher, report_failure};
use crate::error::EngineError;
use crate::notebook::NotebookLog;
use crate::scoring::ScoringGate;
use crate::sequencer::StepSequencer;

/// What a scene supplies when mounting a session.
#[derive(Debug, Clone)]
pub struct SessionSetup {
    pub participant_id: String,
    pub exercise_id: String,
    pub steps: Vec<StepConfig>,
    /// Checked against `0..=100` before any collaborator is called.
    pub passing_score: i64,
    /// Overrides [`SessionOptions::step_policy`] when set.
    pub step_policy: Option<StepPolicy>,
}

impl SessionSetup {
    #[must_use]
    pub fn new(
        participant_id: impl Into<String>,
        exercise_id: impl Into<String>,
        steps: Vec<StepConfig>,
        passing_score: i64,
    ) -> Self {
        Self {
            participant_id: participant_id.into(),
            exercise_id: exercise_id.into(),
            steps,
            passing_score,
            step_policy: None,
        }
    }

    /// Setup for an exercise resolved from a catalog. `default_passing_score`
    /// applies when the exercise doesn't set its own.
    #[must_use]
    pub fn from_exercise(
        participant_id: impl Into<String>,
        exercise: &ExerciseMetadata,
        default_passing_score: u8,
    ) -> Self {
        Self {
            participant_id: participant_id.into(),
            exercise_id: exercise.id.clone(),
            steps: exercise.steps.clone(),
            passing_score: i64::from(exercise.passing_score.unwrap_or(default_passing_score)),
            step_policy: exercise.step_policy,
        }
    }

    #[must_use]
    pub const fn with_step_policy(mut self, policy: StepPolicy) -> Self {
        self.step_policy = Some(policy);
        self
    }
}

/// Engine-wide knobs, usually built from [`EngineConfig`].
#[derive(Clone)]
pub struct SessionOptions {
    pub tick_interval: Duration,
    pub score_policy: ScorePolicy,
    pub step_policy: StepPolicy,
    pub reporter: Option<Arc<dyn FailureReporter>>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl std::fmt::Debug for SessionOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionOptions")
            .field("tick_interval", &self.tick_interval)
            .field("score_policy", &self.score_policy)
            .field("step_policy", &self.step_policy)
            .field("reporter", &self.reporter.is_some())
            .finish()
    }
}

impl SessionOptions {
    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            tick_interval: Duration::from_millis(config.tick_interval_ms),
            score_policy: config.score_policy,
            step_policy: config.step_policy,
            reporter: None,
        }
    }

    #[must_use]
    pub fn with_reporter(mut self, reporter: Arc<dyn FailureReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    #[must_use]
    pub const fn with_score_policy(mut self, policy: ScorePolicy) -> Self {
        self.score_policy = policy;
        self
    }

    #[must_use]
    pub const fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }
}

/// Result of a successful `complete_lab`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabOutcome {
    pub attempt_id: String,
    pub score: u8,
    pub passed: bool,
    pub elapsed_ticks: u64,
}

/// Drives one attempt through its steps, notebook, and completion.
pub struct SessionController {
    key: AttemptKey,
    sequencer: StepSequencer,
    scoring: ScoringGate,
    current: usize,
    furthest: usize,
    status: SessionStatus,
    ticker: Ticker,
    attempt: AttemptRecord,
    notebook: NotebookLog,
    dispatcher: Dispatcher,
}

impl SessionController {
    /// Mount a session: validate the exercise, resume or create the attempt,
    /// and start the elapsed-time counter on the first step.
    ///
    /// Must be called inside a tokio runtime. A store failure here is reported
    /// and the session continues with a local-only attempt record.
    ///
    /// # Errors
    ///
    /// Returns `NoSteps`, `DuplicateStep` or `InvalidThreshold` for a malformed
    /// exercise and `InvalidTickInterval` for a zero tick interval. Nothing is
    /// requested from the store in those cases.
    pub async fn initialize<S, E>(
        store: Arc<S>,
        evaluator: Arc<E>,
        setup: SessionSetup,
        options: SessionOptions,
    ) -> Result<Self, EngineError>
    where
        S: AttemptStore + 'static,
        E: AchievementEvaluator + 'static,
    {
        let policy = setup.step_policy.unwrap_or(options.step_policy);
        let sequencer = StepSequencer::new(setup.steps, policy)?;
        let scoring = ScoringGate::new(setup.passing_score, options.score_policy)?;
        if options.tick_interval.is_zero() {
            return Err(EngineError::InvalidTickInterval);
        }
        let key = AttemptKey::new(setup.participant_id, setup.exercise_id);

        let attempt = match store.initialize_attempt(&key).await {
            Ok(attempt) => attempt,
            Err(error) => {
                report_failure(
                    options.reporter.as_deref(),
                    CollaboratorOp::InitializeAttempt,
                    key.clone(),
                    &error,
                );
                AttemptRecord::start(generate_id(PREFIX_ATTEMPT)?, &key, Utc::now())
            }
        };
        if attempt.is_completed() {
            return Err(EngineError::AlreadyCompleted {
                attempt_id: attempt.id,
            });
        }

        let notebook = NotebookLog::resume(attempt.notebook_entries.clone());
        let dispatcher = Dispatcher::spawn(store, evaluator, options.reporter);
        let mut ticker = Ticker::new(Arc::new(ElapsedClock::new()), options.tick_interval);
        ticker.start();

        tracing::info!(
            attempt = %attempt.id,
            %key,
            steps = sequencer.len(),
            resumed_notes = notebook.len(),
            "session: initialized"
        );

        Ok(Self {
            key,
            sequencer,
            scoring,
            current: 0,
            furthest: 0,
            status: SessionStatus::Active,
            ticker,
            attempt,
            notebook,
            dispatcher,
        })
    }

    /// Move to `step_id`. Moving to the current step does nothing.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyCompleted`, `UnknownStep` or `StepNotAllowed`.
    pub fn set_step(&mut self, step_id: &str) -> Result<(), EngineError> {
        self.ensure_active()?;
        if self.current_step_id() == step_id {
            return Ok(());
        }
        let target = self
            .sequencer
            .resolve_jump(self.current, self.furthest, step_id)?;
        tracing::debug!(
            attempt = %self.attempt.id,
            from = self.current_step_id(),
            to = step_id,
            "session: step changed"
        );
        self.current = target;
        self.furthest = self.furthest.max(target);
        Ok(())
    }

    /// Record an observation and queue it for persistence.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyCompleted` or `EmptyObservation`.
    pub fn add_note(
        &mut self,
        text: &str,
        context_tag: Option<&str>,
    ) -> Result<NotebookEntry, EngineError> {
        self.ensure_active()?;
        let entry = self.notebook.append(text, context_tag)?.clone();
        self.attempt.notebook_entries.push(entry.clone());
        self.dispatcher.save_note(&self.key, &entry);
        tracing::debug!(attempt = %self.attempt.id, entry = %entry.id, "session: note added");
        Ok(entry)
    }

    /// Score the attempt, freeze the timer, and hand the result to the
    /// collaborators.
    ///
    /// An invalid score leaves the session active with the timer running.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyCompleted` or, under the reject policy, `InvalidScore`.
    pub fn complete_lab(&mut self, score: i64) -> Result<LabOutcome, EngineError> {
        self.ensure_active()?;
        let outcome = self.scoring.evaluate(score)?;

        let completed_at = Utc::now();
        self.attempt.complete(outcome.score, completed_at)?;
        let elapsed_ticks = self.ticker.clock().freeze();
        self.ticker.stop();
        self.status = SessionStatus::Completed;

        self.dispatcher.complete(&self.key, outcome.score, completed_at);
        self.dispatcher.check_achievements(&self.key);

        tracing::info!(
            attempt = %self.attempt.id,
            score = outcome.score,
            passed = outcome.passed,
            elapsed_ticks,
            "session: completed"
        );

        Ok(LabOutcome {
            attempt_id: self.attempt.id.clone(),
            score: outcome.score,
            passed: outcome.passed,
            elapsed_ticks,
        })
    }

    /// Stop the elapsed-time counter. Persisted data is untouched.
    pub fn exit(&mut self) {
        self.ticker.stop();
        tracing::debug!(attempt = %self.attempt.id, status = %self.status, "session: exited");
    }

    /// Wait until every queued collaborator call has finished.
    pub async fn flush(&self) {
        self.dispatcher.flush().await;
    }

    /// A session accepts input only while it may still move to `Completed`.
    fn ensure_active(&self) -> Result<(), EngineError> {
        if !self.status.can_transition_to(SessionStatus::Completed) {
            return Err(EngineError::AlreadyCompleted {
                attempt_id: self.attempt.id.clone(),
            });
        }
        Ok(())
    }

    // -- read-only views ---------------------------------------------------

    #[must_use]
    pub fn current_step(&self) -> &StepConfig {
        &self.sequencer.steps()[self.current]
    }

    #[must_use]
    pub fn current_step_id(&self) -> &str {
        &self.current_step().id
    }

    #[must_use]
    pub const fn step_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub const fn furthest_step_index(&self) -> usize {
        self.furthest
    }

    #[must_use]
    pub fn steps(&self) -> &[StepConfig] {
        self.sequencer.steps()
    }

    #[must_use]
    pub const fn step_policy(&self) -> StepPolicy {
        self.sequencer.policy()
    }

    #[must_use]
    pub const fn passing_score(&self) -> u8 {
        self.scoring.passing_score()
    }

    #[must_use]
    pub const fn key(&self) -> &AttemptKey {
        &self.key
    }

    /// The in-memory mirror of the attempt.
    #[must_use]
    pub const fn attempt(&self) -> &AttemptRecord {
        &self.attempt
    }

    #[must_use]
    pub const fn notebook(&self) -> &NotebookLog {
        &self.notebook
    }

    #[must_use]
    pub fn elapsed_ticks(&self) -> u64 {
        self.ticker.clock().elapsed()
    }

    #[must_use]
    pub fn is_timer_running(&self) -> bool {
        self.ticker.is_running()
    }

    #[must_use]
    pub const fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == SessionStatus::Completed
    }

    #[must_use]
    pub fn clock(&self) -> &Arc<ElapsedClock> {
        self.ticker.clock()
    }
}
