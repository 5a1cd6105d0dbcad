//! Engine error types.
//!
//! Every variant except `Core` is a contract violation by the calling scene:
//! returned synchronously, never retried.

use lab_core::enums::StepPolicy;
use lab_core::errors::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The step id is not part of the exercise's step list.
    #[error("Unknown step: {step_id}")]
    UnknownStep { step_id: String },

    /// Two configured steps share an id.
    #[error("Duplicate step id: {step_id}")]
    DuplicateStep { step_id: String },

    /// An exercise was configured without steps.
    #[error("Exercise has no steps")]
    NoSteps,

    /// The exercise's step policy forbids this jump.
    #[error("Step policy {policy} does not allow moving from {from} to {to}")]
    StepNotAllowed {
        from: String,
        to: String,
        policy: StepPolicy,
    },

    /// A notebook observation was empty after trimming.
    #[error("Observation text is empty")]
    EmptyObservation,

    /// A completion score outside `0..=100` under the reject policy.
    #[error("Score {score} is outside 0..=100")]
    InvalidScore { score: i64 },

    /// A passing threshold outside `0..=100`.
    #[error("Passing score {threshold} is outside 0..=100")]
    InvalidThreshold { threshold: i64 },

    /// The elapsed-time tick interval was zero.
    #[error("Tick interval must be greater than zero")]
    InvalidTickInterval,

    /// The session was already completed.
    #[error("Attempt {attempt_id} is already completed")]
    AlreadyCompleted { attempt_id: String },

    /// A zero or negative coefficient was supplied to the validator.
    #[error("Invalid coefficient {coefficient} for {entity}")]
    InvalidCoefficient { entity: String, coefficient: i64 },

    /// A weighted total does not fit in 64 bits.
    #[error("Weighted total for {category} overflows")]
    CountOverflow { category: String },

    /// A chemical formula or equation could not be parsed.
    #[error("Formula error: {0}")]
    Formula(String),

    /// Catalog file could not be read or parsed.
    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}
