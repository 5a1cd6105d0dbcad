//! # lab-engine
//!
//! The interactive lab session runtime for labrun.
//!
//! - [`SessionController`] drives one attempt: steps, notebook, elapsed time,
//!   scoring, and hand-off to the collaborators
//! - [`TypedSession`] narrows step ids to a [`StepSet`] enum
//! - [`conservation`] checks and solves weighted-count equations, fed by
//!   [`formula`]
//! - [`memory`] holds in-memory collaborators, [`catalog`] a TOML-backed
//!   exercise catalog

pub mod catalog;
pub mod clock;
pub mod conservation;
pub mod controller;
pub mod dispatch;
pub mod error;
pub mod formula;
pub mod memory;
pub mod notebook;
pub mod scoring;
pub mod sequencer;
pub mod typed;

pub use controller::{LabOutcome, SessionController, SessionOptions, SessionSetup};
pub use error::EngineError;
pub use typed::{StepSet, TypedSession};
