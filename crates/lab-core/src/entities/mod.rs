//! Entity structs for all labrun domain objects.
//!
//! Persisted entities map to tables in the libSQL database (see `lab-db`
//! migrations). All structs derive `Serialize`, `Deserialize`, and `JsonSchema`
//! for JSON roundtrip and schema validation.

mod achievement;
mod attempt;
mod exercise;
mod molecule;
mod notebook;
mod step;

pub use achievement::Achievement;
pub use attempt::{AttemptKey, AttemptRecord};
pub use exercise::ExerciseMetadata;
pub use molecule::{EquationSide, Molecule, Term};
pub use notebook::NotebookEntry;
pub use step::StepConfig;
