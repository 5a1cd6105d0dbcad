use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::StepConfig;
use crate::enums::StepPolicy;

/// Catalog description of an exercise, resolved by the surrounding scene
/// before it mounts a session.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ExerciseMetadata {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub steps: Vec<StepConfig>,
    /// Falls back to the configured default passing score when absent.
    #[serde(default)]
    pub passing_score: Option<u8>,
    /// Overrides the configured step policy for this exercise.
    #[serde(default)]
    pub step_policy: Option<StepPolicy>,
}
