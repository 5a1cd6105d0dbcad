use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One step of an exercise. Order in the exercise's step list defines the
/// step index.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StepConfig {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
}

impl StepConfig {
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: String::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
