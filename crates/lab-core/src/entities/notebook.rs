use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A free-text observation logged during a session.
///
/// Created only through the session controller and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NotebookEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub text: String,
    pub context_tag: Option<String>,
}
