use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::AchievementKind;

/// A recognition awarded to a participant after a completed attempt.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Achievement {
    pub participant_id: String,
    pub kind: AchievementKind,
    /// The attempt whose completion triggered the award.
    pub attempt_id: String,
    pub awarded_at: DateTime<Utc>,
}
