//! Status enums, policies, entity types, and trail ops for labrun.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! Status enums with state machines provide `allowed_next_states()` to enforce
//! valid transitions at the application layer.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// SessionStatus
// ---------------------------------------------------------------------------

/// Top-level status of a lab session.
///
/// ```text
/// active → completed
/// ```
///
/// Step changes happen inside `active` and never change the status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Active,
    Completed,
}

impl SessionStatus {
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Active => &[Self::Completed],
            Self::Completed => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ScorePolicy
// ---------------------------------------------------------------------------

/// What the scoring gate does with a score outside `[0, 100]`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ScorePolicy {
    /// Fail with `InvalidScore`.
    #[default]
    Reject,
    /// Clamp into range and accept.
    Clamp,
}

impl ScorePolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reject => "reject",
            Self::Clamp => "clamp",
        }
    }
}

impl fmt::Display for ScorePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// StepPolicy
// ---------------------------------------------------------------------------

/// Which step jumps an exercise permits.
///
/// ```text
/// free         any configured step, any direction
/// forward_only never to an earlier step
/// sequential   back anywhere, forward at most one past the furthest reached
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum StepPolicy {
    #[default]
    Free,
    ForwardOnly,
    Sequential,
}

impl StepPolicy {
    /// Whether moving from `current` to `target` is allowed, given the furthest
    /// step index reached so far.
    #[must_use]
    pub const fn permits(self, current: usize, target: usize, furthest: usize) -> bool {
        match self {
            Self::Free => true,
            Self::ForwardOnly => target >= current,
            Self::Sequential => target <= furthest + 1,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::ForwardOnly => "forward_only",
            Self::Sequential => "sequential",
        }
    }
}

impl fmt::Display for StepPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AchievementKind
// ---------------------------------------------------------------------------

/// Recognitions the achievement evaluator can award. Each is awarded once per
/// participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AchievementKind {
    /// Completed any lab.
    FirstCompletion,
    /// Scored 100 on a lab.
    PerfectScore,
    /// Completed five distinct exercises.
    FiveLabs,
    /// Completed a lab with at least five notebook entries.
    ThoroughNotes,
}

impl AchievementKind {
    pub const ALL: [Self; 4] = [
        Self::FirstCompletion,
        Self::PerfectScore,
        Self::FiveLabs,
        Self::ThoroughNotes,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FirstCompletion => "first_completion",
            Self::PerfectScore => "perfect_score",
            Self::FiveLabs => "five_labs",
            Self::ThoroughNotes => "thorough_notes",
        }
    }
}

impl fmt::Display for AchievementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CollaboratorOp
// ---------------------------------------------------------------------------

/// The external call a collaborator failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CollaboratorOp {
    InitializeAttempt,
    SaveNotebookEntry,
    CompleteAttempt,
    TriggerAchievementCheck,
}

impl CollaboratorOp {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InitializeAttempt => "initialize_attempt",
            Self::SaveNotebookEntry => "save_notebook_entry",
            Self::CompleteAttempt => "complete_attempt",
            Self::TriggerAchievementCheck => "trigger_achievement_check",
        }
    }
}

impl fmt::Display for CollaboratorOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EntityType
// ---------------------------------------------------------------------------

/// Persisted entity kinds, as recorded in the JSONL trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Attempt,
    NotebookEntry,
    Achievement,
}

impl EntityType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Attempt => "attempt",
            Self::NotebookEntry => "notebook_entry",
            Self::Achievement => "achievement",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TrailOp
// ---------------------------------------------------------------------------

/// Kind of mutation recorded in the JSONL trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TrailOp {
    Create,
    Append,
    Complete,
    Award,
}

impl TrailOp {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Append => "append",
            Self::Complete => "complete",
            Self::Award => "award",
        }
    }
}

impl fmt::Display for TrailOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_status_transitions() {
        assert!(SessionStatus::Active.can_transition_to(SessionStatus::Completed));
        assert!(!SessionStatus::Completed.can_transition_to(SessionStatus::Active));
        assert!(!SessionStatus::Completed.can_transition_to(SessionStatus::Completed));
    }

    #[test]
    fn step_policy_free_allows_any_jump() {
        assert!(StepPolicy::Free.permits(2, 0, 2));
        assert!(StepPolicy::Free.permits(0, 5, 0));
    }

    #[test]
    fn step_policy_forward_only_blocks_backwards() {
        assert!(StepPolicy::ForwardOnly.permits(1, 3, 1));
        assert!(!StepPolicy::ForwardOnly.permits(2, 1, 2));
    }

    #[test]
    fn step_policy_sequential_allows_one_past_furthest() {
        assert!(StepPolicy::Sequential.permits(0, 1, 0));
        assert!(!StepPolicy::Sequential.permits(0, 2, 0));
        assert!(StepPolicy::Sequential.permits(1, 0, 3));
        assert!(StepPolicy::Sequential.permits(0, 4, 3));
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&StepPolicy::ForwardOnly).unwrap();
        assert_eq!(json, "\"forward_only\"");
        let kind: AchievementKind = serde_json::from_str("\"perfect_score\"").unwrap();
        assert_eq!(kind, AchievementKind::PerfectScore);
    }

    #[test]
    fn display_matches_as_str() {
        for kind in AchievementKind::ALL {
            assert_eq!(kind.to_string(), kind.as_str());
        }
        assert_eq!(ScorePolicy::Clamp.to_string(), "clamp");
        assert_eq!(CollaboratorOp::CompleteAttempt.to_string(), "complete_attempt");
    }
}
