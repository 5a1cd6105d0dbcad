//! Score validation and pass/fail evaluation.

use lab_core::enums::ScorePolicy;
use serde::Serialize;

use crate::error::EngineError;

/// A validated score and whether it meets the passing threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreOutcome {
    pub score: u8,
    pub passed: bool,
}

/// Per-exercise passing threshold plus the out-of-range policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringGate {
    passing_score: u8,
    policy: ScorePolicy,
}

impl ScoringGate {
    /// # Errors
    ///
    /// Returns `EngineError::InvalidThreshold` if `passing_score` is outside `0..=100`.
    pub fn new(passing_score: i64, policy: ScorePolicy) -> Result<Self, EngineError> {
        let passing_score = u8::try_from(passing_score)
            .ok()
            .filter(|s| *s <= 100)
            .ok_or(EngineError::InvalidThreshold {
                threshold: passing_score,
            })?;
        Ok(Self {
            passing_score,
            policy,
        })
    }

    /// Validate `score` and compare it with the threshold. Passing is inclusive.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidScore` for an out-of-range score under
    /// `ScorePolicy::Reject`.
    pub fn evaluate(&self, score: i64) -> Result<ScoreOutcome, EngineError> {
        let score = match self.policy {
            ScorePolicy::Reject => u8::try_from(score)
                .ok()
                .filter(|s| *s <= 100)
                .ok_or(EngineError::InvalidScore { score })?,
            ScorePolicy::Clamp => u8::try_from(score.clamp(0, 100)).unwrap_or_default(),
        };
        Ok(ScoreOutcome {
            score,
            passed: score >= self.passing_score,
        })
    }

    #[must_use]
    pub const fn passing_score(&self) -> u8 {
        self.passing_score
    }

    #[must_use]
    pub const fn policy(&self) -> ScorePolicy {
        self.policy
    }
}
