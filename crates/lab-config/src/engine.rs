//! Session engine configuration.

use lab_core::enums::{ScorePolicy, StepPolicy};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default elapsed-time tick interval in milliseconds.
const fn default_tick_interval_ms() -> u64 {
    1000
}

/// Default passing score for exercises that don't set one.
const fn default_passing_score() -> u8 {
    70
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    /// How often the elapsed-time counter ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// What to do with a completion score outside `0..=100`.
    #[serde(default)]
    pub score_policy: ScorePolicy,

    /// Step jump policy for exercises that don't set their own.
    #[serde(default)]
    pub step_policy: StepPolicy,

    /// Passing score for exercises that don't set their own.
    #[serde(default = "default_passing_score")]
    pub default_passing_score: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            score_policy: ScorePolicy::default(),
            step_policy: StepPolicy::default(),
            default_passing_score: default_passing_score(),
        }
    }
}

impl EngineConfig {
    /// Check value ranges figment can't express.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a zero tick interval or a
    /// passing score above 100.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "engine.tick_interval_ms".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.default_passing_score > 100 {
            return Err(ConfigError::InvalidValue {
                field: "engine.default_passing_score".into(),
                reason: format!("{} is outside 0..=100", self.default_passing_score),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = EngineConfig::default();
        assert_eq!(config.tick_interval_ms, 1000);
        assert_eq!(config.score_policy, ScorePolicy::Reject);
        assert_eq!(config.step_policy, StepPolicy::Free);
        assert_eq!(config.default_passing_score, 70);
        config.validate().unwrap();
    }

    #[test]
    fn zero_tick_interval_is_invalid() {
        let config = EngineConfig {
            tick_interval_ms: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("engine.tick_interval_ms"));
    }

    #[test]
    fn passing_score_above_hundred_is_invalid() {
        let config = EngineConfig {
            default_passing_score: 101,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
