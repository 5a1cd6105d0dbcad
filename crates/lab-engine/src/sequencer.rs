//! Ordered step list with index resolution and jump policy.

use std::collections::HashSet;

use lab_core::entities::StepConfig;
use lab_core::enums::StepPolicy;

use crate::error::EngineError;

/// Holds an exercise's steps in configured order.
#[derive(Debug, Clone)]
pub struct StepSequencer {
    steps: Vec<StepConfig>,
    policy: StepPolicy,
}

impl StepSequencer {
    /// # Errors
    ///
    /// Returns `EngineError::NoSteps` for an empty list and
    /// `EngineError::DuplicateStep` if two steps share an id.
    pub fn new(steps: Vec<StepConfig>, policy: StepPolicy) -> Result<Self, EngineError> {
        if steps.is_empty() {
            return Err(EngineError::NoSteps);
        }
        let mut seen = HashSet::with_capacity(steps.len());
        for step in &steps {
            if !seen.insert(step.id.as_str()) {
                return Err(EngineError::DuplicateStep {
                    step_id: step.id.clone(),
                });
            }
        }
        Ok(Self { steps, policy })
    }

    /// Position of `step_id` in the configured order.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::UnknownStep` if the id is not configured.
    pub fn index_of(&self, step_id: &str) -> Result<usize, EngineError> {
        self.steps
            .iter()
            .position(|step| step.id == step_id)
            .ok_or_else(|| EngineError::UnknownStep {
                step_id: step_id.to_string(),
            })
    }

    /// Resolve `step_id` and check the jump from `current` against the policy.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::UnknownStep` or `EngineError::StepNotAllowed`.
    pub fn resolve_jump(
        &self,
        current: usize,
        furthest: usize,
        step_id: &str,
    ) -> Result<usize, EngineError> {
        let target = self.index_of(step_id)?;
        if !self.policy.permits(current, target, furthest) {
            return Err(EngineError::StepNotAllowed {
                from: self.steps[current].id.clone(),
                to: step_id.to_string(),
                policy: self.policy,
            });
        }
        Ok(target)
    }

    #[must_use]
    pub fn step(&self, index: usize) -> Option<&StepConfig> {
        self.steps.get(index)
    }

    #[must_use]
    pub fn steps(&self) -> &[StepConfig] {
        &self.steps
    }

    #[must_use]
    pub const fn policy(&self) -> StepPolicy {
        self.policy
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false: construction rejects empty step lists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps(ids: &[&str]) -> Vec<StepConfig> {
        ids.iter().map(|id| StepConfig::new(*id, id.to_uppercase())).collect()
    }

    #[test]
    fn index_of_follows_configured_order() {
        let seq = StepSequencer::new(steps(&["intro", "work", "conclude"]), StepPolicy::Free).unwrap();
        assert_eq!(seq.index_of("intro").unwrap(), 0);
        assert_eq!(seq.index_of("conclude").unwrap(), 2);
    }

    #[test]
    fn unknown_step_is_rejected() {
        let seq = StepSequencer::new(steps(&["intro"]), StepPolicy::Free).unwrap();
        let err = seq.index_of("outro").unwrap_err();
        assert!(matches!(err, EngineError::UnknownStep { step_id } if step_id == "outro"));
    }

    #[test]
    fn empty_and_duplicate_lists_are_rejected() {
        assert!(matches!(
            StepSequencer::new(Vec::new(), StepPolicy::Free),
            Err(EngineError::NoSteps)
        ));
        assert!(matches!(
            StepSequencer::new(steps(&["a", "b", "a"]), StepPolicy::Free),
            Err(EngineError::DuplicateStep { step_id }) if step_id == "a"
        ));
    }

    #[test]
    fn forward_only_rejects_backward_jump() {
        let seq = StepSequencer::new(steps(&["a", "b", "c"]), StepPolicy::ForwardOnly).unwrap();
        assert_eq!(seq.resolve_jump(0, 0, "c").unwrap(), 2);
        let err = seq.resolve_jump(2, 2, "a").unwrap_err();
        assert!(matches!(err, EngineError::StepNotAllowed { from, to, .. } if from == "c" && to == "a"));
    }

    #[test]
    fn sequential_rejects_skipping_ahead() {
        let seq = StepSequencer::new(steps(&["a", "b", "c"]), StepPolicy::Sequential).unwrap();
        assert!(seq.resolve_jump(0, 0, "c").is_err());
        assert_eq!(seq.resolve_jump(0, 0, "b").unwrap(), 1);
        assert_eq!(seq.resolve_jump(0, 2, "c").unwrap(), 2);
    }
}
