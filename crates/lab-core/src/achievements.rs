//! Achievement rules over a participant's attempt history.
//!
//! Rules only look at completed attempts. Each kind is earned by exactly one
//! attempt: the earliest completed one that satisfies it.

use std::collections::HashSet;

use crate::entities::AttemptRecord;
use crate::enums::AchievementKind;

/// Distinct exercises a participant must complete for `FiveLabs`.
pub const FIVE_LABS_THRESHOLD: usize = 5;

/// Notebook entries an attempt needs for `ThoroughNotes`.
pub const THOROUGH_NOTES_THRESHOLD: usize = 5;

/// Every achievement the history earns, paired with the earning attempt's id.
///
/// Incomplete attempts are ignored. Order of `history` does not matter.
#[must_use]
pub fn earned(history: &[AttemptRecord]) -> Vec<(AchievementKind, String)> {
    let mut completed: Vec<&AttemptRecord> =
        history.iter().filter(|a| a.is_completed()).collect();
    completed.sort_by_key(|a| a.completed_at);

    let mut earned = Vec::new();
    if let Some(first) = completed.first() {
        earned.push((AchievementKind::FirstCompletion, first.id.clone()));
    }
    if let Some(perfect) = completed.iter().find(|a| a.score == Some(100)) {
        earned.push((AchievementKind::PerfectScore, perfect.id.clone()));
    }

    let mut exercises = HashSet::new();
    for attempt in &completed {
        exercises.insert(attempt.exercise_id.as_str());
        if exercises.len() == FIVE_LABS_THRESHOLD {
            earned.push((AchievementKind::FiveLabs, attempt.id.clone()));
            break;
        }
    }

    if let Some(thorough) = completed
        .iter()
        .find(|a| a.notebook_entries.len() >= THOROUGH_NOTES_THRESHOLD)
    {
        earned.push((AchievementKind::ThoroughNotes, thorough.id.clone()));
    }
    earned
}
