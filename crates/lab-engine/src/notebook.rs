//! Append-only log of timestamped observations.

use chrono::{DateTime, Utc};
use lab_core::entities::NotebookEntry;
use lab_core::ids::{PREFIX_NOTE, generate_id};

use crate::error::EngineError;

/// Ordered notebook entries for one attempt.
///
/// Timestamps never go backwards: if the wall clock steps back between two
/// appends, the new entry reuses the previous entry's timestamp.
#[derive(Debug, Clone, Default)]
pub struct NotebookLog {
    entries: Vec<NotebookEntry>,
}

impl NotebookLog {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Seed the log with entries of a resumed attempt.
    #[must_use]
    pub fn resume(entries: Vec<NotebookEntry>) -> Self {
        Self { entries }
    }

    /// Append an observation stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::EmptyObservation` if `text` is blank.
    pub fn append(
        &mut self,
        text: &str,
        context_tag: Option<&str>,
    ) -> Result<&NotebookEntry, EngineError> {
        self.append_at(text, context_tag, Utc::now())
    }

    pub(crate) fn append_at(
        &mut self,
        text: &str,
        context_tag: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<&NotebookEntry, EngineError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(EngineError::EmptyObservation);
        }
        let context_tag = context_tag
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(String::from);
        let timestamp = self
            .entries
            .last()
            .map_or(now, |last| now.max(last.timestamp));

        self.entries.push(NotebookEntry {
            id: generate_id(PREFIX_NOTE)?,
            timestamp,
            text: text.to_string(),
            context_tag,
        });
        Ok(&self.entries[self.entries.len() - 1])
    }

    #[must_use]
    pub fn entries(&self) -> &[NotebookEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
