//! JSONL trail writer.
//!
//! Appends `TrailOperation` records to per-attempt `{attempt_id}.jsonl` files
//! using `serde_jsonlines::append_json_lines`.

use std::path::{Path, PathBuf};

use lab_core::trail::TrailOperation;

use crate::error::DatabaseError;

/// Appends trail operations to per-attempt JSONL files.
pub struct TrailWriter {
    trail_dir: PathBuf,
    enabled: bool,
}

impl TrailWriter {
    /// Create a writer for `trail_dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the directory cannot be created.
    pub fn new(trail_dir: PathBuf) -> Result<Self, DatabaseError> {
        std::fs::create_dir_all(&trail_dir).map_err(|e| DatabaseError::Other(e.into()))?;
        Ok(Self {
            trail_dir,
            enabled: true,
        })
    }

    /// A writer that drops everything.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            trail_dir: PathBuf::new(),
            enabled: false,
        }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Append `op` to `{trail_dir}/{op.attempt}.jsonl`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the file write fails.
    pub fn append(&self, op: &TrailOperation) -> Result<(), DatabaseError> {
        if !self.enabled {
            return Ok(());
        }
        serde_jsonlines::append_json_lines(self.path_for(&op.attempt), [op])
            .map_err(|e| DatabaseError::Other(e.into()))?;
        Ok(())
    }

    /// Read back an attempt's trail. A missing file is an empty trail.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the file exists but cannot be parsed.
    pub fn read(&self, attempt_id: &str) -> Result<Vec<TrailOperation>, DatabaseError> {
        let path = self.path_for(attempt_id);
        if !self.enabled || !path.exists() {
            return Ok(Vec::new());
        }
        serde_jsonlines::json_lines(&path)
            .map_err(|e| DatabaseError::Other(e.into()))?
            .collect::<std::io::Result<Vec<TrailOperation>>>()
            .map_err(|e| DatabaseError::Query(format!("{}: {e}", path.display())))
    }

    #[must_use]
    pub fn trail_dir(&self) -> &Path {
        &self.trail_dir
    }

    fn path_for(&self, attempt_id: &str) -> PathBuf {
        self.trail_dir.join(format!("{attempt_id}.jsonl"))
    }
}

#[cfg(test)]
mod tests {
    use lab_core::enums::{EntityType, TrailOp};
    use tempfile::TempDir;

    use super::*;

    fn op(attempt: &str, id: &str) -> TrailOperation {
        TrailOperation {
            v: 1,
            ts: "2026-10-15T08:00:00Z".into(),
            attempt: attempt.into(),
            op: TrailOp::Append,
            entity: EntityType::NotebookEntry,
            id: id.into(),
            data: serde_json::json!({"text": "bubbles at the cathode"}),
        }
    }

    #[test]
    fn appends_to_one_file_per_attempt() {
        let dir = TempDir::new().unwrap();
        let writer = TrailWriter::new(dir.path().join("trail")).unwrap();
        writer.append(&op("att-1", "nte-1")).unwrap();
        writer.append(&op("att-1", "nte-2")).unwrap();
        writer.append(&op("att-2", "nte-3")).unwrap();

        let ids: Vec<_> = writer.read("att-1").unwrap().into_iter().map(|o| o.id).collect();
        assert_eq!(ids, vec!["nte-1", "nte-2"]);
        assert_eq!(writer.read("att-2").unwrap().len(), 1);
        assert!(writer.read("att-3").unwrap().is_empty());
    }

    #[test]
    fn disabled_writer_is_a_noop() {
        let writer = TrailWriter::disabled();
        assert!(!writer.is_enabled());
        writer.append(&op("att-1", "nte-1")).unwrap();
        assert!(writer.read("att-1").unwrap().is_empty());
    }
}
