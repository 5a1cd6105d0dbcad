//! Service layer pairing database mutations with the JSONL trail.
//!
//! `LabService` wraps `LabDb` (raw database access) and `TrailWriter` (JSONL
//! persistence). All repo methods are implemented as `impl LabService`.

use std::path::PathBuf;

use crate::LabDb;
use crate::error::DatabaseError;
use crate::trail::writer::TrailWriter;

/// Orchestrates database mutations with the JSONL trail.
///
/// Every mutation method executes its SQL first and, only if a row actually
/// changed, appends one `TrailOperation` to the attempt's trail file.
pub struct LabService {
    db: LabDb,
    trail: TrailWriter,
}

impl LabService {
    /// Create a new service wrapping a local database.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to the libSQL database file, or `":memory:"` for tests.
    /// * `trail_dir` - Directory for JSONL trail files. `None` disables the trail.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or the trail
    /// directory cannot be created.
    pub async fn new_local(
        db_path: &str,
        trail_dir: Option<PathBuf>,
    ) -> Result<Self, DatabaseError> {
        let db = LabDb::open_local(db_path).await?;
        let trail = match trail_dir {
            Some(dir) => TrailWriter::new(dir)?,
            None => TrailWriter::disabled(),
        };
        Ok(Self { db, trail })
    }

    /// Create from an existing `LabDb`.
    #[must_use]
    pub const fn from_db(db: LabDb, trail: TrailWriter) -> Self {
        Self { db, trail }
    }

    #[must_use]
    pub const fn db(&self) -> &LabDb {
        &self.db
    }

    #[must_use]
    pub const fn trail(&self) -> &TrailWriter {
        &self.trail
    }
}
