//! Shared test utilities for lab-db unit tests.

use std::path::PathBuf;

use lab_core::entities::AttemptKey;

use crate::LabDb;
use crate::service::LabService;
use crate::trail::writer::TrailWriter;

/// In-memory service with the trail disabled.
pub async fn test_service() -> LabService {
    let db = LabDb::open_local(":memory:").await.unwrap();
    LabService::from_db(db, TrailWriter::disabled())
}

/// In-memory service writing its trail under `trail_dir`.
pub async fn test_service_with_trail(trail_dir: PathBuf) -> LabService {
    let db = LabDb::open_local(":memory:").await.unwrap();
    LabService::from_db(db, TrailWriter::new(trail_dir).unwrap())
}

pub fn key(participant: &str, exercise: &str) -> AttemptKey {
    AttemptKey::new(participant, exercise)
}
