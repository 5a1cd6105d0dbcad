//! # lab-db
//!
//! libSQL persistence for labrun.
//!
//! Stores attempts, their notebook entries, and awarded achievements, and
//! implements the engine's `AttemptStore` and `AchievementEvaluator` seams on
//! top of them. Every mutation is mirrored to a per-attempt JSONL trail.
//!
//! Uses the `libsql` crate (C `SQLite` fork, v0.9.29) in local mode.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;
mod store;
pub mod trail;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::Builder;

/// Central database handle.
///
/// Wraps a libSQL database and connection. Provides ID generation; repository
/// methods live on [`service::LabService`].
pub struct LabDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl LabDb {
    /// Open a local database at the given path, or `":memory:"`.
    ///
    /// Runs migrations automatically on open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let lab_db = Self { db, conn };
        lab_db.run_migrations().await?;
        tracing::debug!(path, "db: opened");
        Ok(lab_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID via libSQL. Returns e.g. `"att-a3f8b2c1"`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"),
                (),
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}
