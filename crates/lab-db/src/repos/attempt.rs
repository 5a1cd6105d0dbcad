//! Attempt repository.
//!
//! Start (or resume), complete, get, and list attempts. An attempt is *live*
//! until it has a completion time; the partial unique index `idx_attempts_live`
//! guarantees one live attempt per `(participant, exercise)`.

use chrono::{DateTime, Utc};

use lab_core::entities::{AttemptKey, AttemptRecord};
use lab_core::enums::{EntityType, TrailOp};
use lab_core::ids::PREFIX_ATTEMPT;
use lab_core::trail::TrailOperation;

use crate::error::DatabaseError;
use crate::helpers::{format_datetime, get_opt_score, get_opt_string, parse_datetime, parse_optional_datetime, to_trail_data};
use crate::service::LabService;

const ATTEMPT_COLUMNS: &str = "id, participant_id, exercise_id, started_at, completed_at, score";

impl LabService {
    /// Resume the live attempt for `key`, or create one.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if database operations fail.
    pub async fn start_attempt(&self, key: &AttemptKey) -> Result<AttemptRecord, DatabaseError> {
        if let Some(live) = self.find_live_attempt(key).await? {
            tracing::debug!(attempt = %live.id, %key, "db: resumed live attempt");
            return Ok(live);
        }

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_ATTEMPT).await?;
        let inserted = self
            .db()
            .conn()
            .execute(
                "INSERT INTO attempts (id, participant_id, exercise_id, started_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT DO NOTHING",
                libsql::params![
                    id.as_str(),
                    key.participant_id.as_str(),
                    key.exercise_id.as_str(),
                    format_datetime(&now)
                ],
            )
            .await?;

        if inserted == 0 {
            // Another writer created the live attempt between our read and insert.
            return self
                .find_live_attempt(key)
                .await?
                .ok_or(DatabaseError::NoResult);
        }

        let attempt = AttemptRecord::start(id, key, now);
        self.trail().append(&TrailOperation {
            v: 1,
            ts: format_datetime(&now),
            attempt: attempt.id.clone(),
            op: TrailOp::Create,
            entity: EntityType::Attempt,
            id: attempt.id.clone(),
            data: to_trail_data(&attempt)?,
        })?;
        tracing::info!(attempt = %attempt.id, %key, "db: attempt created");
        Ok(attempt)
    }

    /// The live attempt for `key`, with its notebook entries.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn find_live_attempt(
        &self,
        key: &AttemptKey,
    ) -> Result<Option<AttemptRecord>, DatabaseError> {
        let sql = format!(
            "SELECT {ATTEMPT_COLUMNS} FROM attempts
             WHERE participant_id = ?1 AND exercise_id = ?2 AND completed_at IS NULL"
        );
        let mut rows = self
            .db()
            .conn()
            .query(
                &sql,
                libsql::params![key.participant_id.as_str(), key.exercise_id.as_str()],
            )
            .await?;
        let Some(row) = rows.next().await? else {
            return Ok(None);
        };
        let mut attempt = row_to_attempt(&row)?;
        attempt.notebook_entries = self.list_notebook_entries(&attempt.id).await?;
        Ok(Some(attempt))
    }

    /// Finalize the live attempt for `key` at `completed_at`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` if no attempt is live for `key`
    /// or `score` is above 100.
    pub async fn complete_live_attempt(
        &self,
        key: &AttemptKey,
        score: u8,
        completed_at: DateTime<Utc>,
    ) -> Result<AttemptRecord, DatabaseError> {
        let mut attempt = self
            .find_live_attempt(key)
            .await?
            .ok_or_else(|| DatabaseError::InvalidState(format!("no live attempt for {key}")))?;

        attempt
            .complete(score, completed_at)
            .map_err(|e| DatabaseError::InvalidState(e.to_string()))?;

        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE attempts SET completed_at = ?1, score = ?2
                 WHERE id = ?3 AND completed_at IS NULL",
                libsql::params![format_datetime(&completed_at), i64::from(score), attempt.id.as_str()],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::InvalidState(format!(
                "attempt {} was completed concurrently",
                attempt.id
            )));
        }

        self.trail().append(&TrailOperation {
            v: 1,
            ts: format_datetime(&completed_at),
            attempt: attempt.id.clone(),
            op: TrailOp::Complete,
            entity: EntityType::Attempt,
            id: attempt.id.clone(),
            data: serde_json::json!({
                "score": score,
                "completed_at": format_datetime(&completed_at),
            }),
        })?;
        tracing::info!(attempt = %attempt.id, score, "db: attempt completed");
        Ok(attempt)
    }

    /// Get an attempt by ID, with its notebook entries.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the attempt does not exist.
    pub async fn get_attempt(&self, id: &str) -> Result<AttemptRecord, DatabaseError> {
        let sql = format!("SELECT {ATTEMPT_COLUMNS} FROM attempts WHERE id = ?1");
        let mut rows = self.db().conn().query(&sql, [id]).await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let mut attempt = row_to_attempt(&row)?;
        attempt.notebook_entries = self.list_notebook_entries(&attempt.id).await?;
        Ok(attempt)
    }

    /// List attempts, newest first, optionally for one participant.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_attempts(
        &self,
        participant_id: Option<&str>,
        limit: u32,
    ) -> Result<Vec<AttemptRecord>, DatabaseError> {
        let mut rows = match participant_id {
            Some(participant) => {
                let sql = format!(
                    "SELECT {ATTEMPT_COLUMNS} FROM attempts
                     WHERE participant_id = ?1 ORDER BY started_at DESC LIMIT ?2"
                );
                self.db()
                    .conn()
                    .query(&sql, libsql::params![participant, i64::from(limit)])
                    .await?
            }
            None => {
                let sql = format!(
                    "SELECT {ATTEMPT_COLUMNS} FROM attempts ORDER BY started_at DESC LIMIT ?1"
                );
                self.db()
                    .conn()
                    .query(&sql, libsql::params![i64::from(limit)])
                    .await?
            }
        };

        let mut attempts = Vec::new();
        while let Some(row) = rows.next().await? {
            attempts.push(row_to_attempt(&row)?);
        }
        for attempt in &mut attempts {
            attempt.notebook_entries = self.list_notebook_entries(&attempt.id).await?;
        }
        Ok(attempts)
    }

    /// A participant's completed attempts in completion order.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn completed_attempts(
        &self,
        participant_id: &str,
    ) -> Result<Vec<AttemptRecord>, DatabaseError> {
        let sql = format!(
            "SELECT {ATTEMPT_COLUMNS} FROM attempts
             WHERE participant_id = ?1 AND completed_at IS NOT NULL
             ORDER BY completed_at"
        );
        let mut rows = self.db().conn().query(&sql, [participant_id]).await?;
        let mut attempts = Vec::new();
        while let Some(row) = rows.next().await? {
            attempts.push(row_to_attempt(&row)?);
        }
        for attempt in &mut attempts {
            attempt.notebook_entries = self.list_notebook_entries(&attempt.id).await?;
        }
        Ok(attempts)
    }
}

/// Convert a libSQL row (in `ATTEMPT_COLUMNS` order) to an `AttemptRecord`
/// without notebook entries.
fn row_to_attempt(row: &libsql::Row) -> Result<AttemptRecord, DatabaseError> {
    Ok(AttemptRecord {
        id: row.get::<String>(0)?,
        participant_id: row.get::<String>(1)?,
        exercise_id: row.get::<String>(2)?,
        started_at: parse_datetime(&row.get::<String>(3)?)?,
        completed_at: parse_optional_datetime(get_opt_string(row, 4)?.as_deref())?,
        score: get_opt_score(row, 5)?,
        notebook_entries: Vec::new(),
    })
}
