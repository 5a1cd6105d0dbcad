//! Achievement repository.
//!
//! Awards are evaluated over a participant's completed attempts with the shared
//! rules in `lab_core::achievements`. The `(participant_id, kind)` primary key
//! keeps each kind to a single award.

use chrono::Utc;

use lab_core::achievements;
use lab_core::entities::Achievement;
use lab_core::enums::{EntityType, TrailOp};
use lab_core::trail::TrailOperation;

use crate::error::DatabaseError;
use crate::helpers::{format_datetime, parse_datetime, parse_enum, to_trail_data};
use crate::service::LabService;

impl LabService {
    /// Award whatever `participant_id` has newly earned.
    ///
    /// Returns only the achievements inserted by this call.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if database operations fail.
    pub async fn evaluate_achievements(
        &self,
        participant_id: &str,
    ) -> Result<Vec<Achievement>, DatabaseError> {
        let history = self.completed_attempts(participant_id).await?;
        let now = Utc::now();
        let mut awarded = Vec::new();

        for (kind, attempt_id) in achievements::earned(&history) {
            let inserted = self
                .db()
                .conn()
                .execute(
                    "INSERT OR IGNORE INTO achievements (participant_id, kind, attempt_id, awarded_at)
                     VALUES (?1, ?2, ?3, ?4)",
                    libsql::params![participant_id, kind.as_str(), attempt_id.as_str(), format_datetime(&now)],
                )
                .await?;
            if inserted == 0 {
                continue;
            }

            let achievement = Achievement {
                participant_id: participant_id.to_string(),
                kind,
                attempt_id,
                awarded_at: now,
            };
            self.trail().append(&TrailOperation {
                v: 1,
                ts: format_datetime(&now),
                attempt: achievement.attempt_id.clone(),
                op: TrailOp::Award,
                entity: EntityType::Achievement,
                id: format!("{participant_id}:{kind}"),
                data: to_trail_data(&achievement)?,
            })?;
            tracing::info!(participant = participant_id, %kind, "db: achievement awarded");
            awarded.push(achievement);
        }
        Ok(awarded)
    }

    /// Everything awarded to `participant_id`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_achievements(
        &self,
        participant_id: &str,
    ) -> Result<Vec<Achievement>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT participant_id, kind, attempt_id, awarded_at FROM achievements
                 WHERE participant_id = ?1 ORDER BY awarded_at, kind",
                [participant_id],
            )
            .await?;
        let mut list = Vec::new();
        while let Some(row) = rows.next().await? {
            list.push(Achievement {
                participant_id: row.get::<String>(0)?,
                kind: parse_enum(&row.get::<String>(1)?)?,
                attempt_id: row.get::<String>(2)?,
                awarded_at: parse_datetime(&row.get::<String>(3)?)?,
            });
        }
        Ok(list)
    }
}
