//! Notebook entry repository.

use lab_core::entities::NotebookEntry;
use lab_core::enums::{EntityType, TrailOp};
use lab_core::trail::TrailOperation;

use crate::error::DatabaseError;
use crate::helpers::{format_datetime, get_opt_string, parse_datetime, to_trail_data};
use crate::service::LabService;

impl LabService {
    /// Append `entry` to an attempt's notebook. Saving an entry ID that is
    /// already stored does nothing.
    ///
    /// Returns whether a row was inserted.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the insert fails (e.g., unknown attempt).
    pub async fn append_notebook_entry(
        &self,
        attempt_id: &str,
        entry: &NotebookEntry,
    ) -> Result<bool, DatabaseError> {
        let inserted = self
            .db()
            .conn()
            .execute(
                "INSERT INTO notebook_entries (id, attempt_id, seq, text, context_tag, created_at)
                 VALUES (?1, ?2,
                         (SELECT COALESCE(MAX(seq), 0) + 1 FROM notebook_entries WHERE attempt_id = ?2),
                         ?3, ?4, ?5)
                 ON CONFLICT(id) DO NOTHING",
                libsql::params![
                    entry.id.as_str(),
                    attempt_id,
                    entry.text.as_str(),
                    entry.context_tag.as_deref(),
                    format_datetime(&entry.timestamp)
                ],
            )
            .await?;
        if inserted == 0 {
            tracing::debug!(attempt = attempt_id, entry = %entry.id, "db: notebook entry already stored");
            return Ok(false);
        }

        self.trail().append(&TrailOperation {
            v: 1,
            ts: format_datetime(&entry.timestamp),
            attempt: attempt_id.to_string(),
            op: TrailOp::Append,
            entity: EntityType::NotebookEntry,
            id: entry.id.clone(),
            data: to_trail_data(entry)?,
        })?;
        Ok(true)
    }

    /// An attempt's notebook entries in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_notebook_entries(
        &self,
        attempt_id: &str,
    ) -> Result<Vec<NotebookEntry>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, created_at, text, context_tag FROM notebook_entries
                 WHERE attempt_id = ?1 ORDER BY seq",
                [attempt_id],
            )
            .await?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(NotebookEntry {
                id: row.get::<String>(0)?,
                timestamp: parse_datetime(&row.get::<String>(1)?)?,
                text: row.get::<String>(2)?,
                context_tag: get_opt_string(&row, 3)?,
            });
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use pretty_assertions::assert_eq;

    use crate::test_support::{key, test_service};

    use super::*;

    fn entry(id: &str, text: &str, tag: Option<&str>) -> NotebookEntry {
        NotebookEntry {
            id: id.into(),
            timestamp: Utc::now(),
            text: text.into(),
            context_tag: tag.map(String::from),
        }
    }

    #[tokio::test]
    async fn entries_come_back_in_insertion_order() {
        let svc = test_service().await;
        let attempt = svc.start_attempt(&key("stu-1", "ph")).await.unwrap();

        // Later timestamp stored first: order follows insertion, not time.
        let mut late = entry("nte-2", "second", None);
        late.timestamp += Duration::seconds(5);
        svc.append_notebook_entry(&attempt.id, &late).await.unwrap();
        svc.append_notebook_entry(&attempt.id, &entry("nte-1", "first", Some("work")))
            .await
            .unwrap();

        let entries = svc.list_notebook_entries(&attempt.id).await.unwrap();
        let ids: Vec<_> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["nte-2", "nte-1"]);
        assert_eq!(entries[0], late);
        assert_eq!(entries[1].context_tag.as_deref(), Some("work"));
    }

    #[tokio::test]
    async fn duplicate_entry_id_is_ignored() {
        let svc = test_service().await;
        let attempt = svc.start_attempt(&key("stu-1", "ph")).await.unwrap();
        let e = entry("nte-1", "pH 7", None);
        assert!(svc.append_notebook_entry(&attempt.id, &e).await.unwrap());
        assert!(!svc.append_notebook_entry(&attempt.id, &e).await.unwrap());
        assert_eq!(svc.list_notebook_entries(&attempt.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_attempt_is_rejected_by_foreign_key() {
        let svc = test_service().await;
        let result = svc
            .append_notebook_entry("att-missing", &entry("nte-1", "orphan", None))
            .await;
        assert!(result.is_err());
    }
}
