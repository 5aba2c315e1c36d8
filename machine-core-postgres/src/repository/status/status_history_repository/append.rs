use chrono::Utc;
use machine_core_db::models::status::StatusHistoryModel;
use sqlx::Row;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::StatusHistoryRepositoryImpl;

impl StatusHistoryRepositoryImpl {
    /// The compound status write. Within the shared transaction:
    /// lock the machine row, read its current status, insert the history
    /// record with that status as `previous_status`, then move the
    /// machine's `current_status` and last-updated columns.
    ///
    /// Concurrent changes to the same machine serialize on the row lock,
    /// so each record's `previous_status` is exactly the status it
    /// replaced and the machine always matches its newest record. Both
    /// writes commit or neither does.
    ///
    /// Returns `Ok(None)` when the machine does not exist.
    pub async fn append(
        &self,
        machine_id: Uuid,
        status: &str,
        comment: Option<&str>,
        changed_by: Uuid,
    ) -> Result<Option<StatusHistoryModel>, Box<dyn Error + Send + Sync>> {
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

        let locked = sqlx::query(
            r#"SELECT current_status FROM machine WHERE id = $1 FOR UPDATE"#,
        )
        .bind(machine_id)
        .fetch_optional(&mut **transaction)
        .await?;

        let previous_status: String = match locked {
            Some(row) => row.try_get("current_status")?,
            None => return Ok(None),
        };

        let record = StatusHistoryModel {
            id: Uuid::new_v4(),
            machine_id,
            previous_status,
            status: status.to_string(),
            comment: comment.map(str::to_string),
            changed_by,
            changed_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO status_history
                (id, machine_id, previous_status, status, comment, changed_by, changed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(record.id)
        .bind(record.machine_id)
        .bind(record.previous_status.as_str())
        .bind(record.status.as_str())
        .bind(record.comment.as_deref())
        .bind(record.changed_by)
        .bind(record.changed_at)
        .execute(&mut **transaction)
        .await?;

        sqlx::query(
            r#"
            UPDATE machine
            SET current_status = $2, last_updated_by = $3, last_updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(machine_id)
        .bind(record.status.as_str())
        .bind(record.changed_by)
        .bind(record.changed_at)
        .execute(&mut **transaction)
        .await?;

        Ok(Some(record))
    }
}
