use machine_core_api::domain::MachineFilter;
use machine_core_db::models::status::StatusHistoryModel;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::StatusHistoryRepositoryImpl;
use crate::utils::TryFromRow;

const DEFAULT_LIMIT: i64 = 200;

impl StatusHistoryRepositoryImpl {
    /// History records visible under the scope filter, newest first.
    /// `machine_id` narrows to a single machine; the scope filter still
    /// applies on top of it.
    pub async fn list_in_scope(
        &self,
        filter: &MachineFilter,
        machine_id: Option<Uuid>,
        limit: Option<i64>,
    ) -> Result<Vec<StatusHistoryModel>, Box<dyn Error + Send + Sync>> {
        if filter.matches_nothing() {
            return Ok(Vec::new());
        }

        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        let rows = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

            match filter {
                MachineFilter::All => {
                    sqlx::query(
                        r#"
                        SELECT * FROM status_history
                        WHERE ($1::uuid IS NULL OR machine_id = $1)
                        ORDER BY changed_at DESC
                        LIMIT $2
                        "#,
                    )
                    .bind(machine_id)
                    .bind(limit)
                    .fetch_all(&mut **transaction)
                    .await?
                }
                MachineFilter::ByDepartment(ids) => {
                    let ids: Vec<Uuid> = ids.iter().copied().collect();
                    sqlx::query(
                        r#"
                        SELECT h.* FROM status_history h
                        JOIN machine m ON m.id = h.machine_id
                        WHERE m.department_id = ANY($1)
                          AND ($2::uuid IS NULL OR h.machine_id = $2)
                        ORDER BY h.changed_at DESC
                        LIMIT $3
                        "#,
                    )
                    .bind(&ids)
                    .bind(machine_id)
                    .bind(limit)
                    .fetch_all(&mut **transaction)
                    .await?
                }
                MachineFilter::ById(ids) => {
                    let ids: Vec<Uuid> = ids.iter().copied().collect();
                    sqlx::query(
                        r#"
                        SELECT * FROM status_history
                        WHERE machine_id = ANY($1)
                          AND ($2::uuid IS NULL OR machine_id = $2)
                        ORDER BY changed_at DESC
                        LIMIT $3
                        "#,
                    )
                    .bind(&ids)
                    .bind(machine_id)
                    .bind(limit)
                    .fetch_all(&mut **transaction)
                    .await?
                }
                MachineFilter::Nothing => Vec::new(),
            }
        };

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(StatusHistoryModel::try_from_row(&row)?);
        }
        Ok(items)
    }
}
