use machine_core_api::domain::MachineFilter;
use machine_core_db::models::machine::MachineModel;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::MachineRepositoryImpl;
use crate::utils::TryFromRow;

impl MachineRepositoryImpl {
    /// Machines matching the resolved scope, ordered by code. An empty id
    /// set short-circuits to an empty result instead of widening the query.
    pub async fn list_in_scope(
        &self,
        filter: &MachineFilter,
    ) -> Result<Vec<MachineModel>, Box<dyn Error + Send + Sync>> {
        if filter.matches_nothing() {
            return Ok(Vec::new());
        }

        let rows = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

            match filter {
                MachineFilter::All => {
                    sqlx::query(r#"SELECT * FROM machine ORDER BY code"#)
                        .fetch_all(&mut **transaction)
                        .await?
                }
                MachineFilter::ByDepartment(ids) => {
                    let ids: Vec<Uuid> = ids.iter().copied().collect();
                    sqlx::query(
                        r#"SELECT * FROM machine WHERE department_id = ANY($1) ORDER BY code"#,
                    )
                    .bind(&ids)
                    .fetch_all(&mut **transaction)
                    .await?
                }
                MachineFilter::ById(ids) => {
                    let ids: Vec<Uuid> = ids.iter().copied().collect();
                    sqlx::query(r#"SELECT * FROM machine WHERE id = ANY($1) ORDER BY code"#)
                        .bind(&ids)
                        .fetch_all(&mut **transaction)
                        .await?
                }
                // matches_nothing() already returned.
                MachineFilter::Nothing => Vec::new(),
            }
        };

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(MachineModel::try_from_row(&row)?);
        }
        Ok(items)
    }
}
