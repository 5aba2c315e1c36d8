use machine_core_db::models::status::StatusTypeModel;
use std::error::Error;

use super::repo_impl::StatusTypeRepositoryImpl;
use crate::utils::TryFromRow;

impl StatusTypeRepositoryImpl {
    /// Catalog in declared display order, name as tiebreak.
    pub async fn list_ordered(
        &self,
        active_only: bool,
    ) -> Result<Vec<StatusTypeModel>, Box<dyn Error + Send + Sync>> {
        let rows = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

            sqlx::query(
                r#"
                SELECT * FROM status_type
                WHERE NOT $1 OR is_active
                ORDER BY display_order, name
                "#,
            )
            .bind(active_only)
            .fetch_all(&mut **transaction)
            .await?
        };

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(StatusTypeModel::try_from_row(&row)?);
        }
        Ok(items)
    }
}
