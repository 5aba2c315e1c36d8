use machine_core_db::models::directory::DepartmentModel;
use std::error::Error;

use super::repo_impl::DepartmentRepositoryImpl;
use crate::utils::TryFromRow;

impl DepartmentRepositoryImpl {
    /// Departments are publicly visible; listing is unfiltered, by name.
    pub async fn list_all(&self) -> Result<Vec<DepartmentModel>, Box<dyn Error + Send + Sync>> {
        let rows = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
            sqlx::query(r#"SELECT * FROM department ORDER BY name"#)
                .fetch_all(&mut **transaction)
                .await?
        };

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(DepartmentModel::try_from_row(&row)?);
        }
        Ok(items)
    }
}
