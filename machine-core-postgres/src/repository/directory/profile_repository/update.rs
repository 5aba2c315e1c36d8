use std::error::Error;
use uuid::Uuid;

use super::repo_impl::ProfileRepositoryImpl;

impl ProfileRepositoryImpl {
    /// Update non-role profile fields. The role column has its own path,
    /// `set_role`.
    pub async fn update_display_name(
        &self,
        id: Uuid,
        display_name: &str,
    ) -> Result<bool, Box<dyn Error + Send + Sync>> {
        let affected = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

            sqlx::query(r#"UPDATE profile SET display_name = $2 WHERE id = $1"#)
                .bind(id)
                .bind(display_name)
                .execute(&mut **transaction)
                .await?
                .rows_affected()
        };

        Ok(affected > 0)
    }
}
