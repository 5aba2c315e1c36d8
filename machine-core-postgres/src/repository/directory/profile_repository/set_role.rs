use machine_core_api::domain::Role;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::ProfileRepositoryImpl;

impl ProfileRepositoryImpl {
    /// Admin-only role change; the profile_role_changes trigger enforces
    /// the same rule server-side.
    pub async fn set_role(
        &self,
        id: Uuid,
        role: Role,
    ) -> Result<bool, Box<dyn Error + Send + Sync>> {
        let affected = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

            sqlx::query(r#"UPDATE profile SET role = $2 WHERE id = $1"#)
                .bind(id)
                .bind(role)
                .execute(&mut **transaction)
                .await?
                .rows_affected()
        };

        Ok(affected > 0)
    }
}
