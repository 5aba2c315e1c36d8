use async_trait::async_trait;
use machine_core_db::models::machine::MachineModel;
use machine_core_db::repository::delete::Delete;
use sqlx::Postgres;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::MachineRepositoryImpl;

impl MachineRepositoryImpl {
    pub(super) async fn delete_impl(
        repo: &MachineRepositoryImpl,
        id: Uuid,
    ) -> Result<bool, Box<dyn Error + Send + Sync>> {
        let affected = {
            let mut tx = repo.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

            // Operator assignments and status history go with the machine
            // via ON DELETE CASCADE.
            sqlx::query(r#"DELETE FROM machine WHERE id = $1"#)
                .bind(id)
                .execute(&mut **transaction)
                .await?
                .rows_affected()
        };

        Ok(affected > 0)
    }
}

#[async_trait]
impl Delete<Postgres, MachineModel> for MachineRepositoryImpl {
    async fn delete(&self, id: Uuid) -> Result<bool, Box<dyn Error + Send + Sync>> {
        Self::delete_impl(self, id).await
    }
}
