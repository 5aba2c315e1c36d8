use async_trait::async_trait;
use machine_core_db::models::directory::DepartmentModel;
use machine_core_db::repository::delete::Delete;
use sqlx::Postgres;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::DepartmentRepositoryImpl;

impl DepartmentRepositoryImpl {
    pub(super) async fn delete_impl(
        repo: &DepartmentRepositoryImpl,
        id: Uuid,
    ) -> Result<bool, Box<dyn Error + Send + Sync>> {
        let affected = {
            let mut tx = repo.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

            // Machines survive with department_id nulled (ON DELETE SET
            // NULL); leader assignments cascade away.
            sqlx::query(r#"DELETE FROM department WHERE id = $1"#)
                .bind(id)
                .execute(&mut **transaction)
                .await?
                .rows_affected()
        };

        Ok(affected > 0)
    }
}

#[async_trait]
impl Delete<Postgres, DepartmentModel> for DepartmentRepositoryImpl {
    async fn delete(&self, id: Uuid) -> Result<bool, Box<dyn Error + Send + Sync>> {
        Self::delete_impl(self, id).await
    }
}
