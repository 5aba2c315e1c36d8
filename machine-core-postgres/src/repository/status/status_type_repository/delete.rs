use async_trait::async_trait;
use machine_core_db::models::status::StatusTypeModel;
use machine_core_db::repository::delete::Delete;
use sqlx::Postgres;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::StatusTypeRepositoryImpl;

impl StatusTypeRepositoryImpl {
    pub(super) async fn delete_impl(
        repo: &StatusTypeRepositoryImpl,
        id: Uuid,
    ) -> Result<bool, Box<dyn Error + Send + Sync>> {
        let affected = {
            let mut tx = repo.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

            // The schema trigger raises 23514 for default entries; the
            // guard refuses those before we get here, the trigger is the
            // authoritative backstop.
            sqlx::query(r#"DELETE FROM status_type WHERE id = $1"#)
                .bind(id)
                .execute(&mut **transaction)
                .await?
                .rows_affected()
        };

        Ok(affected > 0)
    }
}

#[async_trait]
impl Delete<Postgres, StatusTypeModel> for StatusTypeRepositoryImpl {
    async fn delete(&self, id: Uuid) -> Result<bool, Box<dyn Error + Send + Sync>> {
        Self::delete_impl(self, id).await
    }
}
