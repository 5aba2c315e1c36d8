use async_trait::async_trait;
use machine_core_db::models::machine::OperatorAssignmentModel;
use machine_core_db::repository::create::Create;
use sqlx::Postgres;
use std::error::Error;

use super::repo_impl::OperatorAssignmentRepositoryImpl;

impl OperatorAssignmentRepositoryImpl {
    pub(super) async fn create_impl(
        repo: &OperatorAssignmentRepositoryImpl,
        item: OperatorAssignmentModel,
    ) -> Result<OperatorAssignmentModel, Box<dyn Error + Send + Sync>> {
        {
            let mut tx = repo.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

            // The (machine_id, profile_id) unique constraint surfaces
            // duplicate assignments as a constraint violation.
            sqlx::query(
                r#"
                INSERT INTO machine_operator (id, machine_id, profile_id, assigned_at)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(item.id)
            .bind(item.machine_id)
            .bind(item.profile_id)
            .bind(item.assigned_at)
            .execute(&mut **transaction)
            .await?;
        }

        Ok(item)
    }
}

#[async_trait]
impl Create<Postgres, OperatorAssignmentModel> for OperatorAssignmentRepositoryImpl {
    async fn create(
        &self,
        item: OperatorAssignmentModel,
    ) -> Result<OperatorAssignmentModel, Box<dyn Error + Send + Sync>> {
        Self::create_impl(self, item).await
    }
}
