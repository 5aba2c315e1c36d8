use async_trait::async_trait;
use machine_core_db::models::directory::LeaderAssignmentModel;
use machine_core_db::repository::create::Create;
use sqlx::Postgres;
use std::error::Error;

use super::repo_impl::LeaderAssignmentRepositoryImpl;

impl LeaderAssignmentRepositoryImpl {
    pub(super) async fn create_impl(
        repo: &LeaderAssignmentRepositoryImpl,
        item: LeaderAssignmentModel,
    ) -> Result<LeaderAssignmentModel, Box<dyn Error + Send + Sync>> {
        {
            let mut tx = repo.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

            sqlx::query(
                r#"
                INSERT INTO department_leader (id, department_id, profile_id, assigned_at)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(item.id)
            .bind(item.department_id)
            .bind(item.profile_id)
            .bind(item.assigned_at)
            .execute(&mut **transaction)
            .await?;
        }

        Ok(item)
    }
}

#[async_trait]
impl Create<Postgres, LeaderAssignmentModel> for LeaderAssignmentRepositoryImpl {
    async fn create(
        &self,
        item: LeaderAssignmentModel,
    ) -> Result<LeaderAssignmentModel, Box<dyn Error + Send + Sync>> {
        Self::create_impl(self, item).await
    }
}
