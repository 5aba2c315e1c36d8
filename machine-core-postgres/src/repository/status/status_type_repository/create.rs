use async_trait::async_trait;
use machine_core_db::models::status::StatusTypeModel;
use machine_core_db::repository::create::Create;
use sqlx::Postgres;
use std::error::Error;

use super::repo_impl::StatusTypeRepositoryImpl;

impl StatusTypeRepositoryImpl {
    pub(super) async fn create_impl(
        repo: &StatusTypeRepositoryImpl,
        item: StatusTypeModel,
    ) -> Result<StatusTypeModel, Box<dyn Error + Send + Sync>> {
        {
            let mut tx = repo.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

            sqlx::query(
                r#"
                INSERT INTO status_type (id, name, color, is_default, is_active, display_order)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(item.id)
            .bind(item.name.as_str())
            .bind(item.color.as_str())
            .bind(item.is_default)
            .bind(item.is_active)
            .bind(item.display_order)
            .execute(&mut **transaction)
            .await?;
        }

        Ok(item)
    }
}

#[async_trait]
impl Create<Postgres, StatusTypeModel> for StatusTypeRepositoryImpl {
    async fn create(
        &self,
        item: StatusTypeModel,
    ) -> Result<StatusTypeModel, Box<dyn Error + Send + Sync>> {
        Self::create_impl(self, item).await
    }
}
