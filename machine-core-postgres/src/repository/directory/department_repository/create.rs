use async_trait::async_trait;
use machine_core_db::models::directory::DepartmentModel;
use machine_core_db::repository::create::Create;
use sqlx::Postgres;
use std::error::Error;

use super::repo_impl::DepartmentRepositoryImpl;

impl DepartmentRepositoryImpl {
    pub(super) async fn create_impl(
        repo: &DepartmentRepositoryImpl,
        item: DepartmentModel,
    ) -> Result<DepartmentModel, Box<dyn Error + Send + Sync>> {
        {
            let mut tx = repo.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

            sqlx::query(
                r#"INSERT INTO department (id, name, description) VALUES ($1, $2, $3)"#,
            )
            .bind(item.id)
            .bind(item.name.as_str())
            .bind(item.description.as_deref())
            .execute(&mut **transaction)
            .await?;
        }

        Ok(item)
    }
}

#[async_trait]
impl Create<Postgres, DepartmentModel> for DepartmentRepositoryImpl {
    async fn create(
        &self,
        item: DepartmentModel,
    ) -> Result<DepartmentModel, Box<dyn Error + Send + Sync>> {
        Self::create_impl(self, item).await
    }
}
