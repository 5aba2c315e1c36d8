use async_trait::async_trait;
use machine_core_db::models::directory::DepartmentModel;
use machine_core_db::repository::update::Update;
use sqlx::Postgres;
use std::error::Error;

use super::repo_impl::DepartmentRepositoryImpl;

impl DepartmentRepositoryImpl {
    pub(super) async fn update_impl(
        repo: &DepartmentRepositoryImpl,
        item: DepartmentModel,
    ) -> Result<DepartmentModel, Box<dyn Error + Send + Sync>> {
        let affected = {
            let mut tx = repo.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

            sqlx::query(
                r#"UPDATE department SET name = $2, description = $3 WHERE id = $1"#,
            )
            .bind(item.id)
            .bind(item.name.as_str())
            .bind(item.description.as_deref())
            .execute(&mut **transaction)
            .await?
            .rows_affected()
        };

        if affected == 0 {
            return Err(Box::new(sqlx::Error::RowNotFound));
        }
        Ok(item)
    }
}

#[async_trait]
impl Update<Postgres, DepartmentModel> for DepartmentRepositoryImpl {
    async fn update(
        &self,
        item: DepartmentModel,
    ) -> Result<DepartmentModel, Box<dyn Error + Send + Sync>> {
        Self::update_impl(self, item).await
    }
}
