use async_trait::async_trait;
use machine_core_db::models::status::StatusTypeModel;
use machine_core_db::repository::update::Update;
use sqlx::Postgres;
use std::error::Error;

use super::repo_impl::StatusTypeRepositoryImpl;

impl StatusTypeRepositoryImpl {
    pub(super) async fn update_impl(
        repo: &StatusTypeRepositoryImpl,
        item: StatusTypeModel,
    ) -> Result<StatusTypeModel, Box<dyn Error + Send + Sync>> {
        let affected = {
            let mut tx = repo.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

            // is_default never changes after seeding; deactivation is the
            // supported way to retire a default entry.
            sqlx::query(
                r#"
                UPDATE status_type
                SET name = $2, color = $3, is_active = $4, display_order = $5
                WHERE id = $1
                "#,
            )
            .bind(item.id)
            .bind(item.name.as_str())
            .bind(item.color.as_str())
            .bind(item.is_active)
            .bind(item.display_order)
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
impl Update<Postgres, StatusTypeModel> for StatusTypeRepositoryImpl {
    async fn update(
        &self,
        item: StatusTypeModel,
    ) -> Result<StatusTypeModel, Box<dyn Error + Send + Sync>> {
        Self::update_impl(self, item).await
    }
}
