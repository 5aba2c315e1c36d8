use async_trait::async_trait;
use machine_core_db::models::machine::MachineModel;
use machine_core_db::repository::update::Update;
use sqlx::Postgres;
use std::error::Error;

use super::repo_impl::MachineRepositoryImpl;

impl MachineRepositoryImpl {
    pub(super) async fn update_impl(
        repo: &MachineRepositoryImpl,
        item: MachineModel,
    ) -> Result<MachineModel, Box<dyn Error + Send + Sync>> {
        let affected = {
            let mut tx = repo.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

            // current_status is owned by the compound status write and is
            // deliberately not touched here.
            sqlx::query(
                r#"
                UPDATE machine
                SET name = $2, description = $3, department_id = $4
                WHERE id = $1
                "#,
            )
            .bind(item.id)
            .bind(item.name.as_str())
            .bind(item.description.as_deref())
            .bind(item.department_id)
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
impl Update<Postgres, MachineModel> for MachineRepositoryImpl {
    async fn update(
        &self,
        item: MachineModel,
    ) -> Result<MachineModel, Box<dyn Error + Send + Sync>> {
        Self::update_impl(self, item).await
    }
}
