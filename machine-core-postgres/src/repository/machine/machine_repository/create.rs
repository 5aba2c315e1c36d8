use async_trait::async_trait;
use machine_core_db::models::machine::MachineModel;
use machine_core_db::repository::create::Create;
use sqlx::Postgres;
use std::error::Error;

use super::repo_impl::MachineRepositoryImpl;

impl MachineRepositoryImpl {
    pub(super) async fn create_impl(
        repo: &MachineRepositoryImpl,
        item: MachineModel,
    ) -> Result<MachineModel, Box<dyn Error + Send + Sync>> {
        {
            let mut tx = repo.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

            sqlx::query(
                r#"
                INSERT INTO machine (id, code, name, description, current_status, department_id)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(item.id)
            .bind(item.code.as_str())
            .bind(item.name.as_str())
            .bind(item.description.as_deref())
            .bind(item.current_status.as_str())
            .bind(item.department_id)
            .execute(&mut **transaction)
            .await?;
        }

        Ok(item)
    }
}

#[async_trait]
impl Create<Postgres, MachineModel> for MachineRepositoryImpl {
    async fn create(
        &self,
        item: MachineModel,
    ) -> Result<MachineModel, Box<dyn Error + Send + Sync>> {
        Self::create_impl(self, item).await
    }
}
