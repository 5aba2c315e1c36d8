use async_trait::async_trait;
use machine_core_db::models::machine::MachineModel;
use machine_core_db::repository::load::Load;
use sqlx::postgres::PgRow;
use sqlx::{Postgres, Row};
use std::error::Error;
use uuid::Uuid;

use crate::executor::Executor;
use crate::utils::{get_heapless_string, TryFromRow};

pub struct MachineRepositoryImpl {
    pub executor: Executor,
}

impl MachineRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

impl TryFromRow<PgRow> for MachineModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(MachineModel {
            id: row.get("id"),
            code: get_heapless_string(row, "code")?,
            name: get_heapless_string(row, "name")?,
            description: row.try_get("description")?,
            current_status: row.try_get("current_status")?,
            department_id: row.try_get("department_id")?,
            last_updated_by: row.try_get("last_updated_by")?,
            last_updated_at: row.try_get("last_updated_at")?,
        })
    }
}

#[async_trait]
impl Load<Postgres, MachineModel> for MachineRepositoryImpl {
    async fn load(
        &self,
        id: Uuid,
    ) -> Result<Option<MachineModel>, Box<dyn Error + Send + Sync>> {
        let row = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
            sqlx::query(r#"SELECT * FROM machine WHERE id = $1"#)
                .bind(id)
                .fetch_optional(&mut **transaction)
                .await?
        };
        row.as_ref().map(MachineModel::try_from_row).transpose()
    }
}

