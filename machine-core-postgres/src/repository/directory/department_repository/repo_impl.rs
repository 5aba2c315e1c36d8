use async_trait::async_trait;
use machine_core_db::models::directory::DepartmentModel;
use machine_core_db::repository::load::Load;
use sqlx::postgres::PgRow;
use sqlx::{Postgres, Row};
use std::error::Error;
use uuid::Uuid;

use crate::executor::Executor;
use crate::utils::{get_heapless_string, TryFromRow};

pub struct DepartmentRepositoryImpl {
    pub executor: Executor,
}

impl DepartmentRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

impl TryFromRow<PgRow> for DepartmentModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(DepartmentModel {
            id: row.get("id"),
            name: get_heapless_string(row, "name")?,
            description: row.try_get("description")?,
        })
    }
}

#[async_trait]
impl Load<Postgres, DepartmentModel> for DepartmentRepositoryImpl {
    async fn load(
        &self,
        id: Uuid,
    ) -> Result<Option<DepartmentModel>, Box<dyn Error + Send + Sync>> {
        let row = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
            sqlx::query(r#"SELECT * FROM department WHERE id = $1"#)
                .bind(id)
                .fetch_optional(&mut **transaction)
                .await?
        };
        row.as_ref().map(DepartmentModel::try_from_row).transpose()
    }
}
