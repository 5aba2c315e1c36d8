use async_trait::async_trait;
use machine_core_db::models::directory::ProfileModel;
use machine_core_db::repository::load::Load;
use sqlx::postgres::PgRow;
use sqlx::{Postgres, Row};
use std::error::Error;
use uuid::Uuid;

use crate::executor::Executor;
use crate::utils::{get_heapless_string, TryFromRow};

pub struct ProfileRepositoryImpl {
    pub executor: Executor,
}

impl ProfileRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

impl TryFromRow<PgRow> for ProfileModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(ProfileModel {
            id: row.get("id"),
            display_name: get_heapless_string(row, "display_name")?,
            role: row.try_get("role")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl Load<Postgres, ProfileModel> for ProfileRepositoryImpl {
    async fn load(
        &self,
        id: Uuid,
    ) -> Result<Option<ProfileModel>, Box<dyn Error + Send + Sync>> {
        let row = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
            sqlx::query(r#"SELECT * FROM profile WHERE id = $1"#)
                .bind(id)
                .fetch_optional(&mut **transaction)
                .await?
        };
        row.as_ref().map(ProfileModel::try_from_row).transpose()
    }
}
