use async_trait::async_trait;
use machine_core_db::models::status::StatusHistoryModel;
use machine_core_db::repository::load::Load;
use sqlx::postgres::PgRow;
use sqlx::{Postgres, Row};
use std::error::Error;
use uuid::Uuid;

use crate::executor::Executor;
use crate::utils::TryFromRow;

/// The audit trail repository. Deliberately implements no `Update` or
/// `Delete`; the only write path is the compound append.
pub struct StatusHistoryRepositoryImpl {
    pub executor: Executor,
}

impl StatusHistoryRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

impl TryFromRow<PgRow> for StatusHistoryModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(StatusHistoryModel {
            id: row.get("id"),
            machine_id: row.get("machine_id"),
            previous_status: row.try_get("previous_status")?,
            status: row.try_get("status")?,
            comment: row.try_get("comment")?,
            changed_by: row.get("changed_by"),
            changed_at: row.try_get("changed_at")?,
        })
    }
}

#[async_trait]
impl Load<Postgres, StatusHistoryModel> for StatusHistoryRepositoryImpl {
    async fn load(
        &self,
        id: Uuid,
    ) -> Result<Option<StatusHistoryModel>, Box<dyn Error + Send + Sync>> {
        let row = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
            sqlx::query(r#"SELECT * FROM status_history WHERE id = $1"#)
                .bind(id)
                .fetch_optional(&mut **transaction)
                .await?
        };
        row.as_ref().map(StatusHistoryModel::try_from_row).transpose()
    }
}
