use async_trait::async_trait;
use machine_core_db::models::status::StatusTypeModel;
use machine_core_db::repository::load::Load;
use sqlx::postgres::PgRow;
use sqlx::{Postgres, Row};
use std::error::Error;
use uuid::Uuid;

use crate::executor::Executor;
use crate::utils::{get_heapless_string, TryFromRow};

pub struct StatusTypeRepositoryImpl {
    pub executor: Executor,
}

impl StatusTypeRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }

    /// The seeded default entry; machines fall back to its name when they
    /// have no history yet.
    pub async fn find_default(
        &self,
    ) -> Result<Option<StatusTypeModel>, Box<dyn Error + Send + Sync>> {
        let row = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
            sqlx::query(
                r#"
                SELECT * FROM status_type
                WHERE is_default AND is_active
                ORDER BY display_order, name
                LIMIT 1
                "#,
            )
            .fetch_optional(&mut **transaction)
            .await?
        };
        row.as_ref().map(StatusTypeModel::try_from_row).transpose()
    }

    /// Whether `name` is an active catalog entry. Used only to log
    /// uncatalogued status values; writes are not rejected on it.
    pub async fn is_active_name(
        &self,
        name: &str,
    ) -> Result<bool, Box<dyn Error + Send + Sync>> {
        let row = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
            sqlx::query(r#"SELECT 1 AS one FROM status_type WHERE name = $1 AND is_active"#)
                .bind(name)
                .fetch_optional(&mut **transaction)
                .await?
        };
        Ok(row.is_some())
    }
}

impl TryFromRow<PgRow> for StatusTypeModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(StatusTypeModel {
            id: row.get("id"),
            name: get_heapless_string(row, "name")?,
            color: get_heapless_string(row, "color")?,
            is_default: row.try_get("is_default")?,
            is_active: row.try_get("is_active")?,
            display_order: row.try_get("display_order")?,
        })
    }
}

#[async_trait]
impl Load<Postgres, StatusTypeModel> for StatusTypeRepositoryImpl {
    async fn load(
        &self,
        id: Uuid,
    ) -> Result<Option<StatusTypeModel>, Box<dyn Error + Send + Sync>> {
        let row = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
            sqlx::query(r#"SELECT * FROM status_type WHERE id = $1"#)
                .bind(id)
                .fetch_optional(&mut **transaction)
                .await?
        };
        row.as_ref().map(StatusTypeModel::try_from_row).transpose()
    }
}
