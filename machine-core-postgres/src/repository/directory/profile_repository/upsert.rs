use machine_core_db::models::directory::ProfileModel;
use std::error::Error;

use super::repo_impl::ProfileRepositoryImpl;
use crate::utils::TryFromRow;

impl ProfileRepositoryImpl {
    /// First-sign-in creation. An existing profile is returned untouched:
    /// repeated sign-ins never overwrite the display name or role.
    pub async fn upsert(
        &self,
        item: ProfileModel,
    ) -> Result<ProfileModel, Box<dyn Error + Send + Sync>> {
        let row = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

            sqlx::query(
                r#"
                WITH inserted AS (
                    INSERT INTO profile (id, display_name, role, created_at)
                    VALUES ($1, $2, $3, $4)
                    ON CONFLICT (id) DO NOTHING
                    RETURNING *
                )
                SELECT * FROM inserted
                UNION ALL
                SELECT * FROM profile WHERE id = $1
                LIMIT 1
                "#,
            )
            .bind(item.id)
            .bind(item.display_name.as_str())
            .bind(item.role)
            .bind(item.created_at)
            .fetch_one(&mut **transaction)
            .await?
        };

        ProfileModel::try_from_row(&row)
    }
}
