use machine_core_api::domain::ProfileVisibility;
use machine_core_db::models::directory::ProfileModel;
use std::error::Error;

use super::repo_impl::ProfileRepositoryImpl;
use crate::utils::TryFromRow;

impl ProfileRepositoryImpl {
    /// Profiles visible in the user-management view: all for admins,
    /// operator-role profiles for team leaders. `Denied` callers are
    /// rejected by the service before this runs; returning empty here
    /// keeps the repository total.
    pub async fn list_visible(
        &self,
        visibility: ProfileVisibility,
    ) -> Result<Vec<ProfileModel>, Box<dyn Error + Send + Sync>> {
        let rows = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

            match visibility {
                ProfileVisibility::All => {
                    sqlx::query(r#"SELECT * FROM profile ORDER BY display_name"#)
                        .fetch_all(&mut **transaction)
                        .await?
                }
                ProfileVisibility::OperatorsOnly => {
                    sqlx::query(
                        r#"SELECT * FROM profile WHERE role = 'operator' ORDER BY display_name"#,
                    )
                    .fetch_all(&mut **transaction)
                    .await?
                }
                ProfileVisibility::Denied => Vec::new(),
            }
        };

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(ProfileModel::try_from_row(&row)?);
        }
        Ok(items)
    }
}
