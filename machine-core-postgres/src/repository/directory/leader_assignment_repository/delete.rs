use std::error::Error;
use uuid::Uuid;

use super::repo_impl::LeaderAssignmentRepositoryImpl;

impl LeaderAssignmentRepositoryImpl {
    /// Remove the assignment pair. Returns whether a row was removed.
    pub async fn delete_pair(
        &self,
        department_id: Uuid,
        profile_id: Uuid,
    ) -> Result<bool, Box<dyn Error + Send + Sync>> {
        let affected = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

            sqlx::query(
                r#"DELETE FROM department_leader WHERE department_id = $1 AND profile_id = $2"#,
            )
            .bind(department_id)
            .bind(profile_id)
            .execute(&mut **transaction)
            .await?
            .rows_affected()
        };

        Ok(affected > 0)
    }
}
