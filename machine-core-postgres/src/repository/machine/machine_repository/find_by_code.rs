use machine_core_db::models::machine::MachineModel;
use std::error::Error;

use super::repo_impl::MachineRepositoryImpl;
use crate::utils::TryFromRow;

impl MachineRepositoryImpl {
    pub async fn find_by_code(
        &self,
        code: &str,
    ) -> Result<Option<MachineModel>, Box<dyn Error + Send + Sync>> {
        let row = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
            sqlx::query(r#"SELECT * FROM machine WHERE code = $1"#)
                .bind(code)
                .fetch_optional(&mut **transaction)
                .await?
        };
        row.as_ref().map(MachineModel::try_from_row).transpose()
    }
}
