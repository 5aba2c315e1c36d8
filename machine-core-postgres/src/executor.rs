use sqlx::{Postgres, Transaction};
use std::sync::Arc;
use tokio::sync::Mutex;

/// A transaction shared by every repository participating in one unit of
/// work. Repositories lock the transaction for each statement; commit or
/// rollback consumes it, after which further use fails instead of silently
/// running outside the transaction.
#[derive(Clone)]
pub struct Executor {
    pub tx: Arc<Mutex<Option<Transaction<'static, Postgres>>>>,
}

impl Executor {
    pub fn new(tx: Transaction<'static, Postgres>) -> Self {
        Self {
            tx: Arc::new(Mutex::new(Some(tx))),
        }
    }

    /// Commit the transaction. Subsequent statements on this executor fail
    /// with a consumed-transaction error.
    pub async fn commit(&self) -> Result<(), sqlx::Error> {
        let tx = self.tx.lock().await.take();
        match tx {
            Some(tx) => tx.commit().await,
            None => Err(sqlx::Error::WorkerCrashed),
        }
    }

    /// Roll back the transaction if it has not been consumed yet.
    pub async fn rollback(&self) -> Result<(), sqlx::Error> {
        let tx = self.tx.lock().await.take();
        match tx {
            Some(tx) => tx.rollback().await,
            None => Ok(()),
        }
    }
}
