use machine_core_api::domain::Actor;
use sqlx::PgPool;
use std::sync::Arc;

use crate::executor::Executor;
use crate::repository::directory::{
    DepartmentRepositoryImpl, LeaderAssignmentRepositoryImpl, ProfileRepositoryImpl,
};
use crate::repository::machine::{MachineRepositoryImpl, OperatorAssignmentRepositoryImpl};
use crate::repository::status::{StatusHistoryRepositoryImpl, StatusTypeRepositoryImpl};

pub struct PostgresRepositories {
    pool: Arc<PgPool>,
}

impl PostgresRepositories {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &Arc<PgPool> {
        &self.pool
    }

    /// Begin a unit of work: one transaction shared by every repository,
    /// with the actor's identity and role bound transaction-locally so the
    /// row-level policies see them.
    pub async fn begin(&self, actor: &Actor) -> Result<UnitOfWork, sqlx::Error> {
        let tx = self.pool.begin().await?;
        let executor = Executor::new(tx);

        let (actor_id, actor_role) = match actor {
            Actor::Anonymous => (String::new(), String::new()),
            Actor::User { identity, role } => (identity.to_string(), role.to_string()),
        };

        {
            let mut guard = executor.tx.lock().await;
            let transaction = match guard.as_mut() {
                Some(tx) => tx,
                None => return Err(sqlx::Error::WorkerCrashed),
            };
            sqlx::query(
                r#"SELECT set_config('app.actor_id', $1, true),
                          set_config('app.actor_role', $2, true)"#,
            )
            .bind(&actor_id)
            .bind(&actor_role)
            .execute(&mut **transaction)
            .await?;
        }

        Ok(UnitOfWork::new(executor))
    }
}

/// All repositories bound to one shared transaction. Commit or roll back
/// through the unit; dropping it without either leaves the rollback to the
/// pool.
pub struct UnitOfWork {
    pub executor: Executor,
    pub profile_repository: Arc<ProfileRepositoryImpl>,
    pub department_repository: Arc<DepartmentRepositoryImpl>,
    pub leader_assignment_repository: Arc<LeaderAssignmentRepositoryImpl>,
    pub machine_repository: Arc<MachineRepositoryImpl>,
    pub operator_assignment_repository: Arc<OperatorAssignmentRepositoryImpl>,
    pub status_type_repository: Arc<StatusTypeRepositoryImpl>,
    pub status_history_repository: Arc<StatusHistoryRepositoryImpl>,
}

impl UnitOfWork {
    fn new(executor: Executor) -> Self {
        Self {
            profile_repository: Arc::new(ProfileRepositoryImpl::new(executor.clone())),
            department_repository: Arc::new(DepartmentRepositoryImpl::new(executor.clone())),
            leader_assignment_repository: Arc::new(LeaderAssignmentRepositoryImpl::new(
                executor.clone(),
            )),
            machine_repository: Arc::new(MachineRepositoryImpl::new(executor.clone())),
            operator_assignment_repository: Arc::new(OperatorAssignmentRepositoryImpl::new(
                executor.clone(),
            )),
            status_type_repository: Arc::new(StatusTypeRepositoryImpl::new(executor.clone())),
            status_history_repository: Arc::new(StatusHistoryRepositoryImpl::new(
                executor.clone(),
            )),
            executor,
        }
    }

    pub async fn commit(&self) -> Result<(), sqlx::Error> {
        self.executor.commit().await
    }

    pub async fn rollback(&self) -> Result<(), sqlx::Error> {
        self.executor.rollback().await
    }
}
