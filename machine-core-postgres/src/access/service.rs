use heapless::String as HeaplessString;
use machine_core_api::domain::{AccessContext, Actor};
use machine_core_api::error::{AccessError, AccessResult};
use sqlx::PgPool;
use std::str::FromStr;
use std::sync::Arc;
use validator::Validate;

use crate::access::resolver::PgScopeResolver;
use crate::postgres_repositories::{PostgresRepositories, UnitOfWork};
use crate::utils::map_sqlx_error;

/// The guarded service facade: resolves the acting identity, runs the
/// mutation guard as a fast-fail check, then executes repositories inside
/// a unit of work whose transaction carries the actor for the row-level
/// policies (the authoritative layer).
pub struct MachineCoreService {
    pub(crate) repositories: PostgresRepositories,
    pub(crate) resolver: PgScopeResolver,
}

impl MachineCoreService {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self {
            repositories: PostgresRepositories::new(pool.clone()),
            resolver: PgScopeResolver::new(pool),
        }
    }

    pub fn resolver(&self) -> &PgScopeResolver {
        &self.resolver
    }

    pub(crate) async fn context(&self, actor: &Actor) -> AccessResult<AccessContext> {
        self.resolver.context_for(actor).await
    }

    pub(crate) async fn begin(&self, ctx: &AccessContext) -> AccessResult<UnitOfWork> {
        self.repositories
            .begin(&ctx.actor)
            .await
            .map_err(map_sqlx_error)
    }

    /// Commit on success, roll back on failure. Rollback failures are
    /// swallowed; the original error is what the caller needs.
    pub(crate) async fn finish<T>(
        &self,
        unit: UnitOfWork,
        result: AccessResult<T>,
    ) -> AccessResult<T> {
        match result {
            Ok(value) => {
                unit.commit().await.map_err(map_sqlx_error)?;
                Ok(value)
            }
            Err(err) => {
                let _ = unit.rollback().await;
                Err(err)
            }
        }
    }

    pub(crate) fn validated<T: Validate>(input: &T) -> AccessResult<()> {
        input
            .validate()
            .map_err(|e| AccessError::ConstraintViolation(e.to_string()))
    }

    pub(crate) fn bounded<const N: usize>(
        value: &str,
        field: &str,
    ) -> AccessResult<HeaplessString<N>> {
        HeaplessString::from_str(value).map_err(|_| {
            AccessError::ConstraintViolation(format!("{field} is too long (max {N} chars)"))
        })
    }
}
