use async_trait::async_trait;
use machine_core_api::domain::{AccessContext, Actor, Identity, Role, Scope};
use machine_core_api::error::{AccessError, AccessResult};
use machine_core_api::service::ScopeResolver;
use sqlx::{PgPool, Row};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use crate::utils::map_sqlx_error;

/// Resolves identities against the profile and assignment tables. The
/// profile's stored role is authoritative; a role claimed by the caller is
/// never trusted. Resolution is a plain read and runs outside any unit of
/// work.
pub struct PgScopeResolver {
    pool: Arc<PgPool>,
}

impl PgScopeResolver {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Resolve an `Actor` as received at the boundary. Anonymous callers
    /// get the public read-only context without touching the database.
    pub async fn context_for(&self, actor: &Actor) -> AccessResult<AccessContext> {
        match actor {
            Actor::Anonymous => Ok(AccessContext::anonymous()),
            Actor::User { identity, .. } => self.resolve(*identity).await,
        }
    }

    async fn led_department_scope(&self, identity: Identity) -> AccessResult<Scope> {
        let departments: HashSet<Uuid> =
            sqlx::query(r#"SELECT department_id FROM department_leader WHERE profile_id = $1"#)
                .bind(identity)
                .fetch_all(self.pool.as_ref())
                .await
                .map_err(map_sqlx_error)?
                .iter()
                .map(|row| row.get("department_id"))
                .collect();

        // An empty department set stays empty; the query below would match
        // everything without the guard.
        if departments.is_empty() {
            return Ok(Scope::Departments {
                departments,
                machines: HashSet::new(),
            });
        }

        let dept_ids: Vec<Uuid> = departments.iter().copied().collect();
        let machines: HashSet<Uuid> =
            sqlx::query(r#"SELECT id FROM machine WHERE department_id = ANY($1)"#)
                .bind(&dept_ids)
                .fetch_all(self.pool.as_ref())
                .await
                .map_err(map_sqlx_error)?
                .iter()
                .map(|row| row.get("id"))
                .collect();

        Ok(Scope::Departments { departments, machines })
    }

    async fn assigned_machine_scope(&self, identity: Identity) -> AccessResult<Scope> {
        let machines: HashSet<Uuid> =
            sqlx::query(r#"SELECT machine_id FROM machine_operator WHERE profile_id = $1"#)
                .bind(identity)
                .fetch_all(self.pool.as_ref())
                .await
                .map_err(map_sqlx_error)?
                .iter()
                .map(|row| row.get("machine_id"))
                .collect();

        Ok(Scope::Machines(machines))
    }
}

#[async_trait]
impl ScopeResolver for PgScopeResolver {
    async fn resolve(&self, identity: Identity) -> AccessResult<AccessContext> {
        let row = sqlx::query(r#"SELECT role FROM profile WHERE id = $1"#)
            .bind(identity)
            .fetch_optional(self.pool.as_ref())
            .await
            .map_err(map_sqlx_error)?;

        let role: Role = match row {
            Some(row) => row.try_get("role").map_err(map_sqlx_error)?,
            None => {
                return Err(AccessError::NotFound(format!(
                    "no profile for identity {identity}"
                )))
            }
        };

        let scope = match role {
            Role::Admin => Scope::Universal,
            Role::TeamLeader => self.led_department_scope(identity).await?,
            Role::Operator => self.assigned_machine_scope(identity).await?,
        };

        Ok(AccessContext::new(Actor::user(identity, role), scope))
    }
}
