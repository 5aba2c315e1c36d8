use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Actor, Identity, Machine, MachineUpdate, NewMachine};
use crate::error::AccessResult;

/// Machines and operator assignments, visibility-filtered by the actor's
/// resolved scope.
#[async_trait]
pub trait MachineService: Send + Sync {
    /// Machines within the actor's scope, ordered by code. An actor with
    /// an empty scope receives an empty list, never the universal set.
    async fn list_machines(&self, actor: Actor) -> AccessResult<Vec<Machine>>;

    /// Fails with `NotFound` both for missing machines and for machines
    /// outside the actor's scope, so existence does not leak.
    async fn get_machine(&self, actor: Actor, machine_id: Uuid) -> AccessResult<Machine>;

    async fn find_by_code(&self, actor: Actor, code: &str) -> AccessResult<Option<Machine>>;

    /// Admin anywhere; team leader only inside a led department.
    async fn create_machine(&self, actor: Actor, machine: NewMachine) -> AccessResult<Machine>;

    /// Admin, or team leader/operator when the machine is in scope.
    async fn update_machine(
        &self,
        actor: Actor,
        machine_id: Uuid,
        update: MachineUpdate,
    ) -> AccessResult<Machine>;

    /// Admin only. Cascades operator assignments and status history.
    async fn delete_machine(&self, actor: Actor, machine_id: Uuid) -> AccessResult<()>;

    /// Admin, or the team leader leading the machine's department.
    async fn assign_operator(
        &self,
        actor: Actor,
        machine_id: Uuid,
        operator: Identity,
    ) -> AccessResult<()>;

    /// Same policy as `assign_operator`.
    async fn unassign_operator(
        &self,
        actor: Actor,
        machine_id: Uuid,
        operator: Identity,
    ) -> AccessResult<()>;
}
