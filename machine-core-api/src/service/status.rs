use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    Actor, NewStatusType, StatusChange, StatusHistoryEntry, StatusType, StatusTypeUpdate,
};
use crate::error::AccessResult;

/// Status-type catalog, status changes, and the audit trail.
#[async_trait]
pub trait StatusService: Send + Sync {
    /// Catalog ordered by display order then name. `active_only` drops
    /// deactivated entries.
    async fn list_status_types(&self, actor: Actor, active_only: bool)
        -> AccessResult<Vec<StatusType>>;

    /// Admin only.
    async fn create_status_type(&self, actor: Actor, status_type: NewStatusType)
        -> AccessResult<StatusType>;

    /// Admin only.
    async fn update_status_type(
        &self,
        actor: Actor,
        status_type_id: Uuid,
        update: StatusTypeUpdate,
    ) -> AccessResult<StatusType>;

    /// Admin only, and refused outright for default catalog entries.
    async fn delete_status_type(&self, actor: Actor, status_type_id: Uuid) -> AccessResult<()>;

    /// Apply a status change: append the history record and move the
    /// machine's current status in one transaction. Returns the appended
    /// record, whose `previous_status` is the machine's status read under
    /// row lock.
    async fn change_status(&self, actor: Actor, change: StatusChange)
        -> AccessResult<StatusHistoryEntry>;

    /// History within the actor's scope, newest first. `machine_id`
    /// narrows to one machine (still scope-checked).
    async fn list_history(
        &self,
        actor: Actor,
        machine_id: Option<Uuid>,
        limit: Option<i64>,
    ) -> AccessResult<Vec<StatusHistoryEntry>>;
}
