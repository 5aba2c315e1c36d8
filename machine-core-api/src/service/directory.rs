use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    Actor, Department, DepartmentUpdate, Identity, NewDepartment, Profile, ProfileUpdate, Role,
};
use crate::error::AccessResult;

/// Departments, leader assignments, and profiles. Every method takes the
/// acting `Actor` explicitly and enforces the mutation guard before any
/// write.
#[async_trait]
pub trait DirectoryService: Send + Sync {
    /// Departments are publicly listable, ordered by name.
    async fn list_departments(&self, actor: Actor) -> AccessResult<Vec<Department>>;

    /// Admin only.
    async fn create_department(&self, actor: Actor, dept: NewDepartment)
        -> AccessResult<Department>;

    /// Admin only.
    async fn update_department(
        &self,
        actor: Actor,
        department_id: Uuid,
        update: DepartmentUpdate,
    ) -> AccessResult<Department>;

    /// Admin only. Machines in the department keep existing with a null
    /// department reference; leader assignments are removed.
    async fn delete_department(&self, actor: Actor, department_id: Uuid) -> AccessResult<()>;

    /// Admin only; unique per (department, identity) pair.
    async fn assign_leader(
        &self,
        actor: Actor,
        department_id: Uuid,
        leader: Identity,
    ) -> AccessResult<()>;

    /// Admin only.
    async fn unassign_leader(
        &self,
        actor: Actor,
        department_id: Uuid,
        leader: Identity,
    ) -> AccessResult<()>;

    /// User-management listing: admin sees all profiles, team leader sees
    /// operator profiles only, everyone else is denied.
    async fn list_profiles(&self, actor: Actor) -> AccessResult<Vec<Profile>>;

    /// Create the profile at first sign-in, or return the existing one.
    /// New profiles start as operators with no assignments.
    async fn sign_in(&self, identity: Identity, display_name: &str) -> AccessResult<Profile>;

    /// Self only; role is not touched.
    async fn update_profile(
        &self,
        actor: Actor,
        target: Identity,
        update: ProfileUpdate,
    ) -> AccessResult<Profile>;

    /// Admin only.
    async fn set_role(&self, actor: Actor, target: Identity, role: Role) -> AccessResult<Profile>;
}
