use uuid::Uuid;

use crate::domain::{AccessContext, Identity, Role};
use crate::error::{AccessError, AccessResult};

/// A mutation awaiting authorization. Each variant carries only the scope
/// context the decision needs; the guard never reaches back into the
/// datastore. Status history has no update or delete variant at all: the
/// audit trail is append-only for every role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    CreateDepartment,
    UpdateDepartment,
    DeleteDepartment,

    AssignLeader,
    UnassignLeader,

    /// `department_id` is the target department of the new machine.
    CreateMachine { department_id: Option<Uuid> },
    /// `department_id` is the machine's current department,
    /// `new_department_id` the one the update assigns. Both sides are
    /// checked so the decision matches the row policy, which evaluates
    /// the updated row.
    UpdateMachine {
        machine_id: Uuid,
        department_id: Option<Uuid>,
        new_department_id: Option<Uuid>,
    },
    DeleteMachine,

    /// `department_id` is the department of the machine being assigned.
    AssignOperator { department_id: Option<Uuid> },
    UnassignOperator { department_id: Option<Uuid> },

    CreateStatusType,
    UpdateStatusType,
    /// Default catalog entries are non-deletable for every role.
    DeleteStatusType { is_default: bool },

    /// Append a status-change record for a machine.
    ChangeStatus { machine_id: Uuid, department_id: Option<Uuid> },

    /// Change another profile's role.
    SetRole,
    /// Update a profile's non-role fields. `target` is the profile owner.
    UpdateProfile { target: Identity },
}

/// Decide whether the context may perform the mutation. Pure function of
/// the resolved context; evaluated before any write is attempted, so a
/// denial has no partial effects to roll back.
pub fn authorize(ctx: &AccessContext, mutation: &Mutation) -> AccessResult<()> {
    let role = match ctx.actor.role() {
        Some(role) => role,
        // Anonymous callers read everything and mutate nothing.
        None => return Err(AccessError::denied(describe(mutation))),
    };

    let allowed = match mutation {
        Mutation::CreateDepartment
        | Mutation::UpdateDepartment
        | Mutation::DeleteDepartment
        | Mutation::AssignLeader
        | Mutation::UnassignLeader
        | Mutation::DeleteMachine
        | Mutation::CreateStatusType
        | Mutation::UpdateStatusType
        | Mutation::SetRole => role == Role::Admin,

        Mutation::DeleteStatusType { is_default } => {
            if *is_default {
                return Err(AccessError::ConstraintViolation(
                    "default status types cannot be deleted, only deactivated".to_string(),
                ));
            }
            role == Role::Admin
        }

        Mutation::CreateMachine { department_id } => match role {
            Role::Admin => true,
            Role::TeamLeader => {
                department_id.is_some_and(|d| ctx.scope.contains_department(d))
            }
            Role::Operator => false,
        },

        Mutation::UpdateMachine { machine_id, department_id, new_department_id } => match role {
            Role::Admin => true,
            // A leader must see the machine where it is and lead the
            // department the update puts it in; the row policy checks the
            // updated row the same way, so detaching to no department is
            // admin territory.
            Role::TeamLeader => {
                ctx.scope.contains_machine(*machine_id, *department_id)
                    && new_department_id.is_some_and(|d| ctx.scope.contains_department(d))
            }
            // Operators stay attached through machine_operator no matter
            // which department the machine sits in.
            Role::Operator => ctx.scope.contains_machine(*machine_id, *department_id),
        },

        Mutation::AssignOperator { department_id }
        | Mutation::UnassignOperator { department_id } => match role {
            Role::Admin => true,
            Role::TeamLeader => {
                department_id.is_some_and(|d| ctx.scope.contains_department(d))
            }
            Role::Operator => false,
        },

        Mutation::ChangeStatus { machine_id, department_id } => match role {
            Role::Admin => true,
            Role::TeamLeader | Role::Operator => {
                ctx.scope.contains_machine(*machine_id, *department_id)
            }
        },

        Mutation::UpdateProfile { target } => {
            // Self only; admins edit other profiles' roles, not their names.
            ctx.actor.identity() == Some(*target)
        }
    };

    if allowed {
        Ok(())
    } else {
        Err(AccessError::denied(describe(mutation)))
    }
}

fn describe(mutation: &Mutation) -> &'static str {
    match mutation {
        Mutation::CreateDepartment => "create department",
        Mutation::UpdateDepartment => "update department",
        Mutation::DeleteDepartment => "delete department",
        Mutation::AssignLeader => "assign department leader",
        Mutation::UnassignLeader => "unassign department leader",
        Mutation::CreateMachine { .. } => "create machine",
        Mutation::UpdateMachine { .. } => "update machine",
        Mutation::DeleteMachine => "delete machine",
        Mutation::AssignOperator { .. } => "assign machine operator",
        Mutation::UnassignOperator { .. } => "unassign machine operator",
        Mutation::CreateStatusType => "create status type",
        Mutation::UpdateStatusType => "update status type",
        Mutation::DeleteStatusType { .. } => "delete status type",
        Mutation::ChangeStatus { .. } => "change machine status",
        Mutation::SetRole => "change profile role",
        Mutation::UpdateProfile { .. } => "update profile",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Actor, Scope};
    use std::collections::HashSet;

    fn leader_ctx(departments: &[Uuid], machines: &[Uuid]) -> AccessContext {
        AccessContext::new(
            Actor::user(Uuid::new_v4(), Role::TeamLeader),
            Scope::Departments {
                departments: departments.iter().copied().collect(),
                machines: machines.iter().copied().collect(),
            },
        )
    }

    fn operator_ctx(machines: &[Uuid]) -> AccessContext {
        AccessContext::new(
            Actor::user(Uuid::new_v4(), Role::Operator),
            Scope::Machines(machines.iter().copied().collect()),
        )
    }

    #[test]
    fn admin_passes_every_structural_mutation() {
        let ctx = AccessContext::admin(Uuid::new_v4());
        for m in [
            Mutation::CreateDepartment,
            Mutation::DeleteDepartment,
            Mutation::AssignLeader,
            Mutation::DeleteMachine,
            Mutation::CreateStatusType,
            Mutation::SetRole,
            Mutation::CreateMachine { department_id: None },
        ] {
            assert!(authorize(&ctx, &m).is_ok(), "admin denied {m:?}");
        }
    }

    #[test]
    fn anonymous_is_denied_every_mutation() {
        let ctx = AccessContext::anonymous();
        let machine = Uuid::new_v4();
        for m in [
            Mutation::CreateDepartment,
            Mutation::CreateMachine { department_id: None },
            Mutation::ChangeStatus { machine_id: machine, department_id: None },
            Mutation::UpdateProfile { target: Uuid::new_v4() },
        ] {
            assert!(matches!(
                authorize(&ctx, &m),
                Err(AccessError::AuthorizationDenied(_))
            ));
        }
    }

    #[test]
    fn leader_creates_machines_in_led_department_only() {
        let qc = Uuid::new_v4();
        let prod = Uuid::new_v4();
        let ctx = leader_ctx(&[qc], &[]);

        assert!(authorize(&ctx, &Mutation::CreateMachine { department_id: Some(qc) }).is_ok());
        assert!(matches!(
            authorize(&ctx, &Mutation::CreateMachine { department_id: Some(prod) }),
            Err(AccessError::AuthorizationDenied(_))
        ));
        // A machine without a department is admin territory.
        assert!(authorize(&ctx, &Mutation::CreateMachine { department_id: None }).is_err());
    }

    #[test]
    fn leader_with_no_departments_mutates_nothing() {
        let ctx = leader_ctx(&[], &[]);
        assert!(authorize(&ctx, &Mutation::CreateMachine { department_id: Some(Uuid::new_v4()) }).is_err());
        assert!(authorize(
            &ctx,
            &Mutation::ChangeStatus { machine_id: Uuid::new_v4(), department_id: Some(Uuid::new_v4()) }
        )
        .is_err());
    }

    #[test]
    fn leader_manages_operator_assignments_in_scope() {
        let dept = Uuid::new_v4();
        let ctx = leader_ctx(&[dept], &[]);

        assert!(authorize(&ctx, &Mutation::AssignOperator { department_id: Some(dept) }).is_ok());
        assert!(authorize(&ctx, &Mutation::UnassignOperator { department_id: Some(dept) }).is_ok());
        assert!(authorize(&ctx, &Mutation::AssignOperator { department_id: Some(Uuid::new_v4()) }).is_err());
        assert!(authorize(&ctx, &Mutation::AssignOperator { department_id: None }).is_err());
    }

    #[test]
    fn operator_changes_status_on_assigned_machines_only() {
        let machine = Uuid::new_v4();
        let ctx = operator_ctx(&[machine]);

        assert!(authorize(
            &ctx,
            &Mutation::ChangeStatus { machine_id: machine, department_id: None }
        )
        .is_ok());
        assert!(authorize(
            &ctx,
            &Mutation::ChangeStatus { machine_id: Uuid::new_v4(), department_id: None }
        )
        .is_err());
        // Operators never touch structure.
        assert!(authorize(&ctx, &Mutation::DeleteMachine).is_err());
        assert!(authorize(&ctx, &Mutation::AssignOperator { department_id: None }).is_err());
    }

    #[test]
    fn operator_updates_assigned_machine() {
        let machine = Uuid::new_v4();
        let ctx = operator_ctx(&[machine]);
        assert!(authorize(
            &ctx,
            &Mutation::UpdateMachine {
                machine_id: machine,
                department_id: None,
                new_department_id: None,
            }
        )
        .is_ok());
    }

    #[test]
    fn leader_keeps_machines_inside_led_departments() {
        let qc = Uuid::new_v4();
        let prod = Uuid::new_v4();
        let machine = Uuid::new_v4();
        let ctx = leader_ctx(&[qc], &[machine]);

        // Renaming in place is fine.
        assert!(authorize(
            &ctx,
            &Mutation::UpdateMachine {
                machine_id: machine,
                department_id: Some(qc),
                new_department_id: Some(qc),
            }
        )
        .is_ok());
        // Moving the machine into a department the leader does not lead
        // would fail the row policy, so the guard refuses it too.
        assert!(matches!(
            authorize(
                &ctx,
                &Mutation::UpdateMachine {
                    machine_id: machine,
                    department_id: Some(qc),
                    new_department_id: Some(prod),
                }
            ),
            Err(AccessError::AuthorizationDenied(_))
        ));
        // So would detaching it from every department.
        assert!(authorize(
            &ctx,
            &Mutation::UpdateMachine {
                machine_id: machine,
                department_id: Some(qc),
                new_department_id: None,
            }
        )
        .is_err());
    }

    #[test]
    fn default_status_type_is_not_deletable_even_by_admin() {
        let ctx = AccessContext::admin(Uuid::new_v4());
        assert!(matches!(
            authorize(&ctx, &Mutation::DeleteStatusType { is_default: true }),
            Err(AccessError::ConstraintViolation(_))
        ));
        assert!(authorize(&ctx, &Mutation::DeleteStatusType { is_default: false }).is_ok());
    }

    #[test]
    fn profile_updates_are_self_only() {
        let me = Uuid::new_v4();
        let ctx = AccessContext::new(
            Actor::user(me, Role::Operator),
            Scope::Machines(HashSet::new()),
        );
        assert!(authorize(&ctx, &Mutation::UpdateProfile { target: me }).is_ok());
        assert!(authorize(&ctx, &Mutation::UpdateProfile { target: Uuid::new_v4() }).is_err());

        // Even an admin edits only its own non-role fields.
        let admin_id = Uuid::new_v4();
        let admin = AccessContext::admin(admin_id);
        assert!(authorize(&admin, &Mutation::UpdateProfile { target: me }).is_err());
        assert!(authorize(&admin, &Mutation::UpdateProfile { target: admin_id }).is_ok());
    }

    #[test]
    fn role_changes_are_admin_only() {
        let leader = leader_ctx(&[Uuid::new_v4()], &[]);
        assert!(authorize(&leader, &Mutation::SetRole).is_err());
        assert!(authorize(&AccessContext::admin(Uuid::new_v4()), &Mutation::SetRole).is_ok());
    }
}
