use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use super::actor::{Actor, Role};

/// The set of entities an actor may see, produced once per request by the
/// resolver and consumed by every filter and guard. Role checks are never
/// re-derived at call sites; all visibility logic is a function of this
/// value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scope {
    /// All departments and machines (admin, or anonymous read).
    Universal,
    /// Team-leader scope: led departments plus every machine inside them.
    /// Both sets may be empty, in which case nothing matches.
    Departments {
        departments: HashSet<Uuid>,
        machines: HashSet<Uuid>,
    },
    /// Operator scope: directly assigned machines only. No department-wide
    /// inheritance.
    Machines(HashSet<Uuid>),
    /// Matches nothing. The resolver never widens an empty assignment set
    /// into `Universal`.
    Empty,
}

/// Query-level rendering of a machine visibility check. The persistence
/// layer translates this into SQL; an empty id set must stay an empty id
/// set and never degrade to an unfiltered query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MachineFilter {
    All,
    ByDepartment(HashSet<Uuid>),
    ById(HashSet<Uuid>),
    Nothing,
}

impl Scope {
    pub fn contains_department(&self, department_id: Uuid) -> bool {
        match self {
            Scope::Universal => true,
            Scope::Departments { departments, .. } => departments.contains(&department_id),
            Scope::Machines(_) | Scope::Empty => false,
        }
    }

    /// Whether a machine is visible. `department_id` is the machine's
    /// current department, used so a leader sees machines moved into a led
    /// department even before the resolver's machine set is refreshed.
    pub fn contains_machine(&self, machine_id: Uuid, department_id: Option<Uuid>) -> bool {
        match self {
            Scope::Universal => true,
            Scope::Departments { departments, machines } => {
                machines.contains(&machine_id)
                    || department_id.is_some_and(|d| departments.contains(&d))
            }
            Scope::Machines(machines) => machines.contains(&machine_id),
            Scope::Empty => false,
        }
    }

    /// Render the scope as a machine list filter.
    pub fn machine_filter(&self) -> MachineFilter {
        match self {
            Scope::Universal => MachineFilter::All,
            Scope::Departments { departments, .. } => {
                MachineFilter::ByDepartment(departments.clone())
            }
            Scope::Machines(machines) => MachineFilter::ById(machines.clone()),
            Scope::Empty => MachineFilter::Nothing,
        }
    }

    /// History visibility follows machine visibility: operators by direct
    /// machine assignment, leaders by the machine's department.
    pub fn history_filter(&self) -> MachineFilter {
        self.machine_filter()
    }

    pub fn is_universal(&self) -> bool {
        matches!(self, Scope::Universal)
    }
}

impl MachineFilter {
    /// True when the filter can never match a row. Needed to short-circuit
    /// before query construction: `= ANY('{}')` is safe in Postgres, but
    /// callers composing in-memory checks rely on this too.
    pub fn matches_nothing(&self) -> bool {
        match self {
            MachineFilter::All => false,
            MachineFilter::ByDepartment(ids) | MachineFilter::ById(ids) => ids.is_empty(),
            MachineFilter::Nothing => true,
        }
    }
}

/// Actor plus resolved scope, built once by the resolver and threaded
/// through guard and filter calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessContext {
    pub actor: Actor,
    pub scope: Scope,
}

impl AccessContext {
    pub fn new(actor: Actor, scope: Scope) -> Self {
        Self { actor, scope }
    }

    /// Context for an unauthenticated caller: universal read scope, no
    /// mutation rights (the guard refuses every mutation for `Anonymous`).
    pub fn anonymous() -> Self {
        Self { actor: Actor::Anonymous, scope: Scope::Universal }
    }

    pub fn admin(identity: Uuid) -> Self {
        Self { actor: Actor::user(identity, Role::Admin), scope: Scope::Universal }
    }

    /// Which profiles the actor may list in the user-management view.
    pub fn profile_visibility(&self) -> ProfileVisibility {
        match self.actor.role() {
            Some(Role::Admin) => ProfileVisibility::All,
            Some(Role::TeamLeader) => ProfileVisibility::OperatorsOnly,
            Some(Role::Operator) | None => ProfileVisibility::Denied,
        }
    }
}

/// User-management listing policy: admins see every profile, team leaders
/// see operator profiles only, everyone else is refused outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileVisibility {
    All,
    OperatorsOnly,
    Denied,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> HashSet<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn universal_scope_sees_everything() {
        let scope = Scope::Universal;
        assert!(scope.contains_machine(Uuid::new_v4(), None));
        assert!(scope.contains_department(Uuid::new_v4()));
        assert_eq!(scope.machine_filter(), MachineFilter::All);
    }

    #[test]
    fn empty_leader_scope_matches_nothing() {
        // A team leader with zero led departments must see zero rows,
        // never the universal set.
        let scope = Scope::Departments { departments: HashSet::new(), machines: HashSet::new() };
        assert!(!scope.contains_machine(Uuid::new_v4(), Some(Uuid::new_v4())));
        assert!(!scope.contains_department(Uuid::new_v4()));
        assert!(scope.machine_filter().matches_nothing());
    }

    #[test]
    fn empty_operator_scope_matches_nothing() {
        let scope = Scope::Machines(HashSet::new());
        assert!(!scope.contains_machine(Uuid::new_v4(), None));
        assert!(scope.machine_filter().matches_nothing());
        assert!(scope.history_filter().matches_nothing());
    }

    #[test]
    fn operator_scope_is_direct_assignment_only() {
        let machine = Uuid::new_v4();
        let department = Uuid::new_v4();
        let scope = Scope::Machines(HashSet::from([machine]));

        assert!(scope.contains_machine(machine, Some(department)));
        // No department-wide inheritance for operators.
        assert!(!scope.contains_machine(Uuid::new_v4(), Some(department)));
        assert!(!scope.contains_department(department));
    }

    #[test]
    fn leader_scope_covers_machines_by_department() {
        let department = Uuid::new_v4();
        let known_machine = Uuid::new_v4();
        let scope = Scope::Departments {
            departments: HashSet::from([department]),
            machines: HashSet::from([known_machine]),
        };

        assert!(scope.contains_machine(known_machine, None));
        // A machine moved into the led department is visible even before
        // the machine set is re-resolved.
        assert!(scope.contains_machine(Uuid::new_v4(), Some(department)));
        assert!(!scope.contains_machine(Uuid::new_v4(), Some(Uuid::new_v4())));
    }

    #[test]
    fn nonempty_filters_do_not_match_nothing() {
        assert!(!MachineFilter::ByDepartment(ids(2)).matches_nothing());
        assert!(!MachineFilter::ById(ids(1)).matches_nothing());
        assert!(!MachineFilter::All.matches_nothing());
        assert!(MachineFilter::Nothing.matches_nothing());
    }

    #[test]
    fn profile_visibility_per_role() {
        let admin = AccessContext::admin(Uuid::new_v4());
        assert_eq!(admin.profile_visibility(), ProfileVisibility::All);

        let leader = AccessContext::new(
            Actor::user(Uuid::new_v4(), Role::TeamLeader),
            Scope::Departments { departments: ids(1), machines: HashSet::new() },
        );
        assert_eq!(leader.profile_visibility(), ProfileVisibility::OperatorsOnly);

        let operator = AccessContext::new(
            Actor::user(Uuid::new_v4(), Role::Operator),
            Scope::Machines(HashSet::new()),
        );
        assert_eq!(operator.profile_visibility(), ProfileVisibility::Denied);

        assert_eq!(AccessContext::anonymous().profile_visibility(), ProfileVisibility::Denied);
    }
}
