use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque external authentication subject id. One profile exists per
/// identity; the auth provider that issues it is outside this crate.
pub type Identity = Uuid;

/// The fixed three-role model. Roles are mutually exclusive and stored on
/// the profile record; only an admin may change another profile's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "user_role", rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    TeamLeader,
    Operator,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::TeamLeader => write!(f, "team_leader"),
            Role::Operator => write!(f, "operator"),
        }
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "team_leader" => Ok(Role::TeamLeader),
            "operator" => Ok(Role::Operator),
            _ => Err(()),
        }
    }
}

/// The acting principal of a request. Always passed explicitly; resolver,
/// guard, and filter functions never read ambient session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Actor {
    /// Unauthenticated caller. May read everything (public viewing policy)
    /// but holds no mutation rights.
    Anonymous,
    /// Signed-in identity with its resolved profile role.
    User { identity: Identity, role: Role },
}

impl Actor {
    pub fn user(identity: Identity, role: Role) -> Self {
        Actor::User { identity, role }
    }

    pub fn role(&self) -> Option<Role> {
        match self {
            Actor::Anonymous => None,
            Actor::User { role, .. } => Some(*role),
        }
    }

    pub fn identity(&self) -> Option<Identity> {
        match self {
            Actor::Anonymous => None,
            Actor::User { identity, .. } => Some(*identity),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Some(Role::Admin)
    }
}
