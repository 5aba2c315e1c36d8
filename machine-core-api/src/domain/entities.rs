use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::actor::Role;

/// Domain view of a profile. One per authenticated identity; the id is the
/// auth provider's subject id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub display_name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Machine {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    /// Free-form status string; see the status-type catalog for the
    /// advertised values.
    pub current_status: String,
    pub department_id: Option<Uuid>,
    pub last_updated_by: Option<Uuid>,
    pub last_updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusType {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub is_default: bool,
    pub is_active: bool,
    pub display_order: i32,
}

/// One entry of the append-only audit trail. Never updated or deleted
/// after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusHistoryEntry {
    pub id: Uuid,
    pub machine_id: Uuid,
    pub previous_status: String,
    pub status: String,
    pub comment: Option<String>,
    pub changed_by: Uuid,
    pub changed_at: DateTime<Utc>,
}
