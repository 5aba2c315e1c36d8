use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::identifiable::Identifiable;

/// # Documentation
/// Grants operator scope over a single machine; there is no department-wide
/// inheritance for operators. The (machine, profile) pair is unique and the
/// row is deleted with its machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatorAssignmentModel {
    pub id: Uuid,
    pub machine_id: Uuid,
    pub profile_id: Uuid,
    pub assigned_at: DateTime<Utc>,
}

impl Identifiable for OperatorAssignmentModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}
