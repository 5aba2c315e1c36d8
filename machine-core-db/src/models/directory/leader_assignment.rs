use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::identifiable::Identifiable;

/// # Documentation
/// Grants team-leader scope over one department. The (department, profile)
/// pair is unique; rows are removed when the department is deleted.
/// Admin-managed only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderAssignmentModel {
    pub id: Uuid,
    pub department_id: Uuid,
    pub profile_id: Uuid,
    pub assigned_at: DateTime<Utc>,
}

impl Identifiable for LeaderAssignmentModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}
