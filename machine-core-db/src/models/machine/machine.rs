use chrono::{DateTime, Utc};
use heapless::String as HeaplessString;
use machine_core_api::domain::Machine;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::identifiable::Identifiable;

/// # Documentation
/// A physical machine. `code` is unique across the fleet; `department_id`
/// is nullable and set to NULL when the owning department is deleted.
/// `current_status` is a free-form string kept equal to the newest status
/// history record's `status` by the compound status write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineModel {
    pub id: Uuid,
    pub code: HeaplessString<50>,
    pub name: HeaplessString<100>,
    pub description: Option<String>,
    pub current_status: String,
    pub department_id: Option<Uuid>,
    pub last_updated_by: Option<Uuid>,
    pub last_updated_at: Option<DateTime<Utc>>,
}

impl Identifiable for MachineModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

impl From<MachineModel> for Machine {
    fn from(model: MachineModel) -> Self {
        Machine {
            id: model.id,
            code: model.code.to_string(),
            name: model.name.to_string(),
            description: model.description,
            current_status: model.current_status,
            department_id: model.department_id,
            last_updated_by: model.last_updated_by,
            last_updated_at: model.last_updated_at,
        }
    }
}
