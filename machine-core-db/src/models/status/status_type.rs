use heapless::String as HeaplessString;
use machine_core_api::domain::StatusType;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::identifiable::Identifiable;

/// # Documentation
/// Admin-managed catalog of advertised status values. Entries with
/// `is_default = true` are seeded and cannot be deleted, only deactivated.
/// History records keep whatever status string they were written with even
/// when a catalog entry is later deactivated or renamed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusTypeModel {
    pub id: Uuid,
    pub name: HeaplessString<100>,
    pub color: HeaplessString<20>,
    pub is_default: bool,
    pub is_active: bool,
    pub display_order: i32,
}

impl Identifiable for StatusTypeModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

impl From<StatusTypeModel> for StatusType {
    fn from(model: StatusTypeModel) -> Self {
        StatusType {
            id: model.id,
            name: model.name.to_string(),
            color: model.color.to_string(),
            is_default: model.is_default,
            is_active: model.is_active,
            display_order: model.display_order,
        }
    }
}
