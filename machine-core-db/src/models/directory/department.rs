use heapless::String as HeaplessString;
use machine_core_api::domain::Department;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::identifiable::Identifiable;

/// # Documentation
/// Organizational department. Name is unique. Admin-managed; deleting a
/// department nulls the department reference of its machines and removes
/// its leader assignments (enforced by the schema's FK actions).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentModel {
    pub id: Uuid,
    pub name: HeaplessString<100>,
    pub description: Option<String>,
}

impl Identifiable for DepartmentModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

impl From<DepartmentModel> for Department {
    fn from(model: DepartmentModel) -> Self {
        Department {
            id: model.id,
            name: model.name.to_string(),
            description: model.description,
        }
    }
}
