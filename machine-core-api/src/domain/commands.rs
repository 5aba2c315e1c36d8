use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Validated input for department creation. Field limits match the column
/// widths in the schema.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewDepartment {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DepartmentUpdate {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewMachine {
    #[validate(length(min = 1, max = 50))]
    pub code: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    pub department_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MachineUpdate {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    pub department_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewStatusType {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 20))]
    pub color: String,
    pub is_default: bool,
    pub display_order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StatusTypeUpdate {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 20))]
    pub color: String,
    pub is_active: bool,
    pub display_order: i32,
}

/// A requested status transition. The new status is a free-form string;
/// it is not checked against the status-type catalog at write time.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StatusChange {
    pub machine_id: Uuid,
    #[validate(length(min = 1, max = 100))]
    pub status: String,
    #[validate(length(max = 500))]
    pub comment: Option<String>,
}

/// Profile fields an identity may set on itself. Role is deliberately
/// absent; role changes go through the admin-only mutation.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProfileUpdate {
    #[validate(length(min = 1, max = 100))]
    pub display_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_change_requires_nonempty_status() {
        let change = StatusChange {
            machine_id: Uuid::new_v4(),
            status: String::new(),
            comment: None,
        };
        assert!(change.validate().is_err());
    }

    #[test]
    fn machine_code_length_is_bounded() {
        let machine = NewMachine {
            code: "M".repeat(51),
            name: "Press".to_string(),
            description: None,
            department_id: None,
        };
        assert!(machine.validate().is_err());
    }
}
