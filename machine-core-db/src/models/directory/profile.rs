use chrono::{DateTime, Utc};
use heapless::String as HeaplessString;
use machine_core_api::domain::{Profile, Role};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::identifiable::Identifiable;

/// # Documentation
/// One profile per authenticated identity; `id` equals the auth provider's
/// subject id. Created at first sign-in, never deleted. `role` is mutable
/// only through the admin-only role mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileModel {
    pub id: Uuid,
    pub display_name: HeaplessString<100>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl Identifiable for ProfileModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

impl From<ProfileModel> for Profile {
    fn from(model: ProfileModel) -> Self {
        Profile {
            id: model.id,
            display_name: model.display_name.to_string(),
            role: model.role,
            created_at: model.created_at,
        }
    }
}
