use chrono::{DateTime, Utc};
use machine_core_api::domain::StatusHistoryEntry;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::identifiable::Identifiable;

/// # Documentation
/// One record of the append-only audit trail. `previous_status` is the
/// machine's status read under row lock at the start of the status-change
/// transaction (empty string when the machine never had one). Records are
/// never updated or deleted; machine deletion cascades them away.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusHistoryModel {
    pub id: Uuid,
    pub machine_id: Uuid,
    pub previous_status: String,
    pub status: String,
    pub comment: Option<String>,
    pub changed_by: Uuid,
    pub changed_at: DateTime<Utc>,
}

impl Identifiable for StatusHistoryModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

impl From<StatusHistoryModel> for StatusHistoryEntry {
    fn from(model: StatusHistoryModel) -> Self {
        StatusHistoryEntry {
            id: model.id,
            machine_id: model.machine_id,
            previous_status: model.previous_status,
            status: model.status,
            comment: model.comment,
            changed_by: model.changed_by,
            changed_at: model.changed_at,
        }
    }
}
