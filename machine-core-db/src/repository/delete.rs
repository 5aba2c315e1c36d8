use async_trait::async_trait;
use sqlx::Database;
use uuid::Uuid;

use crate::models::identifiable::Identifiable;

/// Generic repository trait for deleting an entity by its ID.
///
/// Not implemented for status history; the audit trail is create-only.
///
/// # Type Parameters
/// * `DB` - The database type (must implement sqlx::Database)
/// * `T` - The entity type that must implement the Identifiable trait
#[async_trait]
pub trait Delete<DB: Database, T: Identifiable>: Send + Sync {
    /// Delete the entity. Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;
}
