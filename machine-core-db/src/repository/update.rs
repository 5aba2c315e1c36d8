use async_trait::async_trait;
use sqlx::Database;

use crate::models::identifiable::Identifiable;

/// Generic repository trait for updating an existing entity in place.
///
/// Append-only entities (status history) deliberately do not implement
/// this trait; the type system keeps the audit trail immutable.
///
/// # Type Parameters
/// * `DB` - The database type (must implement sqlx::Database)
/// * `T` - The entity type that must implement the Identifiable trait
#[async_trait]
pub trait Update<DB: Database, T: Identifiable>: Send + Sync {
    /// Update the entity identified by `item.get_id()`.
    async fn update(&self, item: T) -> Result<T, Box<dyn std::error::Error + Send + Sync>>;
}
