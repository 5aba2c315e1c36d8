use thiserror::Error;

/// Error taxonomy for every guarded operation.
///
/// The five kinds are distinguishable by the caller: `AuthorizationDenied`
/// and `NotFound` are rejected before any write, `ConstraintViolation` maps
/// datastore uniqueness/foreign-key failures, `ConcurrencyConflict` maps
/// serialization and lock failures, and `Backend` is a transient datastore
/// failure the caller may retry.
#[derive(Error, Debug)]
pub enum AccessError {
    #[error("Authorization denied: {0}")]
    AuthorizationDenied(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Concurrency conflict: {0}")]
    ConcurrencyConflict(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

pub type AccessResult<T> = Result<T, AccessError>;

impl AccessError {
    /// Transient errors are safe for the caller to retry as-is.
    pub fn is_transient(&self) -> bool {
        matches!(self, AccessError::Backend(_) | AccessError::ConcurrencyConflict(_))
    }

    pub fn denied(operation: &str) -> Self {
        AccessError::AuthorizationDenied(operation.to_string())
    }
}
