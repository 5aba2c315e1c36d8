use heapless::String as HeaplessString;
use machine_core_api::error::AccessError;
use sqlx::{postgres::PgRow, Row};
use std::error::Error;
use std::str::FromStr;

/// A trait for converting a database row into a model.
pub trait TryFromRow<R>: Sized {
    /// Performs the conversion.
    fn try_from_row(row: &R) -> Result<Self, Box<dyn Error + Send + Sync>>;
}

/// Retrieves a required `HeaplessString` from a row.
pub fn get_heapless_string<const N: usize>(
    row: &PgRow,
    col_name: &str,
) -> Result<HeaplessString<N>, Box<dyn Error + Send + Sync>> {
    let s: String = row.try_get(col_name)?;
    HeaplessString::from_str(&s)
        .map_err(|_| format!("Value for column '{col_name}' is too long (max {N} chars)").into())
}

/// Retrieves an optional `HeaplessString` from a row.
pub fn get_optional_heapless_string<const N: usize>(
    row: &PgRow,
    col_name: &str,
) -> Result<Option<HeaplessString<N>>, Box<dyn Error + Send + Sync>> {
    let s: Option<String> = row.try_get(col_name)?;
    s.map(|val| HeaplessString::from_str(&val))
        .transpose()
        .map_err(|_| format!("Value for column '{col_name}' is too long (max {N} chars)").into())
}

/// Map a repository error into the caller-facing taxonomy. SQLSTATEs are
/// inspected so the five kinds stay distinguishable:
/// 23xxx (integrity) -> ConstraintViolation, 40001/40P01 (serialization,
/// deadlock) -> ConcurrencyConflict, 42501 (insufficient privilege, raised
/// by row policies) -> AuthorizationDenied, everything else -> Backend.
pub fn map_db_error(err: Box<dyn Error + Send + Sync>) -> AccessError {
    let sqlx_err = match err.downcast::<sqlx::Error>() {
        Ok(e) => *e,
        Err(other) => return AccessError::Backend(other.to_string()),
    };

    match &sqlx_err {
        sqlx::Error::RowNotFound => AccessError::NotFound("row not found".to_string()),
        sqlx::Error::Database(db) => {
            let message = db.message().to_string();
            match db.code().as_deref() {
                Some("23505") | Some("23503") | Some("23514") | Some("23502") => {
                    AccessError::ConstraintViolation(message)
                }
                Some("40001") | Some("40P01") | Some("55P03") => {
                    AccessError::ConcurrencyConflict(message)
                }
                Some("42501") => AccessError::AuthorizationDenied(message),
                _ => AccessError::Backend(message),
            }
        }
        _ => AccessError::Backend(sqlx_err.to_string()),
    }
}

/// Convenience for call sites holding a plain `sqlx::Error`.
pub fn map_sqlx_error(err: sqlx::Error) -> AccessError {
    map_db_error(Box::new(err))
}
