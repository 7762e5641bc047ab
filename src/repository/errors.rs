//! Errors surfaced by repository implementations.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

use crate::domain::movement::LedgerError;
use crate::domain::types::TypeConstraintError;

/// Failures of a storage operation.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The addressed row does not exist.
    #[error("record not found")]
    NotFound,
    /// A salida asked for more units than the locked stock holds.
    #[error("insufficient stock: {available} available, {requested} requested")]
    InsufficientStock { available: i32, requested: i32 },
    /// The operation would break a referential rule (e.g. deleting a referenced row).
    #[error("conflict: {0}")]
    Conflict(String),
    /// Stored or submitted data violated a domain constraint.
    #[error("validation error: {0}")]
    ValidationError(String),
    /// No connection could be obtained or the connection dropped.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    /// A lock wait or statement exceeded its configured timeout.
    #[error("storage timeout: {0}")]
    Timeout(String),
    /// Any other database failure.
    #[error("database error: {0}")]
    Database(DieselError),
}

/// Convenient alias for repository results.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<DieselError> for RepositoryError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => RepositoryError::NotFound,
            DieselError::DatabaseError(kind, info) => {
                let message = info.message().to_string();
                match kind {
                    DatabaseErrorKind::ClosedConnection => RepositoryError::Unavailable(message),
                    DatabaseErrorKind::CheckViolation => RepositoryError::ValidationError(message),
                    DatabaseErrorKind::ForeignKeyViolation => RepositoryError::Conflict(message),
                    // Postgres reports lock_timeout and statement_timeout as
                    // "canceling statement due to ... timeout".
                    _ if message.contains("timeout") => RepositoryError::Timeout(message),
                    _ => RepositoryError::Database(DieselError::DatabaseError(kind, info)),
                }
            }
            other => RepositoryError::Database(other),
        }
    }
}

impl From<diesel::r2d2::PoolError> for RepositoryError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        RepositoryError::Unavailable(err.to_string())
    }
}

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

impl From<LedgerError> for RepositoryError {
    fn from(val: LedgerError) -> Self {
        match val {
            LedgerError::InsufficientStock {
                available,
                requested,
            } => RepositoryError::InsufficientStock {
                available,
                requested,
            },
            LedgerError::Overflow => RepositoryError::ValidationError(val.to_string()),
        }
    }
}
