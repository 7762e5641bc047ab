use thiserror::Error;

use crate::repository::RepositoryError;

/// Generic error type used by service layer functions.
///
/// Messages are user-facing and end up in the `{"error": ...}` body.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The request carried malformed or out-of-range data.
    #[error("{0}")]
    InvalidInput(String),
    /// Requested resource was not found.
    #[error("{0}")]
    NotFound(String),
    /// Deletion blocked by dependent rows.
    #[error("{0}")]
    Conflict(String),
    /// A salida asked for more units than are on hand.
    #[error("Stock insuficiente: disponible {available}, solicitado {requested}")]
    InsufficientStock { available: i32, requested: i32 },
    /// The database could not be reached.
    #[error("La base de datos no está disponible")]
    Unavailable,
    /// A lock wait or statement exceeded its timeout.
    #[error("Tiempo de espera agotado al acceder a la base de datos")]
    Timeout,
    /// An unexpected internal error occurred.
    #[error("Error interno del servidor")]
    Internal,
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    /// Map a storage failure that the calling service has no specific
    /// handling for, logging it with `context`.
    pub fn storage(context: &str, err: RepositoryError) -> Self {
        match err {
            RepositoryError::Unavailable(e) => {
                log::error!("{context}: storage unavailable: {e}");
                ServiceError::Unavailable
            }
            RepositoryError::Timeout(e) => {
                log::warn!("{context}: storage timeout: {e}");
                ServiceError::Timeout
            }
            RepositoryError::ValidationError(e) => {
                log::warn!("{context}: rejected by storage constraint: {e}");
                ServiceError::InvalidInput(e)
            }
            RepositoryError::InsufficientStock {
                available,
                requested,
            } => ServiceError::InsufficientStock {
                available,
                requested,
            },
            other => {
                log::error!("{context}: {other}");
                ServiceError::Internal
            }
        }
    }
}
