//! Error conversion glue between the form and service layers.
//!
//! Forms must not depend on service error types, so the conversions
//! live here and are compiled only with the `server` feature.

use crate::forms::categories::CategoryFormError;
use crate::forms::movements::MovementFormError;
use crate::forms::products::ProductFormError;
use crate::services::ServiceError;

impl From<CategoryFormError> for ServiceError {
    fn from(val: CategoryFormError) -> Self {
        ServiceError::InvalidInput(val.to_string())
    }
}

impl From<ProductFormError> for ServiceError {
    fn from(val: ProductFormError) -> Self {
        ServiceError::InvalidInput(val.to_string())
    }
}

impl From<MovementFormError> for ServiceError {
    fn from(val: MovementFormError) -> Self {
        match val {
            MovementFormError::UnknownProduct => ServiceError::NotFound(val.to_string()),
            other => ServiceError::InvalidInput(other.to_string()),
        }
    }
}
