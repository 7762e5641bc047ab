use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::movement::NewMovement;
use crate::domain::types::{MovementQuantity, MovementType, ProductId, TypeConstraintError};

/// JSON body of the create-movement request.
#[derive(Debug, Deserialize, Validate)]
pub struct MovementForm {
    pub producto_id: i32,
    pub tipo: String,
    pub cantidad: i32,
    #[serde(default)]
    #[validate(length(max = 1000, message = "El motivo es demasiado largo"))]
    pub motivo: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MovementFormError {
    #[error("El tipo debe ser 'entrada' o 'salida'")]
    InvalidType,
    #[error("La cantidad debe ser mayor a 0")]
    NonPositiveQuantity,
    #[error("Datos de movimiento inválidos: {0}")]
    Validation(String),
    /// No product can carry a non-positive id.
    #[error("El producto especificado no existe")]
    UnknownProduct,
}

impl From<ValidationErrors> for MovementFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl TryFrom<MovementForm> for NewMovement {
    type Error = MovementFormError;

    // Shape checks run in the order the ledger documents: type, quantity,
    // then product reference.
    fn try_from(value: MovementForm) -> Result<Self, Self::Error> {
        let kind = MovementType::try_from(value.tipo.as_str())
            .map_err(|_| MovementFormError::InvalidType)?;
        let quantity =
            MovementQuantity::new(value.cantidad).map_err(|_| MovementFormError::NonPositiveQuantity)?;
        value.validate()?;
        let product_id = ProductId::new(value.producto_id)
            .map_err(|_: TypeConstraintError| MovementFormError::UnknownProduct)?;

        Ok(NewMovement {
            product_id,
            kind,
            quantity,
            reason: value.motivo.trim().to_string(),
        })
    }
}
