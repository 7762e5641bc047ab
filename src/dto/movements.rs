use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::movement::Movement;
use crate::domain::types::MovementType;
use crate::dto::products::ProductDto;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovementDto {
    pub id: i32,
    pub producto_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub producto: Option<ProductDto>,
    pub tipo: MovementType,
    pub cantidad: i32,
    pub motivo: String,
    pub created_at: NaiveDateTime,
}

impl From<Movement> for MovementDto {
    fn from(value: Movement) -> Self {
        Self {
            id: value.id.get(),
            producto_id: value.product_id.get(),
            producto: value.product.map(ProductDto::from),
            tipo: value.kind,
            cantidad: value.quantity.get(),
            motivo: value.reason,
            created_at: value.created_at,
        }
    }
}
