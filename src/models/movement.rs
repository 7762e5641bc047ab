use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::movement::{Movement as DomainMovement, NewMovement as DomainNewMovement};
use crate::domain::types::{MovementQuantity, MovementType, TypeConstraintError};
use crate::models::category::Category as DbCategory;
use crate::models::product::{self, Product as DbProduct};

/// Diesel model representing the `movimientos_inventario` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::movimientos_inventario)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Movement {
    pub id: i32,
    pub producto_id: i32,
    pub tipo: String,
    pub cantidad: i32,
    pub motivo: String,
    pub created_at: NaiveDateTime,
}

/// Insertable form of [`Movement`]. There is no changeset: rows are immutable.
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::movimientos_inventario)]
pub struct NewMovement<'a> {
    pub producto_id: i32,
    pub tipo: &'static str,
    pub cantidad: i32,
    pub motivo: &'a str,
}

/// Row shape produced by `movimientos_inventario LEFT JOIN productos LEFT JOIN categorias`.
pub type MovementRow = (Movement, Option<DbProduct>, Option<DbCategory>);

/// Builds a domain movement from a joined row.
pub fn into_domain(
    (movement, product, category): MovementRow,
) -> Result<DomainMovement, TypeConstraintError> {
    let product = product
        .map(|p| product::into_domain(p, category))
        .transpose()?;

    Ok(DomainMovement {
        id: movement.id.try_into()?,
        product_id: movement.producto_id.try_into()?,
        product,
        kind: MovementType::try_from(movement.tipo)?,
        quantity: MovementQuantity::new(movement.cantidad)?,
        reason: movement.motivo,
        created_at: movement.created_at,
    })
}

impl<'a> From<&'a DomainNewMovement> for NewMovement<'a> {
    fn from(movement: &'a DomainNewMovement) -> Self {
        Self {
            producto_id: movement.product_id.get(),
            tipo: movement.kind.as_str(),
            cantidad: movement.quantity.get(),
            motivo: &movement.reason,
        }
    }
}
