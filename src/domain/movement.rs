//! Ledger entries and the stock arithmetic they drive.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::product::Product;
use crate::domain::types::{MovementId, MovementQuantity, MovementType, ProductId, ProductStock};

/// Reason recorded for the movement created alongside a product with
/// non-zero initial stock.
pub const INITIAL_STOCK_REASON: &str = "Stock inicial";

/// Immutable ledger entry. Movements are never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movement {
    pub id: MovementId,
    pub product_id: ProductId,
    /// Product snapshot as read after the movement committed.
    pub product: Option<Product>,
    pub kind: MovementType,
    pub quantity: MovementQuantity,
    pub reason: String,
    pub created_at: NaiveDateTime,
}

/// A validated request to append a movement to the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewMovement {
    pub product_id: ProductId,
    pub kind: MovementType,
    pub quantity: MovementQuantity,
    pub reason: String,
}

/// Rejections produced by the ledger arithmetic.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LedgerError {
    /// A salida asked for more units than are on hand.
    #[error("insufficient stock: {available} available, {requested} requested")]
    InsufficientStock { available: i32, requested: i32 },
    /// An entrada would push stock past the integer column range.
    #[error("stock would exceed the maximum representable quantity")]
    Overflow,
}

impl NewMovement {
    /// Stock level that results from applying this movement to `current`.
    ///
    /// `current` must be the value read under the row lock of the same
    /// transaction that will write the result.
    pub fn apply_to(&self, current: ProductStock) -> Result<ProductStock, LedgerError> {
        let next = current
            .get()
            .checked_add(self.kind.signed(self.quantity))
            .ok_or(LedgerError::Overflow)?;

        ProductStock::new(next).map_err(|_| LedgerError::InsufficientStock {
            available: current.get(),
            requested: self.quantity.get(),
        })
    }

    /// Signed delta written as `stock = stock + delta`.
    pub fn delta(&self) -> i32 {
        self.kind.signed(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movement(kind: MovementType, quantity: i32) -> NewMovement {
        NewMovement {
            product_id: ProductId::new(1).unwrap(),
            kind,
            quantity: MovementQuantity::new(quantity).unwrap(),
            reason: String::new(),
        }
    }

    fn stock(value: i32) -> ProductStock {
        ProductStock::new(value).unwrap()
    }

    #[test]
    fn salida_decrements_stock() {
        let next = movement(MovementType::Salida, 4).apply_to(stock(10)).unwrap();
        assert_eq!(next, 6);
    }

    #[test]
    fn salida_can_drain_stock_to_zero() {
        let next = movement(MovementType::Salida, 5).apply_to(stock(5)).unwrap();
        assert_eq!(next, 0);
    }

    #[test]
    fn salida_beyond_stock_is_rejected() {
        let err = movement(MovementType::Salida, 5).apply_to(stock(3)).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientStock {
                available: 3,
                requested: 5
            }
        );
    }

    #[test]
    fn entrada_increments_stock() {
        let next = movement(MovementType::Entrada, 7).apply_to(stock(6)).unwrap();
        assert_eq!(next, 13);
    }

    #[test]
    fn entrada_overflow_is_rejected() {
        let err = movement(MovementType::Entrada, 1)
            .apply_to(stock(i32::MAX))
            .unwrap_err();
        assert_eq!(err, LedgerError::Overflow);
    }

    #[test]
    fn delta_is_signed_by_kind() {
        assert_eq!(movement(MovementType::Entrada, 2).delta(), 2);
        assert_eq!(movement(MovementType::Salida, 2).delta(), -2);
    }
}
