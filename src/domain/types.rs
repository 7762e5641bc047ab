//! Strongly-typed value objects used by domain entities.
//!
//! Domain structs carry these wrappers instead of raw primitives so that
//! identifiers, names, prices and stock quantities are validated once, at the
//! boundary, and can be trusted everywhere else.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Errors produced when attempting to construct constrained domain types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// An identifier was zero or negative.
    #[error("{0} must be greater than zero")]
    NonPositiveId(&'static str),
    /// A numeric value required to be positive was zero or negative.
    #[error("{0} must be greater than zero")]
    NonPositiveNumber(&'static str),
    /// A numeric value required to be non-negative was negative or not finite.
    #[error("{0} must be zero or greater")]
    NegativeNumber(&'static str),
    /// A string was empty or whitespace-only after trimming.
    #[error("{0} cannot be empty")]
    EmptyString(&'static str),
    /// A string exceeded the column width.
    #[error("{0} must be at most {1} characters")]
    TooLong(&'static str, usize),
    /// Movement type tag was neither `entrada` nor `salida`.
    #[error("movement type must be 'entrada' or 'salida', got '{0}'")]
    InvalidMovementType(String),
}

fn trim_and_require_non_empty<S: Into<String>>(
    value: S,
    field: &'static str,
    max_len: usize,
) -> Result<String, TypeConstraintError> {
    let trimmed = value.into().trim().to_string();
    if trimmed.is_empty() {
        Err(TypeConstraintError::EmptyString(field))
    } else if trimmed.chars().count() > max_len {
        Err(TypeConstraintError::TooLong(field, max_len))
    } else {
        Ok(trimmed)
    }
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(
            Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId($field))
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<i32> for $name {
            fn eq(&self, other: &i32) -> bool {
                self.0 == *other
            }
        }
    };
}

macro_rules! name_newtype {
    ($name:ident, $doc:expr, $field:expr, $max_len:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Maximum number of characters accepted by the backing column.
            pub const MAX_LEN: usize = $max_len;

            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                trim_and_require_non_empty(value, $field, Self::MAX_LEN).map(Self)
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                self.as_str()
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.as_str() == *other
            }
        }
    };
}

id_newtype!(CategoryId, "Unique identifier for a category.", "categoria_id");
id_newtype!(ProductId, "Unique identifier for a product.", "producto_id");
id_newtype!(MovementId, "Unique identifier for a movement.", "movimiento_id");

name_newtype!(
    CategoryName,
    "Category name enforcing non-empty values.",
    "nombre",
    100
);
name_newtype!(
    ProductName,
    "Product name enforcing non-empty values.",
    "nombre",
    200
);

/// Non-negative price value in standard currency units.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, PartialOrd)]
#[serde(transparent)]
pub struct ProductPrice(f64);

impl ProductPrice {
    /// Constructs a finite numeric value that is zero or greater.
    pub fn new(value: f64) -> Result<Self, TypeConstraintError> {
        if value.is_finite() && value >= 0.0 {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::NegativeNumber("precio"))
        }
    }

    /// Returns the raw `f64` value.
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for ProductPrice {
    type Error = TypeConstraintError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl PartialEq<f64> for ProductPrice {
    fn eq(&self, other: &f64) -> bool {
        self.0 == *other
    }
}

/// Quantity on hand for a product. Never negative.
#[derive(
    Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(transparent)]
pub struct ProductStock(i32);

impl ProductStock {
    /// Constructs a stock level that must be zero or greater.
    pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
        if value >= 0 {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::NegativeNumber("stock"))
        }
    }

    /// Returns the raw `i32` value.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl Display for ProductStock {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i32> for ProductStock {
    type Error = TypeConstraintError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl PartialEq<i32> for ProductStock {
    fn eq(&self, other: &i32) -> bool {
        self.0 == *other
    }
}

/// Strictly positive number of units moved by a single movement.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct MovementQuantity(i32);

impl MovementQuantity {
    /// Constructs a quantity that must be greater than zero.
    pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::NonPositiveNumber("cantidad"))
        }
    }

    /// Returns the raw `i32` value.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl Display for MovementQuantity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i32> for MovementQuantity {
    type Error = TypeConstraintError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl PartialEq<i32> for MovementQuantity {
    fn eq(&self, other: &i32) -> bool {
        self.0 == *other
    }
}

/// Direction of a stock movement.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    /// Inbound: increases stock.
    Entrada,
    /// Outbound: decreases stock.
    Salida,
}

impl MovementType {
    /// String representation used in persistence and on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Entrada => "entrada",
            Self::Salida => "salida",
        }
    }

    /// Signed stock delta produced by moving `quantity` units in this direction.
    pub const fn signed(self, quantity: MovementQuantity) -> i32 {
        match self {
            Self::Entrada => quantity.get(),
            Self::Salida => -quantity.get(),
        }
    }
}

impl Display for MovementType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for MovementType {
    type Error = TypeConstraintError;

    // Exact match: "Entrada" or " salida" are rejected like any other tag.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "entrada" => Ok(Self::Entrada),
            "salida" => Ok(Self::Salida),
            other => Err(TypeConstraintError::InvalidMovementType(other.to_string())),
        }
    }
}

impl TryFrom<String> for MovementType {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<MovementType> for String {
    fn from(value: MovementType) -> Self {
        value.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_names() {
        let value = ProductName::new("  Tornillo 3mm  ").unwrap();
        assert_eq!(value.as_str(), "Tornillo 3mm");
    }

    #[test]
    fn rejects_blank_names() {
        assert_eq!(
            CategoryName::new("   ").unwrap_err(),
            TypeConstraintError::EmptyString("nombre")
        );
    }

    #[test]
    fn rejects_names_wider_than_column() {
        let long = "x".repeat(CategoryName::MAX_LEN + 1);
        assert_eq!(
            CategoryName::new(long).unwrap_err(),
            TypeConstraintError::TooLong("nombre", 100)
        );
    }

    #[test]
    fn rejects_non_positive_ids() {
        let err = ProductId::new(0).unwrap_err();
        assert_eq!(err, TypeConstraintError::NonPositiveId("producto_id"));
    }

    #[test]
    fn product_price_allows_zero() {
        assert_eq!(ProductPrice::new(0.0).unwrap().get(), 0.0);
    }

    #[test]
    fn product_price_rejects_negative_and_nan() {
        assert!(ProductPrice::new(-0.01).is_err());
        assert!(ProductPrice::new(f64::NAN).is_err());
    }

    #[test]
    fn stock_rejects_negative() {
        assert!(ProductStock::new(0).is_ok());
        assert_eq!(
            ProductStock::new(-1).unwrap_err(),
            TypeConstraintError::NegativeNumber("stock")
        );
    }

    #[test]
    fn quantity_must_be_positive() {
        assert!(MovementQuantity::new(0).is_err());
        assert!(MovementQuantity::new(-3).is_err());
        assert_eq!(MovementQuantity::new(3).unwrap(), 3);
    }

    #[test]
    fn movement_type_accepts_only_known_tags() {
        assert_eq!(
            MovementType::try_from("entrada").unwrap(),
            MovementType::Entrada
        );
        assert_eq!(MovementType::try_from("salida").unwrap(), MovementType::Salida);
        assert_eq!(
            MovementType::try_from("transferencia").unwrap_err(),
            TypeConstraintError::InvalidMovementType("transferencia".into())
        );
        assert!(MovementType::try_from("Entrada").is_err());
    }

    #[test]
    fn movement_type_signs_quantity() {
        let qty = MovementQuantity::new(4).unwrap();
        assert_eq!(MovementType::Entrada.signed(qty), 4);
        assert_eq!(MovementType::Salida.signed(qty), -4);
    }
}
