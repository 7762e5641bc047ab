use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::category::Category;
use crate::domain::types::{CategoryId, ProductId, ProductName, ProductPrice, ProductStock};

/// A stocked product.
///
/// `stock` is owned by the ledger: it only changes through movements.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: ProductName,
    pub description: String,
    pub price: ProductPrice,
    pub stock: ProductStock,
    pub category_id: Option<CategoryId>,
    /// Category resolved through `category_id`, when loaded.
    pub category: Option<Category>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Information required to create a new [`Product`].
///
/// A positive `initial_stock` is recorded as an `entrada` movement in the
/// same transaction that inserts the product.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct NewProduct {
    pub name: ProductName,
    pub description: String,
    pub price: ProductPrice,
    pub initial_stock: ProductStock,
    pub category_id: Option<CategoryId>,
}

/// Editable fields of an existing [`Product`]. Stock is not editable here.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct ProductUpdate {
    pub name: ProductName,
    pub description: String,
    pub price: ProductPrice,
    pub category_id: Option<CategoryId>,
}
