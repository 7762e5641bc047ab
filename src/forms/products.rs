use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::product::{NewProduct, ProductUpdate};
use crate::domain::types::{
    CategoryId, ProductName, ProductPrice, ProductStock, TypeConstraintError,
};

/// JSON body accepted by product create and update.
///
/// `stock` is the initial stock on create. On update it may be echoed back
/// unchanged but cannot be modified; stock only moves through the ledger.
#[derive(Debug, Deserialize, Validate)]
pub struct ProductForm {
    #[validate(length(min = 1, message = "El nombre es requerido"))]
    pub nombre: String,
    #[serde(default)]
    pub descripcion: String,
    #[validate(range(min = 0.0, message = "El precio no puede ser negativo"))]
    pub precio: f64,
    #[validate(range(min = 0, message = "El stock no puede ser negativo"))]
    pub stock: Option<i32>,
    pub categoria_id: Option<i32>,
}

/// Validated product fields plus the submitted stock value, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFormPayload {
    pub name: ProductName,
    pub description: String,
    pub price: ProductPrice,
    pub stock: Option<ProductStock>,
    pub category_id: Option<CategoryId>,
}

impl ProductFormPayload {
    pub fn into_new_product(self) -> NewProduct {
        NewProduct {
            name: self.name,
            description: self.description,
            price: self.price,
            initial_stock: self.stock.unwrap_or_default(),
            category_id: self.category_id,
        }
    }

    pub fn into_update(self) -> ProductUpdate {
        ProductUpdate {
            name: self.name,
            description: self.description,
            price: self.price,
            category_id: self.category_id,
        }
    }
}

#[derive(Debug, Error)]
pub enum ProductFormError {
    #[error("Datos de producto inválidos: {0}")]
    Validation(String),
    #[error("Datos de producto inválidos: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for ProductFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for ProductFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<ProductForm> for ProductFormPayload {
    type Error = ProductFormError;

    fn try_from(value: ProductForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            name: ProductName::new(value.nombre)?,
            description: value.descripcion.trim().to_string(),
            price: ProductPrice::new(value.precio)?,
            stock: value.stock.map(ProductStock::new).transpose()?,
            category_id: value.categoria_id.map(CategoryId::new).transpose()?,
        })
    }
}
