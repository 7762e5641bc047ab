use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::category::Category as DomainCategory;
use crate::domain::product::{Product as DomainProduct, ProductUpdate as DomainProductUpdate};
use crate::domain::types::{ProductName, ProductPrice, ProductStock, TypeConstraintError};
use crate::models::category::Category as DbCategory;

/// Diesel model representing the `productos` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::productos)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Product {
    pub id: i32,
    pub nombre: String,
    pub descripcion: String,
    pub precio: f64,
    pub stock: i32,
    pub categoria_id: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`Product`].
///
/// Stock always starts at zero; initial stock enters through the ledger.
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::productos)]
pub struct NewProduct {
    pub nombre: String,
    pub descripcion: String,
    pub precio: f64,
    pub categoria_id: Option<i32>,
}

/// Changeset for editable product columns.
///
/// `treat_none_as_null` so that clearing the category is persisted.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::productos)]
#[diesel(treat_none_as_null = true)]
pub struct ProductChangeset {
    pub nombre: String,
    pub descripcion: String,
    pub precio: f64,
    pub categoria_id: Option<i32>,
}

/// Builds a domain product from a row and its optionally joined category.
pub fn into_domain(
    product: Product,
    category: Option<DbCategory>,
) -> Result<DomainProduct, TypeConstraintError> {
    let category = category.map(DomainCategory::try_from).transpose()?;

    Ok(DomainProduct {
        id: product.id.try_into()?,
        name: ProductName::new(product.nombre)?,
        description: product.descripcion,
        price: ProductPrice::new(product.precio)?,
        stock: ProductStock::new(product.stock)?,
        category_id: product.categoria_id.map(TryInto::try_into).transpose()?,
        category,
        created_at: product.created_at,
        updated_at: product.updated_at,
    })
}

impl From<&crate::domain::product::NewProduct> for NewProduct {
    fn from(product: &crate::domain::product::NewProduct) -> Self {
        Self {
            nombre: product.name.as_str().to_string(),
            descripcion: product.description.clone(),
            precio: product.price.get(),
            categoria_id: product.category_id.map(|id| id.get()),
        }
    }
}

impl From<DomainProductUpdate> for ProductChangeset {
    fn from(update: DomainProductUpdate) -> Self {
        Self {
            nombre: update.name.into_inner(),
            descripcion: update.description,
            precio: update.price.get(),
            categoria_id: update.category_id.map(|id| id.get()),
        }
    }
}
