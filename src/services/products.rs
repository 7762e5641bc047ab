use crate::domain::types::{CategoryId, ProductId};
use crate::dto::products::ProductDto;
use crate::forms::products::{ProductForm, ProductFormPayload};
use crate::repository::{
    CategoryReader, ProductListQuery, ProductReader, ProductWriter, RepositoryError,
};

use super::{ServiceError, ServiceResult};

const PRODUCT_NOT_FOUND: &str = "Producto no encontrado";
const UNKNOWN_CATEGORY: &str = "La categoría especificada no existe";
const PRODUCT_HAS_MOVEMENTS: &str =
    "No se puede eliminar el producto: tiene movimientos de inventario registrados";
const STOCK_NOT_EDITABLE: &str =
    "El stock solo puede modificarse mediante movimientos de inventario";

fn parse_id(product_id: i32) -> ServiceResult<ProductId> {
    ProductId::new(product_id).map_err(|_| ServiceError::NotFound(PRODUCT_NOT_FOUND.to_string()))
}

/// Referenced categories must exist before a product may point at them.
fn ensure_category_exists<R>(category_id: Option<CategoryId>, repo: &R) -> ServiceResult<()>
where
    R: CategoryReader,
{
    let Some(category_id) = category_id else {
        return Ok(());
    };

    match repo.get_category_by_id(category_id) {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(ServiceError::InvalidInput(UNKNOWN_CATEGORY.to_string())),
        Err(e) => Err(ServiceError::storage("Failed to get category", e)),
    }
}

pub fn list_products<R>(repo: &R) -> ServiceResult<Vec<ProductDto>>
where
    R: ProductReader,
{
    match repo.list_products(ProductListQuery::default()) {
        Ok(products) => Ok(products.into_iter().map(ProductDto::from).collect()),
        Err(e) => Err(ServiceError::storage("Failed to list products", e)),
    }
}

/// Products of one category. An unknown category simply has no products.
pub fn list_products_by_category<R>(category_id: i32, repo: &R) -> ServiceResult<Vec<ProductDto>>
where
    R: ProductReader,
{
    let Ok(category_id) = CategoryId::new(category_id) else {
        return Ok(Vec::new());
    };

    match repo.list_products(ProductListQuery::default().category(category_id)) {
        Ok(products) => Ok(products.into_iter().map(ProductDto::from).collect()),
        Err(e) => Err(ServiceError::storage("Failed to list products by category", e)),
    }
}

pub fn show_product<R>(product_id: i32, repo: &R) -> ServiceResult<ProductDto>
where
    R: ProductReader,
{
    let product_id = parse_id(product_id)?;

    match repo.get_product_by_id(product_id) {
        Ok(Some(product)) => Ok(product.into()),
        Ok(None) => Err(ServiceError::NotFound(PRODUCT_NOT_FOUND.to_string())),
        Err(e) => Err(ServiceError::storage("Failed to get product", e)),
    }
}

pub fn create_product<R>(form: ProductForm, repo: &R) -> ServiceResult<ProductDto>
where
    R: CategoryReader + ProductWriter,
{
    let payload: ProductFormPayload = form.try_into()?;
    ensure_category_exists(payload.category_id, repo)?;
    let product = payload.into_new_product();

    match repo.create_product(&product) {
        Ok(created) => {
            log::info!(
                "Created product {} ({}) with stock {}",
                created.id,
                created.name,
                created.stock
            );
            Ok(created.into())
        }
        // The category vanished between the check and the insert.
        Err(RepositoryError::Conflict(reason)) => {
            log::warn!("Failed to create product: {reason}");
            Err(ServiceError::InvalidInput(UNKNOWN_CATEGORY.to_string()))
        }
        Err(e) => Err(ServiceError::storage("Failed to create product", e)),
    }
}

/// Update the editable fields of a product.
///
/// A `stock` value in the request is accepted only when it matches the
/// current stock.
pub fn update_product<R>(product_id: i32, form: ProductForm, repo: &R) -> ServiceResult<ProductDto>
where
    R: CategoryReader + ProductReader + ProductWriter,
{
    let product_id = parse_id(product_id)?;
    let payload: ProductFormPayload = form.try_into()?;

    let current = match repo.get_product_by_id(product_id) {
        Ok(Some(product)) => product,
        Ok(None) => return Err(ServiceError::NotFound(PRODUCT_NOT_FOUND.to_string())),
        Err(e) => return Err(ServiceError::storage("Failed to get product", e)),
    };

    if payload.stock.is_some_and(|stock| stock != current.stock) {
        return Err(ServiceError::InvalidInput(STOCK_NOT_EDITABLE.to_string()));
    }

    ensure_category_exists(payload.category_id, repo)?;
    let update = payload.into_update();

    match repo.update_product(product_id, &update) {
        Ok(updated) => Ok(updated.into()),
        Err(RepositoryError::NotFound) => {
            Err(ServiceError::NotFound(PRODUCT_NOT_FOUND.to_string()))
        }
        Err(RepositoryError::Conflict(reason)) => {
            log::warn!("Failed to update product {product_id}: {reason}");
            Err(ServiceError::InvalidInput(UNKNOWN_CATEGORY.to_string()))
        }
        Err(e) => Err(ServiceError::storage("Failed to update product", e)),
    }
}

pub fn delete_product<R>(product_id: i32, repo: &R) -> ServiceResult<()>
where
    R: ProductWriter,
{
    let product_id = parse_id(product_id)?;

    match repo.delete_product(product_id) {
        Ok(()) => {
            log::info!("Deleted product {product_id}");
            Ok(())
        }
        Err(RepositoryError::NotFound) => {
            Err(ServiceError::NotFound(PRODUCT_NOT_FOUND.to_string()))
        }
        Err(RepositoryError::Conflict(reason)) => {
            log::info!("Refused to delete product {product_id}: {reason}");
            Err(ServiceError::Conflict(PRODUCT_HAS_MOVEMENTS.to_string()))
        }
        Err(e) => Err(ServiceError::storage("Failed to delete product", e)),
    }
}
