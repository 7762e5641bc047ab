use crate::domain::types::CategoryId;
use crate::dto::categories::CategoryDto;
use crate::forms::categories::{CategoryForm, CategoryFormPayload};
use crate::repository::{CategoryReader, CategoryWriter, RepositoryError};

use super::{ServiceError, ServiceResult};

const CATEGORY_NOT_FOUND: &str = "Categoría no encontrada";
const CATEGORY_IN_USE: &str = "No se puede eliminar la categoría: tiene productos asociados";

fn parse_id(category_id: i32) -> ServiceResult<CategoryId> {
    CategoryId::new(category_id).map_err(|_| ServiceError::NotFound(CATEGORY_NOT_FOUND.to_string()))
}

pub fn list_categories<R>(repo: &R) -> ServiceResult<Vec<CategoryDto>>
where
    R: CategoryReader,
{
    match repo.list_categories() {
        Ok(categories) => Ok(categories.into_iter().map(CategoryDto::from).collect()),
        Err(e) => Err(ServiceError::storage("Failed to list categories", e)),
    }
}

pub fn show_category<R>(category_id: i32, repo: &R) -> ServiceResult<CategoryDto>
where
    R: CategoryReader,
{
    let category_id = parse_id(category_id)?;

    match repo.get_category_by_id(category_id) {
        Ok(Some(category)) => Ok(category.into()),
        Ok(None) => Err(ServiceError::NotFound(CATEGORY_NOT_FOUND.to_string())),
        Err(e) => Err(ServiceError::storage("Failed to get category", e)),
    }
}

pub fn create_category<R>(form: CategoryForm, repo: &R) -> ServiceResult<CategoryDto>
where
    R: CategoryWriter,
{
    let payload: CategoryFormPayload = form.try_into()?;
    let category = payload.into_new_category();

    match repo.create_category(&category) {
        Ok(created) => {
            log::info!("Created category {} ({})", created.id, created.name);
            Ok(created.into())
        }
        Err(e) => Err(ServiceError::storage("Failed to create category", e)),
    }
}

pub fn update_category<R>(
    category_id: i32,
    form: CategoryForm,
    repo: &R,
) -> ServiceResult<CategoryDto>
where
    R: CategoryWriter,
{
    let category_id = parse_id(category_id)?;
    let payload: CategoryFormPayload = form.try_into()?;
    let update = payload.into_new_category();

    match repo.update_category(category_id, &update) {
        Ok(updated) => Ok(updated.into()),
        Err(RepositoryError::NotFound) => {
            Err(ServiceError::NotFound(CATEGORY_NOT_FOUND.to_string()))
        }
        Err(e) => Err(ServiceError::storage("Failed to update category", e)),
    }
}

pub fn delete_category<R>(category_id: i32, repo: &R) -> ServiceResult<()>
where
    R: CategoryWriter,
{
    let category_id = parse_id(category_id)?;

    match repo.delete_category(category_id) {
        Ok(()) => {
            log::info!("Deleted category {category_id}");
            Ok(())
        }
        Err(RepositoryError::NotFound) => {
            Err(ServiceError::NotFound(CATEGORY_NOT_FOUND.to_string()))
        }
        Err(RepositoryError::Conflict(reason)) => {
            log::info!("Refused to delete category {category_id}: {reason}");
            Err(ServiceError::Conflict(CATEGORY_IN_USE.to_string()))
        }
        Err(e) => Err(ServiceError::storage("Failed to delete category", e)),
    }
}
