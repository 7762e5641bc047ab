use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::forms::categories::CategoryForm;
use crate::repository::DieselRepository;
use crate::routes::run_blocking;
use crate::services::ServiceError;
use crate::services::categories::{
    create_category as create_category_service, delete_category as delete_category_service,
    list_categories as list_categories_service, show_category as show_category_service,
    update_category as update_category_service,
};

#[get("")]
pub async fn list_categories(
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let repo = repo.into_inner();
    let categories = run_blocking(move || list_categories_service(repo.as_ref())).await?;
    Ok(HttpResponse::Ok().json(categories))
}

#[post("")]
pub async fn create_category(
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CategoryForm>,
) -> Result<HttpResponse, ServiceError> {
    let repo = repo.into_inner();
    let category = run_blocking(move || create_category_service(form, repo.as_ref())).await?;
    Ok(HttpResponse::Created().json(category))
}

#[get("/{category_id}")]
pub async fn show_category(
    category_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let category_id = category_id.into_inner();
    let repo = repo.into_inner();
    let category = run_blocking(move || show_category_service(category_id, repo.as_ref())).await?;
    Ok(HttpResponse::Ok().json(category))
}

#[put("/{category_id}")]
pub async fn update_category(
    category_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CategoryForm>,
) -> Result<HttpResponse, ServiceError> {
    let category_id = category_id.into_inner();
    let repo = repo.into_inner();
    let category =
        run_blocking(move || update_category_service(category_id, form, repo.as_ref())).await?;
    Ok(HttpResponse::Ok().json(category))
}

#[delete("/{category_id}")]
pub async fn delete_category(
    category_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let category_id = category_id.into_inner();
    let repo = repo.into_inner();
    run_blocking(move || delete_category_service(category_id, repo.as_ref())).await?;
    Ok(HttpResponse::NoContent().finish())
}
