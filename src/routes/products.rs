use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::forms::products::ProductForm;
use crate::repository::DieselRepository;
use crate::routes::run_blocking;
use crate::services::ServiceError;
use crate::services::products::{
    create_product as create_product_service, delete_product as delete_product_service,
    list_products as list_products_service,
    list_products_by_category as list_products_by_category_service,
    show_product as show_product_service, update_product as update_product_service,
};

#[get("")]
pub async fn list_products(repo: web::Data<DieselRepository>) -> Result<HttpResponse, ServiceError> {
    let repo = repo.into_inner();
    let products = run_blocking(move || list_products_service(repo.as_ref())).await?;
    Ok(HttpResponse::Ok().json(products))
}

#[post("")]
pub async fn create_product(
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ProductForm>,
) -> Result<HttpResponse, ServiceError> {
    let repo = repo.into_inner();
    let product = run_blocking(move || create_product_service(form, repo.as_ref())).await?;
    Ok(HttpResponse::Created().json(product))
}

#[get("/categoria/{category_id}")]
pub async fn list_products_by_category(
    category_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let category_id = category_id.into_inner();
    let repo = repo.into_inner();
    let products =
        run_blocking(move || list_products_by_category_service(category_id, repo.as_ref()))
            .await?;
    Ok(HttpResponse::Ok().json(products))
}

#[get("/{product_id}")]
pub async fn show_product(
    product_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let product_id = product_id.into_inner();
    let repo = repo.into_inner();
    let product = run_blocking(move || show_product_service(product_id, repo.as_ref())).await?;
    Ok(HttpResponse::Ok().json(product))
}

#[put("/{product_id}")]
pub async fn update_product(
    product_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ProductForm>,
) -> Result<HttpResponse, ServiceError> {
    let product_id = product_id.into_inner();
    let repo = repo.into_inner();
    let product =
        run_blocking(move || update_product_service(product_id, form, repo.as_ref())).await?;
    Ok(HttpResponse::Ok().json(product))
}

#[delete("/{product_id}")]
pub async fn delete_product(
    product_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let product_id = product_id.into_inner();
    let repo = repo.into_inner();
    run_blocking(move || delete_product_service(product_id, repo.as_ref())).await?;
    Ok(HttpResponse::NoContent().finish())
}
