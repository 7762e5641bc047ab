use actix_web::{HttpResponse, get, post, web};

use crate::forms::movements::MovementForm;
use crate::repository::DieselRepository;
use crate::routes::run_blocking;
use crate::services::ServiceError;
use crate::services::movements::{
    create_movement as create_movement_service, list_movements as list_movements_service,
    list_product_movements as list_product_movements_service,
    show_movement as show_movement_service,
};

#[get("")]
pub async fn list_movements(
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let repo = repo.into_inner();
    let movements = run_blocking(move || list_movements_service(repo.as_ref())).await?;
    Ok(HttpResponse::Ok().json(movements))
}

/// Apply a stock movement. Responds `201` with the movement and the
/// product snapshot taken after commit.
#[post("")]
pub async fn create_movement(
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<MovementForm>,
) -> Result<HttpResponse, ServiceError> {
    let repo = repo.into_inner();
    let movement = run_blocking(move || create_movement_service(form, repo.as_ref())).await?;
    Ok(HttpResponse::Created().json(movement))
}

#[get("/producto/{product_id}")]
pub async fn list_product_movements(
    product_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let product_id = product_id.into_inner();
    let repo = repo.into_inner();
    let movements =
        run_blocking(move || list_product_movements_service(product_id, repo.as_ref())).await?;
    Ok(HttpResponse::Ok().json(movements))
}

#[get("/{movement_id}")]
pub async fn show_movement(
    movement_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let movement_id = movement_id.into_inner();
    let repo = repo.into_inner();
    let movement = run_blocking(move || show_movement_service(movement_id, repo.as_ref())).await?;
    Ok(HttpResponse::Ok().json(movement))
}
