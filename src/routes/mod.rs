use actix_web::error::{InternalError, JsonPayloadError, PathError};
use actix_web::http::StatusCode;
use actix_web::http::header;
use actix_web::middleware::DefaultHeaders;
use actix_web::{HttpRequest, HttpResponse, ResponseError, web};
use serde_json::json;

use crate::services::{ServiceError, ServiceResult};

pub mod categories;
pub mod main;
pub mod movements;
pub mod products;

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::InvalidInput(_) | ServiceError::InsufficientStock { .. } => {
                StatusCode::BAD_REQUEST
            }
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ServiceError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

/// Run a synchronous service call on the blocking thread pool.
///
/// The task is not cancelled if the client disconnects, so a ledger
/// transaction always runs to commit or rollback.
pub async fn run_blocking<F, T>(f: F) -> ServiceResult<T>
where
    F: FnOnce() -> ServiceResult<T> + Send + 'static,
    T: Send + 'static,
{
    web::block(f).await.map_err(|e| {
        log::error!("Blocking task failed: {e}");
        ServiceError::Internal
    })?
}

fn bad_request(message: String) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(json!({ "error": message }));
    InternalError::from_response(message, response).into()
}

/// Malformed bodies become `400 {"error": ...}` instead of actix's plain text.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        log::debug!("Rejected JSON body: {err}");
        bad_request(format!("Cuerpo JSON inválido: {err}"))
    })
}

/// Non-numeric path identifiers become `400 {"error": "ID inválido"}`.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err: PathError, _req: &HttpRequest| {
        log::debug!("Rejected path parameter: {err}");
        bad_request("ID inválido".to_string())
    })
}

/// Permissive CORS headers added to every response.
pub fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add((header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
        .add((
            header::ACCESS_CONTROL_ALLOW_METHODS,
            "GET, POST, PUT, DELETE, OPTIONS",
        ))
        .add((header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type, Authorization"))
}

/// Register every route of the service.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .service(main::preflight())
        .service(main::health)
        .service(
            web::scope("/api/categorias")
                .service(categories::list_categories)
                .service(categories::create_category)
                .service(categories::show_category)
                .service(categories::update_category)
                .service(categories::delete_category),
        )
        .service(
            web::scope("/api/productos")
                .service(products::list_products)
                .service(products::create_product)
                .service(products::list_products_by_category)
                .service(products::show_product)
                .service(products::update_product)
                .service(products::delete_product),
        )
        .service(
            web::scope("/api/movimientos")
                .service(movements::list_movements)
                .service(movements::create_movement)
                .service(movements::list_product_movements)
                .service(movements::show_movement),
        )
        .default_service(web::route().to(main::not_found));
}
