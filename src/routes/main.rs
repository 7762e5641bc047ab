use actix_web::{HttpResponse, Resource, Responder, get, guard, web};
use serde_json::json;

#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

/// Answer CORS preflight requests for any path.
pub fn preflight() -> Resource {
    web::resource("/{tail:.*}")
        .guard(guard::Options())
        .to(|| async { HttpResponse::Ok().finish() })
}

pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({ "error": "Recurso no encontrado" }))
}
