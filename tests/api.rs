use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::json;

use inventario::routes::configure;

mod common;

#[actix_web::test]
async fn movement_endpoint_applies_and_rejects_movements() {
    let Some(test_db) = common::TestDb::new() else {
        return;
    };
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_db.repo()))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/productos")
        .set_json(json!({"nombre": "Martillo", "precio": 12.5, "stock": 10}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let product: serde_json::Value = test::read_body_json(resp).await;
    let product_id = product["id"].as_i64().expect("product id");
    assert!(product.get("categoria").is_none());

    let req = test::TestRequest::post()
        .uri("/api/movimientos")
        .set_json(json!({
            "producto_id": product_id,
            "tipo": "salida",
            "cantidad": 4,
            "motivo": "venta"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let movement: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(movement["tipo"], "salida");
    assert_eq!(movement["cantidad"], 4);
    assert_eq!(movement["producto"]["id"], product_id);
    assert_eq!(movement["producto"]["stock"], 6);

    let req = test::TestRequest::post()
        .uri("/api/movimientos")
        .set_json(json!({"producto_id": product_id, "tipo": "salida", "cantidad": 7}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Stock insuficiente: disponible 6, solicitado 7");

    let req = test::TestRequest::post()
        .uri("/api/movimientos")
        .set_json(json!({"producto_id": 9999, "tipo": "entrada", "cantidad": 1}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri(&format!("/api/movimientos/producto/{product_id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let movements: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(movements.as_array().expect("list").len(), 2);

    let req = test::TestRequest::get()
        .uri("/api/movimientos/producto/9999")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let movements: serde_json::Value = test::read_body_json(resp).await;
    assert!(movements.as_array().expect("list").is_empty());
}

#[actix_web::test]
async fn referenced_category_cannot_be_deleted() {
    let Some(test_db) = common::TestDb::new() else {
        return;
    };
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_db.repo()))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/categorias")
        .set_json(json!({"nombre": "Pinturas"}))
        .to_request();
    let category: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    let category_id = category["id"].as_i64().expect("category id");

    let req = test::TestRequest::post()
        .uri("/api/productos")
        .set_json(json!({"nombre": "Esmalte", "precio": 3.0, "categoria_id": category_id}))
        .to_request();
    let product: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(product["categoria"]["nombre"], "Pinturas");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/categorias/{category_id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
}
