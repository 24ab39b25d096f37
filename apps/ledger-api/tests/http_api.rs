//! Router tests: requests go through the full axum stack against an
//! in-memory store.

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use ledger_db::seed::seed_demo_data;
use ledger_db::{Database, DbConfig};

async fn app() -> Router {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    seed_demo_data(&db).await.unwrap();
    ledger_api::router(db)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app().await;

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn paint_delivery_flow() {
    let app = app().await;

    let (status, material) = send(
        &app,
        Method::POST,
        "/api/materials",
        Some(json!({ "class_code": "LKM", "material_name": "Краска акриловая белая" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(material["material_id"], 5);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/materials/5/units",
        Some(json!({ "unit_name": "литры" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, supplier) = send(
        &app,
        Method::POST,
        "/api/suppliers",
        Some(json!({
            "name": "ООО \"СтройМастер\"",
            "tax_id": "7701234567",
            "bank_address_city": "Москва",
            "bank_account_number": "40702810100000001001"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(supplier["supplier_id"], 1);

    let (status, receipt) = send(
        &app,
        Method::POST,
        "/api/receipts",
        Some(json!({
            "date": "2025-11-01",
            "supplier_id": 1,
            "material_id": 5,
            "unit_of_measure_code": "литры",
            "quantity": "500.000",
            "unit_price": "550.50"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(receipt["order_number"], 4);
    assert_eq!(receipt["unit_price"], "550.50");

    let (status, info) = get(&app, "/api/orders/4/bank-info").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(info["bank_address_city"], "Москва");
    assert_eq!(info["total_amount"], "275250.00");

    let (status, name) = get(&app, "/api/suppliers/by-tax/7701234567").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(name["name"], "ООО \"СтройМастер\"");

    // unit renamed, the receipt follows
    let (status, unit) = send(
        &app,
        Method::PUT,
        "/api/materials/5/units/%D0%BB%D0%B8%D1%82%D1%80%D1%8B",
        Some(json!({ "unit_name": "литр" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unit["unit_name"], "литр");
}

#[tokio::test]
async fn error_statuses() {
    let app = app().await;

    // unit not registered for material 1
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/receipts",
        Some(json!({
            "date": "2025-02-01",
            "material_id": 1,
            "unit_of_measure_code": "кг",
            "quantity": "1",
            "unit_price": "10"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");

    // zero quantity
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/receipts",
        Some(json!({
            "date": "2025-02-01",
            "material_id": 1,
            "unit_of_measure_code": "т",
            "quantity": "0",
            "unit_price": "10"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Constraint violation: quantity must be positive");

    // material 1 carries an opening balance
    let (status, body) = send(&app, Method::DELETE, "/api/materials/1", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], "error");

    // duplicate unit pair
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/materials/1/units",
        Some(json!({ "unit_name": "т" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, Method::DELETE, "/api/suppliers/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = get(&app, "/api/suppliers/by-tax/0000000000").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");

    // opening balances have no supplier
    let (status, _) = get(&app, "/api/orders/1/bank-info").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_requests_get_json_errors() {
    let app = app().await;

    // four fraction digits in a quantity
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/receipts",
        Some(json!({
            "date": "2025-02-01",
            "material_id": 1,
            "unit_of_measure_code": "т",
            "quantity": "1.0001",
            "unit_price": "10"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().contains("quantity"));

    let (status, body) = get(&app, "/api/finance/total-spent?start=bad&end=2025-01-31").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert!(body["message"].is_string());

    let (status, body) = send(&app, Method::DELETE, "/api/materials/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert!(body["message"].is_string());

    // nothing was written
    let (status, _) = get(&app, "/api/orders/4/bank-info").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deletes_return_no_content() {
    let app = app().await;

    let (status, body) = send(&app, Method::DELETE, "/api/materials/4", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&app, Method::DELETE, "/api/materials/4", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn report_endpoints() {
    let app = app().await;

    let (status, total) = get(&app, "/api/finance/total-spent?start=2025-01-01&end=2025-01-31").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(total["total_amount"], "840575.00");

    let (status, stock) = get(&app, "/api/inventory/stock-value").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stock.as_array().unwrap().len(), 3);
    assert_eq!(stock[0]["material_id"], 1);
    assert_eq!(stock[0]["total_quantity"], "12.500");

    let (status, load) = get(&app, "/api/inventory/monthly-load/2025").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(load, json!([{ "month": 1, "monthly_value": "840575.00" }]));

    let (status, group) = get(&app, "/api/materials/by-group/ARM").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(group[0]["class_code"], "MET");

    let (status, share) = get(&app, "/api/analytics/supplier-share/1/ARM").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(share["supplier_share"], 0.0);

    let (status, share) = get(&app, "/api/analytics/supplier-share/1/NONE").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(share["supplier_share"], Value::Null);

    let (status, counts) = get(&app, "/api/analytics/bank-supplier-count").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(counts, json!([]));

    let (status, by_city) = get(&app, "/api/suppliers/by-bank-city/Tula").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_city, json!([]));
}
