//! Route table.
//!
//! ```text
//! GET    /health
//!
//! reports
//! GET    /api/suppliers/by-tax/{tax_id}
//! GET    /api/suppliers/by-bank-city/{city}
//! GET    /api/analytics/bank-supplier-count
//! GET    /api/materials/by-group/{group_code}
//! GET    /api/finance/total-spent?start=YYYY-MM-DD&end=YYYY-MM-DD
//! GET    /api/inventory/stock-value
//! GET    /api/analytics/supplier-share/{supplier_id}/{group_code}
//! GET    /api/inventory/monthly-load/{year}
//! GET    /api/orders/{order_number}/bank-info
//!
//! writes
//! POST   /api/materials
//! DELETE /api/materials/{id}
//! POST   /api/materials/{id}/units
//! PUT    /api/materials/{id}/units/{unit}
//! POST   /api/suppliers
//! DELETE /api/suppliers/{id}
//! POST   /api/receipts
//! ```

use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};

use crate::AppState;

pub mod catalog;
pub mod receipts;
pub mod reports;
pub mod suppliers;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        // reports
        .route("/api/suppliers/by-tax/{tax_id}", get(reports::supplier_name_by_tax_id))
        .route("/api/suppliers/by-bank-city/{city}", get(reports::suppliers_by_bank_city))
        .route("/api/analytics/bank-supplier-count", get(reports::bank_supplier_counts))
        .route("/api/materials/by-group/{group_code}", get(reports::materials_by_group))
        .route("/api/finance/total-spent", get(reports::total_spent))
        .route("/api/inventory/stock-value", get(reports::stock_value))
        .route(
            "/api/analytics/supplier-share/{supplier_id}/{group_code}",
            get(reports::supplier_share),
        )
        .route("/api/inventory/monthly-load/{year}", get(reports::monthly_load))
        .route("/api/orders/{order_number}/bank-info", get(reports::order_bank_info))
        // writes
        .route("/api/materials", post(catalog::add_material))
        .route("/api/materials/{id}", delete(catalog::delete_material))
        .route("/api/materials/{id}/units", post(catalog::add_unit))
        .route("/api/materials/{id}/units/{unit}", put(catalog::rename_unit))
        .route("/api/suppliers", post(suppliers::add_supplier))
        .route("/api/suppliers/{id}", delete(suppliers::delete_supplier))
        .route("/api/receipts", post(receipts::record_receipt))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    if state.db.health_check().await {
        (StatusCode::OK, Json(json!({ "status": "ok" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "error", "message": "database unavailable" })),
        )
    }
}
