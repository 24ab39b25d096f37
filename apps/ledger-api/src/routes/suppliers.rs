//! Supplier writes.

use axum::{extract::State, http::StatusCode};
use tracing::info;

use crate::error::ApiResult;
use crate::extract::{Json, Path};
use crate::AppState;
use ledger_core::{NewSupplier, Supplier};

pub async fn add_supplier(
    State(state): State<AppState>,
    Json(supplier): Json<NewSupplier>,
) -> ApiResult<(StatusCode, Json<Supplier>)> {
    let supplier = state.db.suppliers().add(&supplier).await?;
    info!(supplier_id = supplier.supplier_id, "Supplier created");
    Ok((StatusCode::CREATED, Json(supplier)))
}

pub async fn delete_supplier(
    State(state): State<AppState>,
    Path(supplier_id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.db.suppliers().delete(supplier_id).await?;
    info!(supplier_id, "Supplier deleted");
    Ok(StatusCode::NO_CONTENT)
}
