//! Receipt writes.

use axum::{extract::State, http::StatusCode};

use crate::error::ApiResult;
use crate::extract::Json;
use crate::AppState;
use ledger_core::{NewReceipt, Receipt};

pub async fn record_receipt(
    State(state): State<AppState>,
    Json(receipt): Json<NewReceipt>,
) -> ApiResult<(StatusCode, Json<Receipt>)> {
    let receipt = state.db.receipts().record(&receipt).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}
