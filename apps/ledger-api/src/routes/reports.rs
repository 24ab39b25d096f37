//! Read-only report endpoints.

use axum::extract::State;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::extract::{Json, Path, Query};
use crate::AppState;
use ledger_core::{
    BankSupplierCount, InventoryValue, MaterialAssortment, Money, MonthlyLoad, OrderBankInfo,
    SupplierBankInfo, SupplierShare,
};

#[derive(Debug, Serialize)]
pub struct SupplierName {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct PeriodParams {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct TotalAmount {
    pub total_amount: Money,
}

pub async fn supplier_name_by_tax_id(
    State(state): State<AppState>,
    Path(tax_id): Path<String>,
) -> ApiResult<Json<SupplierName>> {
    match state.db.reports().supplier_name_by_tax_id(&tax_id).await? {
        Some(name) => Ok(Json(SupplierName { name })),
        None => Err(ApiError::NotFound(format!(
            "Supplier with tax id {} not found",
            tax_id
        ))),
    }
}

pub async fn suppliers_by_bank_city(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> ApiResult<Json<Vec<SupplierBankInfo>>> {
    Ok(Json(state.db.reports().suppliers_by_bank_city(&city).await?))
}

pub async fn bank_supplier_counts(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<BankSupplierCount>>> {
    Ok(Json(state.db.reports().bank_supplier_counts().await?))
}

pub async fn materials_by_group(
    State(state): State<AppState>,
    Path(group_code): Path<String>,
) -> ApiResult<Json<Vec<MaterialAssortment>>> {
    Ok(Json(state.db.reports().materials_by_group(&group_code).await?))
}

/// Both ends of the period are inclusive.
pub async fn total_spent(
    State(state): State<AppState>,
    Query(period): Query<PeriodParams>,
) -> ApiResult<Json<TotalAmount>> {
    let total_amount = state.db.reports().total_spent(period.start, period.end).await?;
    Ok(Json(TotalAmount { total_amount }))
}

pub async fn stock_value(State(state): State<AppState>) -> ApiResult<Json<Vec<InventoryValue>>> {
    Ok(Json(state.db.reports().stock_value().await?))
}

pub async fn supplier_share(
    State(state): State<AppState>,
    Path((supplier_id, group_code)): Path<(i64, String)>,
) -> ApiResult<Json<SupplierShare>> {
    Ok(Json(
        state.db.reports().supplier_share(supplier_id, &group_code).await?,
    ))
}

pub async fn monthly_load(
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> ApiResult<Json<Vec<MonthlyLoad>>> {
    Ok(Json(state.db.reports().monthly_load(year).await?))
}

pub async fn order_bank_info(
    State(state): State<AppState>,
    Path(order_number): Path<i64>,
) -> ApiResult<Json<OrderBankInfo>> {
    state
        .db
        .reports()
        .order_bank_info(order_number)
        .await?
        .map(Json)
        .ok_or_else(|| {
            ApiError::NotFound(format!(
                "Order {} not found or has no supplier",
                order_number
            ))
        })
}
