//! Material catalog and unit of measure writes.

use axum::{extract::State, http::StatusCode};
use serde::Deserialize;
use tracing::info;

use crate::error::ApiResult;
use crate::extract::{Json, Path};
use crate::AppState;
use ledger_core::{Material, NewMaterial, UnitOfMeasure};

#[derive(Debug, Deserialize)]
pub struct UnitName {
    pub unit_name: String,
}

pub async fn add_material(
    State(state): State<AppState>,
    Json(material): Json<NewMaterial>,
) -> ApiResult<(StatusCode, Json<Material>)> {
    let material = state.db.materials().add(&material).await?;
    info!(material_id = material.material_id, "Material created");
    Ok((StatusCode::CREATED, Json(material)))
}

pub async fn delete_material(
    State(state): State<AppState>,
    Path(material_id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.db.materials().delete(material_id).await?;
    info!(material_id, "Material deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_unit(
    State(state): State<AppState>,
    Path(material_id): Path<i64>,
    Json(body): Json<UnitName>,
) -> ApiResult<(StatusCode, Json<UnitOfMeasure>)> {
    let unit = state.db.units().add(material_id, &body.unit_name).await?;
    Ok((StatusCode::CREATED, Json(unit)))
}

/// Renames `{unit}` of material `{id}` to the `unit_name` in the body.
pub async fn rename_unit(
    State(state): State<AppState>,
    Path((material_id, old_name)): Path<(i64, String)>,
    Json(body): Json<UnitName>,
) -> ApiResult<Json<UnitOfMeasure>> {
    let unit = state
        .db
        .units()
        .rename(material_id, &old_name, &body.unit_name)
        .await?;
    info!(material_id, from = %old_name, to = %unit.unit_name, "Unit renamed");
    Ok(Json(unit))
}
