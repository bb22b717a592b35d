use axum::{
    extract::{Path, Query, State},
    Json,
};
use contracts::domain::demographics::{
    CropsResponse, LocationLevel, LookupResponse, SeasonsResponse,
};
use contracts::shared::sentinel::NA;
use serde::Deserialize;
use serde_json::Value;

use crate::shared::error::AppError;
use crate::shared::state::AppState;
use crate::store::reference::REFERENCE;

fn lookup(level: LocationLevel, parent_id: &str, vo_filter: Option<&str>) -> Result<Json<Value>, AppError> {
    let items = REFERENCE
        .locations(level, parent_id, vo_filter)
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "No {} found for village {}",
                level.collection(),
                parent_id
            ))
        })?;
    tracing::debug!("{} under {:?}: {}", level.collection(), parent_id, items.len());
    Ok(Json(LookupResponse::to_json(level, &items)))
}

/// GET /api/demographics/districts
pub async fn districts() -> Result<Json<Value>, AppError> {
    lookup(LocationLevel::District, "", None)
}

/// GET /api/demographics/mandals/:district_id
pub async fn mandals(Path(district_id): Path<String>) -> Result<Json<Value>, AppError> {
    lookup(LocationLevel::Mandal, &district_id, None)
}

/// GET /api/demographics/panchayats/:mandal_id
pub async fn panchayats(Path(mandal_id): Path<String>) -> Result<Json<Value>, AppError> {
    lookup(LocationLevel::Panchayat, &mandal_id, None)
}

/// GET /api/demographics/villages/:panchayat_id
pub async fn villages(Path(panchayat_id): Path<String>) -> Result<Json<Value>, AppError> {
    lookup(LocationLevel::Village, &panchayat_id, None)
}

/// GET /api/demographics/vo/:village_id
pub async fn vos(Path(village_id): Path<String>) -> Result<Json<Value>, AppError> {
    lookup(LocationLevel::Vo, &village_id, None)
}

#[derive(Debug, Deserialize)]
pub struct ShgQuery {
    pub vo_id: Option<String>,
}

/// GET /api/demographics/shg/:village_id?vo_id=
///
/// A missing, empty or `NA` VO lists every SHG of the village.
pub async fn shgs(
    Path(village_id): Path<String>,
    Query(query): Query<ShgQuery>,
) -> Result<Json<Value>, AppError> {
    let vo_filter = query
        .vo_id
        .as_deref()
        .map(str::trim)
        .filter(|vo| !vo.is_empty() && *vo != NA);
    lookup(LocationLevel::Shg, &village_id, vo_filter)
}

/// GET /api/demographics/crops, as maintained in the crop master.
pub async fn crops(State(state): State<AppState>) -> Json<CropsResponse> {
    Json(CropsResponse {
        success: true,
        crops: state.store.read().await.crops().to_vec(),
    })
}

/// GET /api/demographics/seasons
pub async fn seasons() -> Json<SeasonsResponse> {
    Json(SeasonsResponse {
        success: true,
        seasons: REFERENCE.seasons.clone(),
    })
}
