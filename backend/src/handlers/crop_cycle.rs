//! HTTP handlers for crop cycles

use axum::{extract::State, http::StatusCode, Json};
use chrono::NaiveDate;
use serde::Deserialize;
use shared::{CropCycle, CropCycleInput};
use uuid::Uuid;

use crate::error::AppResult;
use crate::extract::{ValidJson, ValidPath};
use crate::middleware::CurrentUser;
use crate::services::CropCycleService;
use crate::AppState;

/// Create a crop cycle for the current user
pub async fn create_crop_cycle(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ValidJson(input): ValidJson<CropCycleInput>,
) -> AppResult<(StatusCode, Json<CropCycle>)> {
    let service = CropCycleService::new(state.repository.clone());
    let cycle = service.create(current_user.0.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(cycle)))
}

/// Get a crop cycle by ID
pub async fn get_crop_cycle(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ValidPath(cycle_id): ValidPath<Uuid>,
) -> AppResult<Json<CropCycle>> {
    let service = CropCycleService::new(state.repository.clone());
    let cycle = service.get(current_user.0.user_id, cycle_id).await?;
    Ok(Json(cycle))
}

#[derive(Debug, Deserialize)]
pub struct PlantingDateInput {
    pub planting_date: NaiveDate,
}

/// Move a crop cycle's planting date
pub async fn update_planting_date(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ValidPath(cycle_id): ValidPath<Uuid>,
    ValidJson(input): ValidJson<PlantingDateInput>,
) -> AppResult<Json<CropCycle>> {
    let service = CropCycleService::new(state.repository.clone());
    let cycle = service
        .update_planting_date(current_user.0.user_id, cycle_id, input.planting_date)
        .await?;
    Ok(Json(cycle))
}
