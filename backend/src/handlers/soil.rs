//! HTTP handler for the soil health score

use axum::Json;
use shared::{SoilHealthReport, SoilSample, SoilSampleInput};

use crate::error::AppResult;
use crate::extract::ValidJson;

/// Score a soil sample. Nothing is stored.
pub async fn score_soil(
    ValidJson(input): ValidJson<SoilSampleInput>,
) -> AppResult<Json<SoilHealthReport>> {
    let sample = SoilSample::try_from(input)?;
    let report = sample.report();
    tracing::debug!(score = report.score, band = %report.band, "Soil sample scored");
    Ok(Json(report))
}
