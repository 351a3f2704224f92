//! HTTP handlers for regional statistics

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Json,
};

use crate::error::AppResult;
use crate::extract::ValidQuery;
use crate::query::RegionalStatsQuery;
use crate::services::StatisticsService;
use crate::AppState;

/// Get regional statistics, as JSON or CSV
pub async fn get_regional_statistics(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<RegionalStatsQuery>,
) -> AppResult<impl IntoResponse> {
    let service = StatisticsService::new(state.repository.clone(), state.config.analytics.clone());
    let response = service.regional_statistics(&query).await?;

    if query.format.as_deref() == Some("csv") {
        let csv = StatisticsService::export_to_csv(&response.records)?;
        Ok((
            [
                (header::CONTENT_TYPE, "text/csv"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"regional_statistics.csv\"",
                ),
            ],
            csv,
        )
            .into_response())
    } else {
        Ok(Json(response).into_response())
    }
}
