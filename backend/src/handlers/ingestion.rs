//! HTTP handlers for reference data ingestion

use axum::{extract::State, http::StatusCode, Json};
use shared::{MarketPriceInput, RegionalStatisticInput};

use crate::error::AppResult;
use crate::extract::ValidJson;
use crate::middleware::CurrentUser;
use crate::services::ingestion::{IngestionReceipt, IngestionService};
use crate::AppState;

/// Ingest a batch of market prices
pub async fn ingest_market_prices(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ValidJson(input): ValidJson<Vec<MarketPriceInput>>,
) -> AppResult<(StatusCode, Json<IngestionReceipt>)> {
    tracing::info!(
        user_id = %current_user.0.user_id,
        records = input.len(),
        "Market price batch received"
    );
    let service = IngestionService::new(state.repository.clone());
    let receipt = service.ingest_market_prices(input).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// Ingest a batch of regional statistics
pub async fn ingest_regional_statistics(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ValidJson(input): ValidJson<Vec<RegionalStatisticInput>>,
) -> AppResult<(StatusCode, Json<IngestionReceipt>)> {
    tracing::info!(
        user_id = %current_user.0.user_id,
        records = input.len(),
        "Regional statistics batch received"
    );
    let service = IngestionService::new(state.repository.clone());
    let receipt = service.ingest_regional_statistics(input).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}
