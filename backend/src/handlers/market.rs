//! HTTP handlers for market prices

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::extract::ValidQuery;
use crate::query::MarketPriceQuery;
use crate::services::market::{MarketPricesResponse, MarketService};
use crate::AppState;

/// Get market prices with trend annotation
pub async fn get_market_prices(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<MarketPriceQuery>,
) -> AppResult<Json<MarketPricesResponse>> {
    let service = MarketService::new(state.repository.clone(), state.config.analytics.clone());
    let response = service.market_prices(query).await?;
    Ok(Json(response))
}
