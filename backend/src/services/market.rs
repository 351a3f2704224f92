//! Market prices with trend annotation and summary

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::{
    annotate_trends, group_by_commodity, summarize_market, AnnotatedPrice, CommodityGroup,
    MarketPrice, MarketSummary,
};

use crate::config::AnalyticsConfig;
use crate::error::AppResult;
use crate::query::MarketPriceQuery;
use crate::repository::Repository;

/// Market prices annotated with their trend, grouped and summarized
#[derive(Debug, Clone, Serialize)]
pub struct MarketPricesResponse {
    pub records: Vec<AnnotatedPrice<MarketPrice>>,
    pub by_commodity: Vec<CommodityGroup<AnnotatedPrice<MarketPrice>>>,
    pub summary: MarketSummary,
    /// Filters as received
    pub filters: MarketPriceQuery,
    pub last_updated: DateTime<Utc>,
}

/// Market service
#[derive(Clone)]
pub struct MarketService {
    repository: Arc<dyn Repository>,
    analytics: AnalyticsConfig,
}

impl MarketService {
    pub fn new(repository: Arc<dyn Repository>, analytics: AnalyticsConfig) -> Self {
        Self {
            repository,
            analytics,
        }
    }

    /// Filtered prices, most recent arrival first, each compared against the
    /// previous arrival of the same commodity within the result set
    pub async fn market_prices(&self, params: MarketPriceQuery) -> AppResult<MarketPricesResponse> {
        let query = params.to_record_query(&self.analytics);
        let prices = self.repository.market_prices(&query).await?;

        let records = annotate_trends(prices);
        let by_commodity = group_by_commodity(&records);
        let summary = summarize_market(&records);

        tracing::info!(
            count = records.len(),
            commodities = summary.commodity_count,
            rising = summary.rising_count,
            falling = summary.falling_count,
            "Market price query served"
        );

        Ok(MarketPricesResponse {
            records,
            by_commodity,
            summary,
            filters: params,
            last_updated: Utc::now(),
        })
    }
}
