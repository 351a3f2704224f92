//! Translation of HTTP query parameters into repository queries

use serde::{Deserialize, Serialize};

use crate::config::AnalyticsConfig;
use crate::repository::{Column, Entity, FilterValue, OrderBy, RecordQuery};

/// Resolve a requested limit against a default and a hard ceiling.
///
/// Absent or non-positive limits fall back to the default; anything above
/// the ceiling is clamped to it.
pub fn effective_limit(requested: Option<i64>, default: i64, ceiling: i64) -> i64 {
    let limit = match requested {
        Some(limit) if limit > 0 => limit,
        _ => default,
    };

    if limit > ceiling {
        tracing::warn!(requested = limit, ceiling, "Clamping query limit");
        ceiling
    } else {
        limit
    }
}

/// Query parameters for regional statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RegionalStatsQuery {
    pub state: Option<String>,
    pub district: Option<String>,
    pub taluka: Option<String>,
    pub crop: Option<String>,
    pub year: Option<i32>,
    pub limit: Option<i64>,
    /// "json" (default) or "csv"
    #[serde(skip_serializing)]
    pub format: Option<String>,
}

impl RegionalStatsQuery {
    /// Most recent year first with absent years last, then district A-Z
    pub fn to_record_query(&self, config: &AnalyticsConfig) -> RecordQuery {
        let limit = effective_limit(self.limit, config.regional_default_limit, config.max_limit);
        let query = RecordQuery::new(Entity::RegionalStatistics, limit)
            .contains(Column::State, self.state.as_deref())
            .contains(Column::District, self.district.as_deref())
            .contains(Column::Taluka, self.taluka.as_deref())
            .contains(Column::Crop, self.crop.as_deref())
            .equals(Column::Year, self.year.map(FilterValue::Int))
            .order(OrderBy::desc(Column::Year))
            .order(OrderBy::asc(Column::District));

        tracing::debug!(?query, "Translated regional statistics query");
        query
    }
}

/// Query parameters for market prices
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MarketPriceQuery {
    pub commodity: Option<String>,
    pub state: Option<String>,
    pub district: Option<String>,
    pub limit: Option<i64>,
}

impl MarketPriceQuery {
    /// Most recent arrival first. Same-day arrivals order by latest insert,
    /// then id, so the trend comparison sees a stable sequence.
    pub fn to_record_query(&self, config: &AnalyticsConfig) -> RecordQuery {
        let limit = effective_limit(self.limit, config.market_default_limit, config.max_limit);
        let query = RecordQuery::new(Entity::MarketPrices, limit)
            .contains(Column::Commodity, self.commodity.as_deref())
            .contains(Column::State, self.state.as_deref())
            .contains(Column::District, self.district.as_deref())
            .order(OrderBy::desc(Column::ArrivalDate))
            .order(OrderBy::desc(Column::CreatedAt))
            .order(OrderBy::asc(Column::Id));

        tracing::debug!(?query, "Translated market price query");
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_defaults_applied() {
        let config = AnalyticsConfig::default();
        let regional = RegionalStatsQuery::default().to_record_query(&config);
        assert_eq!(regional.limit, 100);
        let market = MarketPriceQuery::default().to_record_query(&config);
        assert_eq!(market.limit, 50);
    }

    #[test]
    fn test_limit_clamped_to_ceiling() {
        let config = AnalyticsConfig::default();
        let query = RegionalStatsQuery {
            limit: Some(1_000_000),
            ..Default::default()
        };
        assert_eq!(query.to_record_query(&config).limit, 1000);
    }

    #[test]
    fn test_non_positive_limit_uses_default() {
        assert_eq!(effective_limit(Some(0), 50, 1000), 50);
        assert_eq!(effective_limit(Some(-5), 50, 1000), 50);
        assert_eq!(effective_limit(None, 50, 1000), 50);
        assert_eq!(effective_limit(Some(7), 50, 1000), 7);
    }

    #[test]
    fn test_regional_ordering_and_filters() {
        let query = RegionalStatsQuery {
            district: Some("pune".to_string()),
            crop: Some("   ".to_string()),
            year: Some(2023),
            ..Default::default()
        }
        .to_record_query(&AnalyticsConfig::default());

        assert_eq!(query.text_filters.len(), 1);
        assert_eq!(query.text_filters[0].column, Column::District);
        assert_eq!(query.exact_filters[0].value, FilterValue::Int(2023));
        assert_eq!(
            query.order_by,
            vec![OrderBy::desc(Column::Year), OrderBy::asc(Column::District)]
        );
        assert!(query.check_columns().is_ok());
    }

    #[test]
    fn test_market_query_columns_valid() {
        let query = MarketPriceQuery {
            commodity: Some("onion".to_string()),
            state: Some("Maharashtra".to_string()),
            ..Default::default()
        }
        .to_record_query(&AnalyticsConfig::default());
        assert!(query.check_columns().is_ok());
        assert_eq!(
            query.order_by,
            vec![
                OrderBy::desc(Column::ArrivalDate),
                OrderBy::desc(Column::CreatedAt),
                OrderBy::asc(Column::Id),
            ]
        );
    }

    proptest! {
        #[test]
        fn prop_limit_never_exceeds_ceiling(
            requested in proptest::option::of(any::<i64>()),
            ceiling in 1..5000i64,
        ) {
            let default = ceiling.min(100);
            let limit = effective_limit(requested, default, ceiling);
            prop_assert!(limit >= 1);
            prop_assert!(limit <= ceiling);
        }
    }
}
