//! Grouped summary statistics for regional and market records

use std::collections::HashMap;
use std::hash::Hash;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::trend::{AnnotatedPrice, PriceObservation, Trend};
use crate::models::RegionalStatistic;
use crate::types::{round_dp, Region};

/// How missing measures contribute to an average
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AveragePolicy {
    /// Missing values count as zero; the divisor is the record count
    #[default]
    MissingAsZero,
    /// Only present values are averaged; `None` when nothing is present
    PresentOnly,
}

impl AveragePolicy {
    /// `None` when the divisor is zero or the sum does not fit a `Decimal`
    fn average(self, values: impl Iterator<Item = Option<Decimal>>) -> Option<Decimal> {
        let mut sum = Some(Decimal::ZERO);
        let mut records = 0u64;
        let mut present = 0u64;
        for value in values {
            records += 1;
            if let Some(v) = value {
                sum = sum.and_then(|s| s.checked_add(v));
                present += 1;
            }
        }

        let divisor = match self {
            AveragePolicy::MissingAsZero => records,
            AveragePolicy::PresentOnly => present,
        };
        if divisor == 0 {
            return None;
        }
        mean(sum?, divisor)
    }
}

/// Totals and averages over a set of regional statistics
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegionalAggregates {
    pub record_count: usize,
    pub total_area_hectares: Decimal,
    pub total_production_tonnes: Decimal,
    pub average_yield: Option<Decimal>,
    pub average_rainfall_mm: Option<Decimal>,
    pub average_irrigation_percent: Option<Decimal>,
}

fn mean(sum: Decimal, count: u64) -> Option<Decimal> {
    sum.checked_div(Decimal::from(count)).map(|avg| round_dp(avg, 2))
}

/// Sum of the present values, saturating at `Decimal::MAX`
fn total(values: impl Iterator<Item = Option<Decimal>>) -> Decimal {
    values
        .flatten()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
        .unwrap_or(Decimal::MAX)
}

/// Aggregate regional statistics. `None` for an empty set.
pub fn aggregate_regional(
    records: &[RegionalStatistic],
    policy: AveragePolicy,
) -> Option<RegionalAggregates> {
    if records.is_empty() {
        return None;
    }

    Some(RegionalAggregates {
        record_count: records.len(),
        total_area_hectares: total(records.iter().map(|r| r.area_hectares)),
        total_production_tonnes: total(records.iter().map(|r| r.production_tonnes)),
        average_yield: policy.average(records.iter().map(|r| r.yield_kg_per_hectare)),
        average_rainfall_mm: policy.average(records.iter().map(|r| r.rainfall_mm)),
        average_irrigation_percent: policy.average(records.iter().map(|r| r.irrigation_percent)),
    })
}

/// Group items by key, keeping keys in first-seen order and items in
/// their original order within a group
pub fn group_preserving_order<T, K, F>(items: impl IntoIterator<Item = T>, key: F) -> Vec<(K, Vec<T>)>
where
    K: Eq + Hash + Clone,
    F: Fn(&T) -> K,
{
    let mut positions: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<T>)> = Vec::new();

    for item in items {
        let k = key(&item);
        match positions.get(&k) {
            Some(&pos) => groups[pos].1.push(item),
            None => {
                positions.insert(k.clone(), groups.len());
                groups.push((k, vec![item]));
            }
        }
    }

    groups
}

/// Per-district aggregates
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DistrictGroup {
    #[serde(flatten)]
    pub region: Region,
    pub aggregates: RegionalAggregates,
}

/// Aggregate regional statistics per (state, district)
pub fn group_by_district(records: &[RegionalStatistic], policy: AveragePolicy) -> Vec<DistrictGroup> {
    group_preserving_order(records.iter().cloned(), |r| {
        Region::new(r.state.clone(), r.district.clone())
    })
    .into_iter()
    .filter_map(|(region, members)| {
        aggregate_regional(&members, policy).map(|aggregates| DistrictGroup { region, aggregates })
    })
    .collect()
}

/// Observations of one commodity, in their original order
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CommodityGroup<T> {
    pub commodity: String,
    pub records: Vec<T>,
}

/// Group annotated observations by commodity name
pub fn group_by_commodity<T>(annotated: &[AnnotatedPrice<T>]) -> Vec<CommodityGroup<AnnotatedPrice<T>>>
where
    T: PriceObservation + Clone,
{
    group_preserving_order(annotated.iter().cloned(), |a| {
        a.record.series_name().to_string()
    })
    .into_iter()
    .map(|(commodity, records)| CommodityGroup { commodity, records })
    .collect()
}

/// Summary over a set of annotated market observations
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MarketSummary {
    pub commodity_count: usize,
    pub rising_count: usize,
    pub falling_count: usize,
    pub average_price_per_unit: Option<Decimal>,
    pub highest_price_per_unit: Option<Decimal>,
    pub lowest_price_per_unit: Option<Decimal>,
}

/// Summarize annotated observations. An empty set gives zero counts and no
/// price figures.
pub fn summarize_market<T: PriceObservation>(annotated: &[AnnotatedPrice<T>]) -> MarketSummary {
    if annotated.is_empty() {
        return MarketSummary::default();
    }

    let mut commodities: Vec<&str> = annotated.iter().map(|a| a.record.series_name()).collect();
    commodities.sort_unstable();
    commodities.dedup();

    let prices = annotated.iter().map(|a| a.price_per_unit);
    let average = prices
        .clone()
        .try_fold(Decimal::ZERO, |acc, p| acc.checked_add(p))
        .and_then(|sum| mean(sum, annotated.len() as u64));

    MarketSummary {
        commodity_count: commodities.len(),
        rising_count: annotated.iter().filter(|a| a.change.trend == Trend::Up).count(),
        falling_count: annotated.iter().filter(|a| a.change.trend == Trend::Down).count(),
        average_price_per_unit: average,
        highest_price_per_unit: prices.clone().max(),
        lowest_price_per_unit: prices.min(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::annotate_trends;
    use crate::models::Season;
    use chrono::Utc;
    use std::str::FromStr;
    use uuid::Uuid;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn stat(district: &str) -> RegionalStatistic {
        RegionalStatistic {
            id: Uuid::new_v4(),
            state: "Maharashtra".to_string(),
            district: district.to_string(),
            taluka: None,
            crop: Some("Jowar".to_string()),
            season: Some(Season::Rabi),
            year: Some(2023),
            area_hectares: None,
            production_tonnes: None,
            yield_kg_per_hectare: None,
            rainfall_mm: None,
            irrigation_percent: None,
            horticulture_area_hectares: None,
            medicinal_plant_area_hectares: None,
            created_at: Utc::now(),
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Obs(&'static str, i64);

    impl PriceObservation for Obs {
        fn series_name(&self) -> &str {
            self.0
        }

        fn series_code(&self) -> Option<&str> {
            None
        }

        fn effective_price(&self) -> Decimal {
            Decimal::from(self.1)
        }
    }

    // ========================================================================
    // Regional Aggregation Tests
    // ========================================================================

    #[test]
    fn test_empty_regional_is_none() {
        assert_eq!(aggregate_regional(&[], AveragePolicy::MissingAsZero), None);
        assert_eq!(aggregate_regional(&[], AveragePolicy::PresentOnly), None);
    }

    #[test]
    fn test_missing_counts_as_zero_by_default() {
        let mut a = stat("Solapur");
        a.yield_kg_per_hectare = Some(dec("10"));
        let b = stat("Solapur");

        let agg = aggregate_regional(&[a, b], AveragePolicy::default()).unwrap();
        assert_eq!(agg.average_yield, Some(dec("5")));
        assert_eq!(agg.record_count, 2);
    }

    #[test]
    fn test_present_only_policy() {
        let mut a = stat("Solapur");
        a.yield_kg_per_hectare = Some(dec("10"));
        let b = stat("Solapur");

        let agg = aggregate_regional(&[a, b], AveragePolicy::PresentOnly).unwrap();
        assert_eq!(agg.average_yield, Some(dec("10")));
        assert_eq!(agg.average_rainfall_mm, None);
    }

    #[test]
    fn test_all_null_measures() {
        let agg = aggregate_regional(&[stat("Pune")], AveragePolicy::MissingAsZero).unwrap();
        assert_eq!(agg.total_area_hectares, Decimal::ZERO);
        assert_eq!(agg.total_production_tonnes, Decimal::ZERO);
        assert_eq!(agg.average_yield, Some(Decimal::ZERO));
    }

    #[test]
    fn test_totals_and_rounding() {
        let mut a = stat("Pune");
        a.area_hectares = Some(dec("100.5"));
        a.production_tonnes = Some(dec("40"));
        a.rainfall_mm = Some(dec("700"));
        let mut b = stat("Pune");
        b.area_hectares = Some(dec("50"));
        b.rainfall_mm = Some(dec("650"));
        let mut c = stat("Pune");
        c.rainfall_mm = Some(dec("651"));

        let agg = aggregate_regional(&[a, b, c], AveragePolicy::MissingAsZero).unwrap();
        assert_eq!(agg.total_area_hectares, dec("150.5"));
        assert_eq!(agg.total_production_tonnes, dec("40"));
        // 2001 / 3
        assert_eq!(agg.average_rainfall_mm, Some(dec("667.00")));
    }

    #[test]
    fn test_overflowing_measures_do_not_panic() {
        let mut a = stat("Pune");
        a.area_hectares = Some(Decimal::MAX);
        a.yield_kg_per_hectare = Some(Decimal::MAX);
        let b = a.clone();

        let agg = aggregate_regional(&[a, b], AveragePolicy::PresentOnly).unwrap();
        assert_eq!(agg.total_area_hectares, Decimal::MAX);
        assert_eq!(agg.average_yield, None);
    }

    #[test]
    fn test_average_policy_serde() {
        let policy: AveragePolicy = serde_json::from_str("\"present_only\"").unwrap();
        assert_eq!(policy, AveragePolicy::PresentOnly);
        assert_eq!(
            serde_json::to_string(&AveragePolicy::MissingAsZero).unwrap(),
            "\"missing_as_zero\""
        );
    }

    // ========================================================================
    // Grouping Tests
    // ========================================================================

    #[test]
    fn test_grouping_preserves_first_seen_order() {
        let groups = group_preserving_order(vec!["b1", "a1", "b2", "c1", "a2"], |s| {
            s.chars().next().unwrap()
        });
        let keys: Vec<char> = groups.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!['b', 'a', 'c']);
        assert_eq!(groups[0].1, vec!["b1", "b2"]);
        assert_eq!(groups[1].1, vec!["a1", "a2"]);
    }

    #[test]
    fn test_group_by_district() {
        let mut a = stat("Nashik");
        a.area_hectares = Some(dec("10"));
        let mut b = stat("Pune");
        b.area_hectares = Some(dec("20"));
        let mut c = stat("Nashik");
        c.area_hectares = Some(dec("5"));

        let groups = group_by_district(&[a, b, c], AveragePolicy::MissingAsZero);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].region.district, "Nashik");
        assert_eq!(groups[0].aggregates.total_area_hectares, dec("15"));
        assert_eq!(groups[0].aggregates.record_count, 2);
        assert_eq!(groups[1].region.district, "Pune");
    }

    #[test]
    fn test_group_by_commodity() {
        let annotated = annotate_trends(vec![
            Obs("Onion", 2200),
            Obs("Tomato", 900),
            Obs("Onion", 2000),
        ]);
        let groups = group_by_commodity(&annotated);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].commodity, "Onion");
        assert_eq!(groups[0].records.len(), 2);
        assert_eq!(groups[0].records[0].record.1, 2200);
        assert_eq!(groups[1].commodity, "Tomato");
    }

    // ========================================================================
    // Market Summary Tests
    // ========================================================================

    #[test]
    fn test_empty_market_summary() {
        let summary = summarize_market::<Obs>(&[]);
        assert_eq!(summary.commodity_count, 0);
        assert_eq!(summary.rising_count, 0);
        assert_eq!(summary.average_price_per_unit, None);
        assert_eq!(summary.highest_price_per_unit, None);
    }

    #[test]
    fn test_market_summary() {
        let annotated = annotate_trends(vec![
            Obs("Onion", 2200),
            Obs("Tomato", 900),
            Obs("Onion", 2000),
            Obs("Tomato", 1000),
            Obs("Potato", 0),
        ]);
        let summary = summarize_market(&annotated);

        assert_eq!(summary.commodity_count, 3);
        assert_eq!(summary.rising_count, 1);
        assert_eq!(summary.falling_count, 1);
        assert_eq!(summary.highest_price_per_unit, Some(dec("22")));
        assert_eq!(summary.lowest_price_per_unit, Some(Decimal::ZERO));
        // (22 + 9 + 20 + 10 + 0) / 5
        assert_eq!(summary.average_price_per_unit, Some(dec("12.2")));
    }

    #[test]
    fn test_market_summary_overflowing_prices() {
        let huge = AnnotatedPrice {
            record: Obs("Onion", 0),
            change: crate::analytics::PriceChange::UNCHANGED,
            price_per_unit: Decimal::MAX,
        };
        let summary = summarize_market(&[huge.clone(), huge]);
        assert_eq!(summary.commodity_count, 1);
        assert_eq!(summary.average_price_per_unit, None);
        assert_eq!(summary.highest_price_per_unit, Some(Decimal::MAX));
    }
}
