//! Market price trend classification
//!
//! Each observation is compared against the nearest *older* observation of
//! the same series in the supplied ordering. Callers must pass observations
//! ordered most-recent-first; the classifier does not sort.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{round_dp, KG_PER_QUINTAL};

/// Percent change beyond which a price is considered moving
pub const TREND_THRESHOLD_PERCENT: Decimal = Decimal::TWO;

/// A time-stamped price belonging to a commodity series
pub trait PriceObservation {
    /// Commodity name
    fn series_name(&self) -> &str;

    /// Alternate commodity identifier, if reported
    fn series_code(&self) -> Option<&str>;

    /// Price used for comparisons
    fn effective_price(&self) -> Decimal;

    /// Per-kg price derived from the per-quintal effective price
    fn price_per_unit(&self) -> Decimal {
        round_dp(self.effective_price() / Decimal::from(KG_PER_QUINTAL), 2)
    }
}

/// Two observations belong to one series when their names match or both
/// carry the same alternate identifier
pub fn same_series<A, B>(a: &A, b: &B) -> bool
where
    A: PriceObservation + ?Sized,
    B: PriceObservation + ?Sized,
{
    if a.series_name() == b.series_name() {
        return true;
    }
    matches!((a.series_code(), b.series_code()), (Some(x), Some(y)) if x == y)
}

/// Direction of a price movement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trend::Up => write!(f, "up"),
            Trend::Down => write!(f, "down"),
            Trend::Stable => write!(f, "stable"),
        }
    }
}

/// Change of one observation against its predecessor in the series
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriceChange {
    pub trend: Trend,
    /// Percent change, one decimal place
    pub change_percent: Decimal,
    /// Absolute change in price units, whole number
    pub change_amount: Decimal,
}

impl PriceChange {
    /// No predecessor, or nothing to compare against
    pub const UNCHANGED: PriceChange = PriceChange {
        trend: Trend::Stable,
        change_percent: Decimal::ZERO,
        change_amount: Decimal::ZERO,
    };

    /// Compare a current price against the previous one.
    ///
    /// A non-positive previous price yields `UNCHANGED` whatever the current
    /// price is, as does a change too large to represent.
    pub fn between(current: Decimal, previous: Decimal) -> Self {
        if previous <= Decimal::ZERO {
            return Self::UNCHANGED;
        }

        let change = current
            .checked_sub(previous)
            .and_then(|delta| delta.checked_div(previous))
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .map(|percent| round_dp(percent, 1))
            .and_then(|change_percent| {
                current
                    .checked_mul(change_percent)
                    .map(|amount| round_dp(amount / Decimal::ONE_HUNDRED, 0))
                    .map(|change_amount| (change_percent, change_amount))
            });

        match change {
            Some((change_percent, change_amount)) => Self {
                trend: classify_change(change_percent),
                change_percent,
                change_amount,
            },
            None => Self::UNCHANGED,
        }
    }
}

/// Label a percent change against the ±2% threshold
pub fn classify_change(change_percent: Decimal) -> Trend {
    if change_percent > TREND_THRESHOLD_PERCENT {
        Trend::Up
    } else if change_percent < -TREND_THRESHOLD_PERCENT {
        Trend::Down
    } else {
        Trend::Stable
    }
}

/// Classify every observation by scanning forward for its nearest older
/// same-series record. O(n²) in the worst case.
pub fn classify_trends<T: PriceObservation>(observations: &[T]) -> Vec<PriceChange> {
    observations
        .iter()
        .enumerate()
        .map(|(i, current)| {
            observations[i + 1..]
                .iter()
                .find(|older| same_series(current, *older))
                .map(|previous| {
                    PriceChange::between(current.effective_price(), previous.effective_price())
                })
                .unwrap_or(PriceChange::UNCHANGED)
        })
        .collect()
}

/// Same result as [`classify_trends`] in a single backward pass.
///
/// Walking from the oldest position, the maps always hold the smallest
/// index after the current one for each name and each alternate identifier,
/// so the nearest older match is the lesser of the two lookups.
pub fn classify_trends_indexed<T: PriceObservation>(observations: &[T]) -> Vec<PriceChange> {
    let mut by_name: HashMap<&str, usize> = HashMap::new();
    let mut by_code: HashMap<&str, usize> = HashMap::new();
    let mut changes = vec![PriceChange::UNCHANGED; observations.len()];

    for (i, current) in observations.iter().enumerate().rev() {
        let name_hit = by_name.get(current.series_name()).copied();
        let code_hit = current
            .series_code()
            .and_then(|code| by_code.get(code).copied());

        let nearest = match (name_hit, code_hit) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };

        if let Some(j) = nearest {
            changes[i] = PriceChange::between(
                current.effective_price(),
                observations[j].effective_price(),
            );
        }

        by_name.insert(current.series_name(), i);
        if let Some(code) = current.series_code() {
            by_code.insert(code, i);
        }
    }

    changes
}

/// An observation with its trend annotation
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AnnotatedPrice<T> {
    #[serde(flatten)]
    pub record: T,
    #[serde(flatten)]
    pub change: PriceChange,
    pub price_per_unit: Decimal,
}

/// Annotate observations (most-recent-first) with their trend
pub fn annotate_trends<T: PriceObservation>(observations: Vec<T>) -> Vec<AnnotatedPrice<T>> {
    let changes = classify_trends_indexed(&observations);
    observations
        .into_iter()
        .zip(changes)
        .map(|(record, change)| AnnotatedPrice {
            price_per_unit: record.price_per_unit(),
            record,
            change,
        })
        .collect()
}
