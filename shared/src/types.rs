//! Common types used across the platform

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Market prices are reported per quintal (100 kg)
pub const KG_PER_QUINTAL: i64 = 100;

/// Round half away from zero, the convention used for every reported figure
pub fn round_dp(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Administrative location of a record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Region {
    pub state: String,
    pub district: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taluka: Option<String>,
}

impl Region {
    pub fn new(state: impl Into<String>, district: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            district: district.into(),
            taluka: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_round_dp_midpoint_away_from_zero() {
        assert_eq!(round_dp(Decimal::from_str("2.25").unwrap(), 1), Decimal::from_str("2.3").unwrap());
        assert_eq!(round_dp(Decimal::from_str("-2.25").unwrap(), 1), Decimal::from_str("-2.3").unwrap());
        assert_eq!(round_dp(Decimal::from_str("12.5").unwrap(), 0), Decimal::from(13));
    }
}
