//! Soil sample models and the soil health score
//!
//! Samples are transient: they are scored and discarded, never persisted.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::validation::{validate_non_negative, validate_range, ValidationError};

/// Lowest possible soil health score
pub const MIN_SOIL_SCORE: u8 = 25;
/// Highest possible soil health score
pub const MAX_SOIL_SCORE: u8 = 80;

/// Raw soil test readings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoilSampleInput {
    pub ph: Decimal,
    /// Available nitrogen, kg/ha
    pub nitrogen: Decimal,
    /// Available phosphorus, kg/ha
    pub phosphorus: Decimal,
    /// Available potassium, kg/ha
    pub potassium: Decimal,
    pub organic_matter_percent: Option<Decimal>,
}

/// Validated soil test readings
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SoilSample {
    pub ph: Decimal,
    pub nitrogen: Decimal,
    pub phosphorus: Decimal,
    pub potassium: Decimal,
    pub organic_matter_percent: Option<Decimal>,
}

impl TryFrom<SoilSampleInput> for SoilSample {
    type Error = ValidationError;

    fn try_from(input: SoilSampleInput) -> Result<Self, Self::Error> {
        validate_range("ph", input.ph, Decimal::ZERO, Decimal::from(14))?;
        validate_non_negative("nitrogen", input.nitrogen)?;
        validate_non_negative("phosphorus", input.phosphorus)?;
        validate_non_negative("potassium", input.potassium)?;
        if let Some(om) = input.organic_matter_percent {
            validate_range("organic_matter_percent", om, Decimal::ZERO, Decimal::ONE_HUNDRED)?;
        }

        Ok(Self {
            ph: input.ph,
            nitrogen: input.nitrogen,
            phosphorus: input.phosphorus,
            potassium: input.potassium,
            organic_matter_percent: input.organic_matter_percent,
        })
    }
}

/// Qualitative band for a soil health score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SoilHealthBand {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl SoilHealthBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            70..=u8::MAX => SoilHealthBand::Excellent,
            55..=69 => SoilHealthBand::Good,
            40..=54 => SoilHealthBand::Fair,
            _ => SoilHealthBand::Poor,
        }
    }
}

impl std::fmt::Display for SoilHealthBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SoilHealthBand::Excellent => write!(f, "Excellent"),
            SoilHealthBand::Good => write!(f, "Good"),
            SoilHealthBand::Fair => write!(f, "Fair"),
            SoilHealthBand::Poor => write!(f, "Poor"),
        }
    }
}

/// Component breakdown of a soil health score
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct SoilHealthReport {
    pub score: u8,
    pub ph_score: u8,
    pub nitrogen_score: u8,
    pub phosphorus_score: u8,
    pub potassium_score: u8,
    /// Weakest of the three nutrient scores
    pub nutrient_score: u8,
    pub organic_matter_score: u8,
    pub band: SoilHealthBand,
}

fn within(value: Decimal, low: Decimal, high: Decimal) -> bool {
    value >= low && value <= high
}

fn ph_score(ph: Decimal) -> u8 {
    if within(ph, Decimal::new(60, 1), Decimal::new(75, 1)) {
        40
    } else {
        10
    }
}

fn nitrogen_score(n: Decimal) -> u8 {
    if within(n, Decimal::from(200), Decimal::from(400)) {
        20
    } else {
        10
    }
}

fn phosphorus_score(p: Decimal) -> u8 {
    if within(p, Decimal::from(20), Decimal::from(60)) {
        20
    } else {
        10
    }
}

fn potassium_score(k: Decimal) -> u8 {
    if within(k, Decimal::from(150), Decimal::from(300)) {
        20
    } else {
        10
    }
}

fn organic_matter_score(om: Option<Decimal>) -> u8 {
    match om {
        Some(om) if om >= Decimal::TWO => 20,
        Some(om) if om >= Decimal::ONE => 15,
        _ => 5,
    }
}

/// Break a sample down into its component scores.
///
/// Nutrients combine by minimum, so one deficient nutrient caps the whole
/// nutrient contribution.
pub fn soil_health_report(
    ph: Decimal,
    nitrogen: Decimal,
    phosphorus: Decimal,
    potassium: Decimal,
    organic_matter_percent: Option<Decimal>,
) -> SoilHealthReport {
    let ph_score = ph_score(ph);
    let nitrogen_score = nitrogen_score(nitrogen);
    let phosphorus_score = phosphorus_score(phosphorus);
    let potassium_score = potassium_score(potassium);
    let nutrient_score = nitrogen_score.min(phosphorus_score).min(potassium_score);
    let organic_matter_score = organic_matter_score(organic_matter_percent);
    let score = ph_score + nutrient_score + organic_matter_score;

    SoilHealthReport {
        score,
        ph_score,
        nitrogen_score,
        phosphorus_score,
        potassium_score,
        nutrient_score,
        organic_matter_score,
        band: SoilHealthBand::from_score(score),
    }
}

/// Composite soil health score in [25, 80]
pub fn soil_health_score(
    ph: Decimal,
    nitrogen: Decimal,
    phosphorus: Decimal,
    potassium: Decimal,
    organic_matter_percent: Option<Decimal>,
) -> u8 {
    soil_health_report(ph, nitrogen, phosphorus, potassium, organic_matter_percent).score
}

impl SoilSample {
    pub fn score(&self) -> u8 {
        self.report().score
    }

    pub fn report(&self) -> SoilHealthReport {
        soil_health_report(
            self.ph,
            self.nitrogen,
            self.phosphorus,
            self.potassium,
            self.organic_matter_percent,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_all_components_maximal() {
        let score = soil_health_score(dec("6.5"), dec("300"), dec("40"), dec("200"), Some(dec("2.5")));
        assert_eq!(score, 80);
    }

    #[test]
    fn test_all_components_minimal() {
        let score = soil_health_score(dec("4.0"), dec("50"), dec("5"), dec("50"), Some(dec("0.3")));
        assert_eq!(score, 10 + 10 + 5);
        assert_eq!(score, MIN_SOIL_SCORE);
    }

    #[test]
    fn test_weakest_nutrient_dominates() {
        // Nitrogen and phosphorus ideal, potassium deficient
        let report = soil_health_report(dec("7.0"), dec("250"), dec("30"), dec("80"), Some(dec("1.5")));
        assert_eq!(report.nitrogen_score, 20);
        assert_eq!(report.phosphorus_score, 20);
        assert_eq!(report.potassium_score, 10);
        assert_eq!(report.nutrient_score, 10);
        assert_eq!(report.score, 40 + 10 + 15);
    }

    #[test]
    fn test_ph_boundaries_inclusive() {
        assert_eq!(ph_score(dec("6.0")), 40);
        assert_eq!(ph_score(dec("7.5")), 40);
        assert_eq!(ph_score(dec("5.99")), 10);
        assert_eq!(ph_score(dec("7.51")), 10);
    }

    #[test]
    fn test_organic_matter_tiers() {
        assert_eq!(organic_matter_score(Some(dec("2.0"))), 20);
        assert_eq!(organic_matter_score(Some(dec("1.99"))), 15);
        assert_eq!(organic_matter_score(Some(dec("1.0"))), 15);
        assert_eq!(organic_matter_score(Some(dec("0.99"))), 5);
        assert_eq!(organic_matter_score(None), 5);
    }

    #[test]
    fn test_bands() {
        assert_eq!(SoilHealthBand::from_score(80), SoilHealthBand::Excellent);
        assert_eq!(SoilHealthBand::from_score(70), SoilHealthBand::Excellent);
        assert_eq!(SoilHealthBand::from_score(65), SoilHealthBand::Good);
        assert_eq!(SoilHealthBand::from_score(45), SoilHealthBand::Fair);
        assert_eq!(SoilHealthBand::from_score(25), SoilHealthBand::Poor);
    }

    #[test]
    fn test_sample_validation() {
        let ok = SoilSampleInput {
            ph: dec("6.8"),
            nitrogen: dec("280"),
            phosphorus: dec("25"),
            potassium: dec("190"),
            organic_matter_percent: None,
        };
        let sample = SoilSample::try_from(ok.clone()).unwrap();
        assert_eq!(sample.score(), 40 + 20 + 5);

        let mut bad = ok.clone();
        bad.ph = dec("14.5");
        assert_eq!(SoilSample::try_from(bad).unwrap_err().field, "ph");

        let mut bad = ok;
        bad.potassium = dec("-1");
        assert_eq!(SoilSample::try_from(bad).unwrap_err().field, "potassium");
    }

    fn reading(max: i64) -> impl Strategy<Value = Decimal> {
        (0..=max * 100).prop_map(|n| Decimal::new(n, 2))
    }

    proptest! {
        #[test]
        fn prop_score_bounded(
            ph in reading(14),
            n in reading(1000),
            p in reading(200),
            k in reading(1000),
            om in proptest::option::of(reading(10)),
        ) {
            let score = soil_health_score(ph, n, p, k, om);
            prop_assert!((MIN_SOIL_SCORE..=MAX_SOIL_SCORE).contains(&score));
        }

        #[test]
        fn prop_score_deterministic(
            ph in reading(14),
            n in reading(1000),
            p in reading(200),
            k in reading(1000),
            om in proptest::option::of(reading(10)),
        ) {
            prop_assert_eq!(
                soil_health_report(ph, n, p, k, om),
                soil_health_report(ph, n, p, k, om)
            );
        }
    }
}
