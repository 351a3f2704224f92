//! Field weather observation models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::category::{parse_category, WeatherCondition};
use crate::validation::{validate_non_negative, validate_percent, validate_range, ValidationError};

/// A weather reading as reported from the field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherReadingInput {
    pub recorded_at: DateTime<Utc>,
    pub condition: String,
    pub temperature_celsius: Decimal,
    pub humidity_percent: Option<Decimal>,
    pub rainfall_mm: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub recorded_at: DateTime<Utc>,
    pub condition: WeatherCondition,
    pub temperature_celsius: Decimal,
    pub humidity_percent: Option<Decimal>,
    pub rainfall_mm: Option<Decimal>,
}

impl TryFrom<WeatherReadingInput> for WeatherReading {
    type Error = ValidationError;

    fn try_from(input: WeatherReadingInput) -> Result<Self, Self::Error> {
        let condition = parse_category::<WeatherCondition>("condition", input.condition.trim())?;
        validate_range(
            "temperature_celsius",
            input.temperature_celsius,
            Decimal::from(-60),
            Decimal::from(60),
        )?;
        if let Some(humidity) = input.humidity_percent {
            validate_percent("humidity_percent", humidity)?;
        }
        if let Some(rain) = input.rainfall_mm {
            validate_non_negative("rainfall_mm", rain)?;
        }

        Ok(Self {
            recorded_at: input.recorded_at,
            condition,
            temperature_celsius: input.temperature_celsius,
            humidity_percent: input.humidity_percent,
            rainfall_mm: input.rainfall_mm,
        })
    }
}
