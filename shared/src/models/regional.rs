//! District and crop statistics

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::{parse_optional_category, Season};
use crate::validation::{
    optional_text, require_text, validate_non_negative, validate_numeric, validate_percent,
    validate_year, ValidationError, ValidationResult, AREA_PRECISION, PERCENT_PRECISION,
    PRODUCTION_PRECISION, RAINFALL_PRECISION, YIELD_PRECISION,
};

/// A persisted regional statistic. Every measure is independent and optional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegionalStatistic {
    pub id: Uuid,
    pub state: String,
    pub district: String,
    pub taluka: Option<String>,
    pub crop: Option<String>,
    pub season: Option<Season>,
    pub year: Option<i32>,
    pub area_hectares: Option<Decimal>,
    pub production_tonnes: Option<Decimal>,
    pub yield_kg_per_hectare: Option<Decimal>,
    pub rainfall_mm: Option<Decimal>,
    /// Share of cultivated area under irrigation, 0-100
    pub irrigation_percent: Option<Decimal>,
    pub horticulture_area_hectares: Option<Decimal>,
    pub medicinal_plant_area_hectares: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

/// Raw regional statistic as submitted for ingestion
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegionalStatisticInput {
    pub state: String,
    pub district: String,
    pub taluka: Option<String>,
    pub crop: Option<String>,
    pub season: Option<String>,
    pub year: Option<i32>,
    pub area_hectares: Option<Decimal>,
    pub production_tonnes: Option<Decimal>,
    pub yield_kg_per_hectare: Option<Decimal>,
    pub rainfall_mm: Option<Decimal>,
    pub irrigation_percent: Option<Decimal>,
    pub horticulture_area_hectares: Option<Decimal>,
    pub medicinal_plant_area_hectares: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewRegionalStatistic {
    pub state: String,
    pub district: String,
    pub taluka: Option<String>,
    pub crop: Option<String>,
    pub season: Option<Season>,
    pub year: Option<i32>,
    pub area_hectares: Option<Decimal>,
    pub production_tonnes: Option<Decimal>,
    pub yield_kg_per_hectare: Option<Decimal>,
    pub rainfall_mm: Option<Decimal>,
    pub irrigation_percent: Option<Decimal>,
    pub horticulture_area_hectares: Option<Decimal>,
    pub medicinal_plant_area_hectares: Option<Decimal>,
}

fn measure(
    field: &str,
    value: Option<Decimal>,
    precision: u32,
) -> ValidationResult<Option<Decimal>> {
    if let Some(v) = value {
        validate_non_negative(field, v)?;
        validate_numeric(field, v, precision)?;
    }
    Ok(value)
}

impl TryFrom<RegionalStatisticInput> for NewRegionalStatistic {
    type Error = ValidationError;

    fn try_from(input: RegionalStatisticInput) -> Result<Self, Self::Error> {
        let state = require_text("state", &input.state)?;
        let district = require_text("district", &input.district)?;
        let season = parse_optional_category::<Season>("season", input.season.as_deref())?;

        if let Some(year) = input.year {
            validate_year("year", year)?;
        }
        if let Some(irrigation) = input.irrigation_percent {
            validate_percent("irrigation_percent", irrigation)?;
            validate_numeric("irrigation_percent", irrigation, PERCENT_PRECISION)?;
        }

        Ok(Self {
            state,
            district,
            taluka: optional_text(input.taluka),
            crop: optional_text(input.crop),
            season,
            year: input.year,
            area_hectares: measure("area_hectares", input.area_hectares, AREA_PRECISION)?,
            production_tonnes: measure(
                "production_tonnes",
                input.production_tonnes,
                PRODUCTION_PRECISION,
            )?,
            yield_kg_per_hectare: measure(
                "yield_kg_per_hectare",
                input.yield_kg_per_hectare,
                YIELD_PRECISION,
            )?,
            rainfall_mm: measure("rainfall_mm", input.rainfall_mm, RAINFALL_PRECISION)?,
            irrigation_percent: input.irrigation_percent,
            horticulture_area_hectares: measure(
                "horticulture_area_hectares",
                input.horticulture_area_hectares,
                AREA_PRECISION,
            )?,
            medicinal_plant_area_hectares: measure(
                "medicinal_plant_area_hectares",
                input.medicinal_plant_area_hectares,
                AREA_PRECISION,
            )?,
        })
    }
}

impl NewRegionalStatistic {
    pub fn into_record(self, id: Uuid, created_at: DateTime<Utc>) -> RegionalStatistic {
        RegionalStatistic {
            id,
            state: self.state,
            district: self.district,
            taluka: self.taluka,
            crop: self.crop,
            season: self.season,
            year: self.year,
            area_hectares: self.area_hectares,
            production_tonnes: self.production_tonnes,
            yield_kg_per_hectare: self.yield_kg_per_hectare,
            rainfall_mm: self.rainfall_mm,
            irrigation_percent: self.irrigation_percent,
            horticulture_area_hectares: self.horticulture_area_hectares,
            medicinal_plant_area_hectares: self.medicinal_plant_area_hectares,
            created_at,
        }
    }
}
