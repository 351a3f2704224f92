//! Market price models
//!
//! One row per commodity arrival reported by a market (mandi). Prices are
//! per quintal.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analytics::PriceObservation;
use crate::validation::{
    optional_text, require_text, validate_numeric, validate_positive, ValidationError,
    PRICE_PRECISION,
};

/// A persisted market price observation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarketPrice {
    pub id: Uuid,
    pub commodity: String,
    /// Alternate commodity identifier; records sharing it belong to one series
    pub commodity_code: Option<String>,
    pub variety: Option<String>,
    pub grade: Option<String>,
    pub market: String,
    pub state: String,
    pub district: String,
    pub arrival_date: NaiveDate,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub modal_price: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

impl PriceObservation for MarketPrice {
    fn series_name(&self) -> &str {
        &self.commodity
    }

    fn series_code(&self) -> Option<&str> {
        self.commodity_code.as_deref()
    }

    /// Modal price, falling back to max then min, zero when none is reported
    fn effective_price(&self) -> Decimal {
        self.modal_price
            .or(self.max_price)
            .or(self.min_price)
            .unwrap_or(Decimal::ZERO)
    }
}

/// Raw market price as submitted for ingestion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketPriceInput {
    pub commodity: String,
    pub commodity_code: Option<String>,
    pub variety: Option<String>,
    pub grade: Option<String>,
    pub market: String,
    pub state: String,
    pub district: String,
    pub arrival_date: NaiveDate,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub modal_price: Option<Decimal>,
}

/// A market price that passed validation and is ready to persist
#[derive(Debug, Clone, PartialEq)]
pub struct NewMarketPrice {
    pub commodity: String,
    pub commodity_code: Option<String>,
    pub variety: Option<String>,
    pub grade: Option<String>,
    pub market: String,
    pub state: String,
    pub district: String,
    pub arrival_date: NaiveDate,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub modal_price: Option<Decimal>,
}

impl TryFrom<MarketPriceInput> for NewMarketPrice {
    type Error = ValidationError;

    fn try_from(input: MarketPriceInput) -> Result<Self, Self::Error> {
        let commodity = require_text("commodity", &input.commodity)?;
        let market = require_text("market", &input.market)?;
        let state = require_text("state", &input.state)?;
        let district = require_text("district", &input.district)?;

        for (field, price) in [
            ("min_price", input.min_price),
            ("max_price", input.max_price),
            ("modal_price", input.modal_price),
        ] {
            if let Some(price) = price {
                validate_positive(field, price)?;
                validate_numeric(field, price, PRICE_PRECISION)?;
            }
        }

        Ok(Self {
            commodity,
            commodity_code: optional_text(input.commodity_code),
            variety: optional_text(input.variety),
            grade: optional_text(input.grade),
            market,
            state,
            district,
            arrival_date: input.arrival_date,
            min_price: input.min_price,
            max_price: input.max_price,
            modal_price: input.modal_price,
        })
    }
}

impl NewMarketPrice {
    /// Attach identity, as the store does on insert
    pub fn into_record(self, id: Uuid, created_at: DateTime<Utc>) -> MarketPrice {
        MarketPrice {
            id,
            commodity: self.commodity,
            commodity_code: self.commodity_code,
            variety: self.variety,
            grade: self.grade,
            market: self.market,
            state: self.state,
            district: self.district,
            arrival_date: self.arrival_date,
            min_price: self.min_price,
            max_price: self.max_price,
            modal_price: self.modal_price,
            created_at,
        }
    }
}
