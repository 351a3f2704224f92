//! WebAssembly module for the Farm Statistics Platform
//!
//! Provides client-side computation for:
//! - Soil health scoring
//! - Market trend previews
//! - Expected harvest dates
//! - Offline input validation

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use shared::{
    annotate_trends, expected_harvest_date, summarize_market, validate_non_negative,
    validate_numeric, AnnotatedPrice, FarmField, FarmFieldInput, FarmerProfile,
    FarmerProfileInput, MarketPriceInput, MarketSummary, NewMarketPrice, NewRegionalStatistic,
    PriceObservation, RegionalStatisticInput, SoilHealthReport, SoilSample, SoilSampleInput,
    ValidationError, WeatherReading, WeatherReadingInput, PRICE_PRECISION,
};

fn decimal(field: &str, value: f64) -> Result<Decimal, String> {
    Decimal::try_from(value).map_err(|_| format!("{}: not a finite number", field))
}

fn soil_report(
    ph: f64,
    nitrogen: f64,
    phosphorus: f64,
    potassium: f64,
    organic_matter_percent: Option<f64>,
) -> Result<SoilHealthReport, String> {
    let input = SoilSampleInput {
        ph: decimal("ph", ph)?,
        nitrogen: decimal("nitrogen", nitrogen)?,
        phosphorus: decimal("phosphorus", phosphorus)?,
        potassium: decimal("potassium", potassium)?,
        organic_matter_percent: organic_matter_percent
            .map(|om| decimal("organic_matter_percent", om))
            .transpose()?,
    };
    let sample = SoilSample::try_from(input).map_err(|e| e.to_string())?;
    Ok(sample.report())
}

/// Soil health score in [25, 80]
#[wasm_bindgen]
pub fn soil_health_score(
    ph: f64,
    nitrogen: f64,
    phosphorus: f64,
    potassium: f64,
    organic_matter_percent: Option<f64>,
) -> Result<u8, JsValue> {
    soil_report(ph, nitrogen, phosphorus, potassium, organic_matter_percent)
        .map(|r| r.score)
        .map_err(|e| JsValue::from_str(&e))
}

/// Soil health report (component scores and band) as JSON
#[wasm_bindgen]
pub fn soil_health_report(
    ph: f64,
    nitrogen: f64,
    phosphorus: f64,
    potassium: f64,
    organic_matter_percent: Option<f64>,
) -> Result<String, JsValue> {
    soil_report(ph, nitrogen, phosphorus, potassium, organic_matter_percent)
        .and_then(|r| serde_json::to_string(&r).map_err(|e| e.to_string()))
        .map_err(|e| JsValue::from_str(&e))
}

/// A price point entered in the browser
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PricePoint {
    commodity: String,
    #[serde(default)]
    commodity_code: Option<String>,
    price: Decimal,
}

impl PriceObservation for PricePoint {
    fn series_name(&self) -> &str {
        &self.commodity
    }

    fn series_code(&self) -> Option<&str> {
        self.commodity_code.as_deref()
    }

    fn effective_price(&self) -> Decimal {
        self.price
    }
}

#[derive(Debug, Serialize)]
struct TrendPreview {
    records: Vec<AnnotatedPrice<PricePoint>>,
    summary: MarketSummary,
}

impl PricePoint {
    /// Same bounds as a stored price; zero stands for "not reported"
    fn check(&self) -> Result<(), ValidationError> {
        validate_non_negative("price", self.price)?;
        validate_numeric("price", self.price, PRICE_PRECISION)
    }
}

fn trend_preview(prices_json: &str) -> Result<TrendPreview, String> {
    let points: Vec<PricePoint> =
        serde_json::from_str(prices_json).map_err(|e| format!("Invalid prices JSON: {}", e))?;
    for (index, point) in points.iter().enumerate() {
        point.check().map_err(|e| format!("[{}].{}", index, e))?;
    }
    let records = annotate_trends(points);
    let summary = summarize_market(&records);
    Ok(TrendPreview { records, summary })
}

/// Annotate price points (most recent first) with their trend
///
/// Input: `[{"commodity": "Onion", "commodity_code": null, "price": "2200"}, ...]`
#[wasm_bindgen]
pub fn preview_market_trends(prices_json: &str) -> Result<String, JsValue> {
    trend_preview(prices_json)
        .and_then(|p| serde_json::to_string(&p).map_err(|e| e.to_string()))
        .map_err(|e| JsValue::from_str(&e))
}

fn harvest_date(planting_date: &str) -> Result<String, String> {
    let date = NaiveDate::parse_from_str(planting_date, "%Y-%m-%d")
        .map_err(|e| format!("Invalid planting date: {}", e))?;
    Ok(expected_harvest_date(date).format("%Y-%m-%d").to_string())
}

/// Expected harvest date (YYYY-MM-DD) for a planting date
#[wasm_bindgen]
pub fn calculate_harvest_date(planting_date: &str) -> Result<String, JsValue> {
    harvest_date(planting_date).map_err(|e| JsValue::from_str(&e))
}

/// Result of an offline validation
#[derive(Debug, Serialize, PartialEq)]
struct ValidationOutcome {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    constraint: Option<String>,
}

impl From<Result<(), ValidationError>> for ValidationOutcome {
    fn from(result: Result<(), ValidationError>) -> Self {
        match result {
            Ok(()) => Self {
                valid: true,
                field: None,
                constraint: None,
            },
            Err(e) => Self {
                valid: false,
                field: Some(e.field),
                constraint: Some(e.constraint),
            },
        }
    }
}

fn check<I, T>(json: &str) -> ValidationOutcome
where
    I: DeserializeOwned,
    T: TryFrom<I, Error = ValidationError>,
{
    let result = serde_json::from_str::<I>(json)
        .map_err(|e| ValidationError::new("input", e.to_string()))
        .and_then(|input| T::try_from(input).map(|_| ()));
    ValidationOutcome::from(result)
}

fn outcome_json(outcome: ValidationOutcome) -> String {
    serde_json::to_string(&outcome)
        .unwrap_or_else(|_| r#"{"valid":false,"field":"input"}"#.to_string())
}

/// Validate a farmer profile
#[wasm_bindgen]
pub fn validate_farmer_profile(json: &str) -> String {
    outcome_json(check::<FarmerProfileInput, FarmerProfile>(json))
}

/// Validate a farm field
#[wasm_bindgen]
pub fn validate_farm_field(json: &str) -> String {
    outcome_json(check::<FarmFieldInput, FarmField>(json))
}

/// Validate a weather reading
#[wasm_bindgen]
pub fn validate_weather_reading(json: &str) -> String {
    outcome_json(check::<WeatherReadingInput, WeatherReading>(json))
}

/// Validate a market price before upload
#[wasm_bindgen]
pub fn validate_market_price(json: &str) -> String {
    outcome_json(check::<MarketPriceInput, NewMarketPrice>(json))
}

/// Validate a regional statistic before upload
#[wasm_bindgen]
pub fn validate_regional_statistic(json: &str) -> String {
    outcome_json(check::<RegionalStatisticInput, NewRegionalStatistic>(json))
}

#[wasm_bindgen]
pub fn is_valid_phone(phone: &str) -> bool {
    shared::is_valid_phone(phone)
}

#[wasm_bindgen]
pub fn is_valid_email(email: &str) -> bool {
    shared::is_valid_email(email)
}

/// Land size in hectares: 0.01 to 10000 with at most two decimals
#[wasm_bindgen]
pub fn is_valid_land_size(hectares: f64) -> bool {
    decimal("area_hectares", hectares)
        .map(shared::is_valid_land_size)
        .unwrap_or(false)
}
