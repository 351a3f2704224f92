//! Validation utilities for the Farm Statistics Platform
//!
//! Every check names the offending field and the violated constraint.
//! Nothing here clamps or coerces: a value is either accepted as-is or
//! rejected.

use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

/// A field that failed a domain constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{field}: {constraint}")]
pub struct ValidationError {
    pub field: String,
    pub constraint: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            constraint: constraint.into(),
        }
    }
}

/// A batch rejected as a whole because one record is invalid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("record {index} rejected: {error}")]
pub struct BatchValidationError {
    pub index: usize,
    pub error: ValidationError,
}

pub type ValidationResult<T> = Result<T, ValidationError>;

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        // HashMap order is unstable; report the alphabetically first field
        fields.sort_by_key(|(field, _)| *field);

        match fields.first() {
            Some((field, errs)) => {
                let constraint = errs
                    .first()
                    .map(|e| match &e.message {
                        Some(message) => message.to_string(),
                        None => e.code.to_string(),
                    })
                    .unwrap_or_else(|| "invalid".to_string());
                ValidationError::new(*field, constraint)
            }
            None => ValidationError::new("input", "invalid"),
        }
    }
}

/// Convert every input of a batch, failing on the first invalid record.
///
/// Either all records convert or none are returned.
pub fn validate_batch<I, T>(inputs: Vec<I>) -> Result<Vec<T>, BatchValidationError>
where
    T: TryFrom<I, Error = ValidationError>,
{
    inputs
        .into_iter()
        .enumerate()
        .map(|(index, input)| T::try_from(input).map_err(|error| BatchValidationError { index, error }))
        .collect()
}

// ============================================================================
// Scalar Domains
// ============================================================================

/// Require a non-blank string, returning it trimmed
pub fn require_text(field: &str, value: &str) -> ValidationResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional string, treating blank as absent
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Strictly positive decimal (> 0)
pub fn validate_positive(field: &str, value: Decimal) -> ValidationResult<()> {
    if value <= Decimal::ZERO {
        return Err(ValidationError::new(field, "must be greater than 0"));
    }
    Ok(())
}

pub fn validate_non_negative(field: &str, value: Decimal) -> ValidationResult<()> {
    if value < Decimal::ZERO {
        return Err(ValidationError::new(field, "must not be negative"));
    }
    Ok(())
}

/// Digits kept after the decimal point by every stored measure and price
pub const STORED_SCALE: u32 = 2;

/// Precision of the stored `NUMERIC(p, 2)` columns
pub const PRICE_PRECISION: u32 = 12;
pub const AREA_PRECISION: u32 = 14;
pub const PRODUCTION_PRECISION: u32 = 14;
pub const YIELD_PRECISION: u32 = 12;
pub const RAINFALL_PRECISION: u32 = 10;
pub const PERCENT_PRECISION: u32 = 5;

/// Largest magnitude a `NUMERIC(precision, 2)` column holds,
/// e.g. 9999999999.99 for precision 12
pub fn numeric_limit(precision: u32) -> Decimal {
    let integer_digits = precision.saturating_sub(STORED_SCALE);
    let mut limit = Decimal::ONE;
    for _ in 0..integer_digits {
        limit *= Decimal::TEN;
    }
    limit - Decimal::new(1, STORED_SCALE)
}

/// Value fits a `NUMERIC(precision, 2)` column without rounding
pub fn validate_numeric(field: &str, value: Decimal, precision: u32) -> ValidationResult<()> {
    if value.normalize().scale() > STORED_SCALE {
        return Err(ValidationError::new(
            field,
            format!("must have at most {} decimal places", STORED_SCALE),
        ));
    }
    let limit = numeric_limit(precision);
    if value.abs() > limit {
        return Err(ValidationError::new(
            field,
            format!("must not exceed {}", limit),
        ));
    }
    Ok(())
}

/// Inclusive range check
pub fn validate_range(field: &str, value: Decimal, min: Decimal, max: Decimal) -> ValidationResult<()> {
    if value < min || value > max {
        return Err(ValidationError::new(
            field,
            format!("must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

/// Percentage in [0, 100]
pub fn validate_percent(field: &str, value: Decimal) -> ValidationResult<()> {
    validate_range(field, value, Decimal::ZERO, Decimal::ONE_HUNDRED)
}

pub const MIN_RECORDED_YEAR: i32 = 1900;
pub const MAX_RECORDED_YEAR: i32 = 2100;

/// Four-digit recorded year
pub fn validate_year(field: &str, year: i32) -> ValidationResult<()> {
    if !(MIN_RECORDED_YEAR..=MAX_RECORDED_YEAR).contains(&year) {
        return Err(ValidationError::new(
            field,
            format!("must be between {} and {}", MIN_RECORDED_YEAR, MAX_RECORDED_YEAR),
        ));
    }
    Ok(())
}

fn phone_regex() -> &'static Regex {
    static PHONE_RE: OnceLock<Regex> = OnceLock::new();
    PHONE_RE.get_or_init(|| {
        Regex::new(r"^\+?[0-9][0-9 ()\-]{7,17}[0-9]$").expect("phone regex compiles")
    })
}

fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
            .expect("email regex compiles")
    })
}

/// International phone number, 10-20 characters
/// Accepts: +919876543210, 098765 43210, +1 (555) 123-4567
pub fn is_valid_phone(phone: &str) -> bool {
    let len = phone.chars().count();
    (10..=20).contains(&len) && phone_regex().is_match(phone)
}

/// local@domain.tld
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

pub const MIN_LAND_SIZE_HECTARES: Decimal = Decimal::from_parts(1, 0, 0, false, 2);
pub const MAX_LAND_SIZE_HECTARES: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// Land size in hectares: 0.01-10000 with at most two decimal places
pub fn is_valid_land_size(hectares: Decimal) -> bool {
    hectares >= MIN_LAND_SIZE_HECTARES
        && hectares <= MAX_LAND_SIZE_HECTARES
        && hectares.normalize().scale() <= 2
}

// ----------------------------------------------------------------------------
// Custom validators for `#[derive(Validate)]` inputs
// ----------------------------------------------------------------------------

pub fn phone_format(phone: &str) -> Result<(), validator::ValidationError> {
    if is_valid_phone(phone) {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("phone");
        err.message = Some("must be an international phone number of 10-20 characters".into());
        Err(err)
    }
}

pub fn email_format(email: &str) -> Result<(), validator::ValidationError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("email");
        err.message = Some("must be a valid email address".into());
        Err(err)
    }
}

pub fn land_size_hectares(hectares: &Decimal) -> Result<(), validator::ValidationError> {
    if is_valid_land_size(*hectares) {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("land_size");
        err.message = Some("must be 0.01-10000 hectares with at most two decimal places".into());
        Err(err)
    }
}
