//! Farmer profile and field models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::category::{parse_category, IrrigationMethod, SoilType};
use crate::validation::{
    email_format, land_size_hectares, optional_text, phone_format, ValidationError,
    ValidationResult,
};

/// Farmer contact profile as submitted
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FarmerProfileInput {
    #[validate(length(min = 1, max = 120, message = "must be 1-120 characters"))]
    pub full_name: String,
    #[validate(
        length(min = 10, max = 20, message = "must be 10-20 characters"),
        custom = "phone_format"
    )]
    pub phone: String,
    #[validate(custom = "email_format")]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub state: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub district: String,
    pub taluka: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FarmerProfile {
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub state: String,
    pub district: String,
    pub taluka: Option<String>,
}

impl TryFrom<FarmerProfileInput> for FarmerProfile {
    type Error = ValidationError;

    fn try_from(input: FarmerProfileInput) -> Result<Self, Self::Error> {
        input.validate()?;
        Ok(Self {
            full_name: input.full_name.trim().to_string(),
            phone: input.phone,
            email: input.email,
            state: input.state.trim().to_string(),
            district: input.district.trim().to_string(),
            taluka: optional_text(input.taluka),
        })
    }
}

/// A farmer's field as submitted
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FarmFieldInput {
    #[validate(length(min = 1, max = 120, message = "must be 1-120 characters"))]
    pub name: String,
    #[validate(custom = "land_size_hectares")]
    pub area_hectares: Decimal,
    pub soil_type: String,
    pub irrigation_method: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FarmField {
    pub name: String,
    pub area_hectares: Decimal,
    pub soil_type: SoilType,
    pub irrigation_method: IrrigationMethod,
}

impl TryFrom<FarmFieldInput> for FarmField {
    type Error = ValidationError;

    fn try_from(input: FarmFieldInput) -> ValidationResult<Self> {
        input.validate()?;
        Ok(Self {
            name: input.name.trim().to_string(),
            area_hectares: input.area_hectares,
            soil_type: parse_category("soil_type", &input.soil_type)?,
            irrigation_method: parse_category("irrigation_method", &input.irrigation_method)?,
        })
    }
}
