//! Crop cycle models
//!
//! The expected harvest date is derived from the planting date on every
//! read. It is never stored on the model, so it cannot drift.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::{parse_category, parse_optional_category, CropStatus, Season};
use crate::validation::{optional_text, require_text, validate_year, ValidationError};

/// Days from planting to expected harvest
pub const DAYS_TO_HARVEST: i64 = 120;

/// Expected harvest date for a planting date
pub fn expected_harvest_date(planting_date: NaiveDate) -> NaiveDate {
    planting_date + Duration::days(DAYS_TO_HARVEST)
}

/// A crop cycle owned by a farmer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "CropCycleView")]
pub struct CropCycle {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub crop_name: String,
    pub status: CropStatus,
    pub season: Option<Season>,
    pub planting_date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CropCycle {
    pub fn expected_harvest_date(&self) -> NaiveDate {
        expected_harvest_date(self.planting_date)
    }

    /// Move the planting date; the harvest date follows automatically
    pub fn reschedule(&mut self, planting_date: NaiveDate, at: DateTime<Utc>) {
        self.planting_date = planting_date;
        self.updated_at = at;
    }
}

/// Serialized shape of a crop cycle, carrying the derived harvest date
#[derive(Debug, Clone, Serialize)]
pub struct CropCycleView {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub crop_name: String,
    pub status: CropStatus,
    pub season: Option<Season>,
    pub planting_date: NaiveDate,
    pub expected_harvest_date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CropCycle> for CropCycleView {
    fn from(cycle: CropCycle) -> Self {
        Self {
            expected_harvest_date: cycle.expected_harvest_date(),
            id: cycle.id,
            owner_id: cycle.owner_id,
            crop_name: cycle.crop_name,
            status: cycle.status,
            season: cycle.season,
            planting_date: cycle.planting_date,
            notes: cycle.notes,
            created_at: cycle.created_at,
            updated_at: cycle.updated_at,
        }
    }
}

/// Raw crop cycle as submitted by a farmer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropCycleInput {
    pub crop_name: String,
    pub status: String,
    pub season: Option<String>,
    pub planting_date: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCropCycle {
    pub crop_name: String,
    pub status: CropStatus,
    pub season: Option<Season>,
    pub planting_date: NaiveDate,
    pub notes: Option<String>,
}

/// Reject planting dates outside the recorded-year window
pub fn validate_planting_date(planting_date: NaiveDate) -> Result<(), ValidationError> {
    validate_year("planting_date", planting_date.year())
}

impl TryFrom<CropCycleInput> for NewCropCycle {
    type Error = ValidationError;

    fn try_from(input: CropCycleInput) -> Result<Self, Self::Error> {
        let crop_name = require_text("crop_name", &input.crop_name)?;
        let status = parse_category::<CropStatus>("status", input.status.trim())?;
        let season = parse_optional_category::<Season>("season", input.season.as_deref())?;
        validate_planting_date(input.planting_date)?;

        Ok(Self {
            crop_name,
            status,
            season,
            planting_date: input.planting_date,
            notes: optional_text(input.notes),
        })
    }
}

impl NewCropCycle {
    pub fn into_record(self, id: Uuid, owner_id: Uuid, created_at: DateTime<Utc>) -> CropCycle {
        CropCycle {
            id,
            owner_id,
            crop_name: self.crop_name,
            status: self.status,
            season: self.season,
            planting_date: self.planting_date,
            notes: self.notes,
            created_at,
            updated_at: created_at,
        }
    }
}
