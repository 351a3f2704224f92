//! Farmer-owned crop cycles
//!
//! Every operation is scoped to the authenticated owner. A cycle owned by
//! someone else is indistinguishable from a missing one.

use std::sync::Arc;

use chrono::NaiveDate;
use shared::{validate_planting_date, CropCycle, CropCycleInput, NewCropCycle};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::repository::Repository;

/// Crop cycle service
#[derive(Clone)]
pub struct CropCycleService {
    repository: Arc<dyn Repository>,
}

impl CropCycleService {
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self { repository }
    }

    pub async fn create(&self, owner_id: Uuid, input: CropCycleInput) -> AppResult<CropCycle> {
        let cycle = NewCropCycle::try_from(input)?;
        let created = self.repository.insert_crop_cycle(owner_id, cycle).await?;

        tracing::info!(
            crop_cycle_id = %created.id,
            expected_harvest = %created.expected_harvest_date(),
            "Crop cycle created"
        );
        Ok(created)
    }

    pub async fn get(&self, owner_id: Uuid, id: Uuid) -> AppResult<CropCycle> {
        self.repository
            .crop_cycle(owner_id, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Crop cycle".to_string()))
    }

    /// Move the planting date; the harvest date is re-derived on read
    pub async fn update_planting_date(
        &self,
        owner_id: Uuid,
        id: Uuid,
        planting_date: NaiveDate,
    ) -> AppResult<CropCycle> {
        validate_planting_date(planting_date)?;
        self.repository
            .update_planting_date(owner_id, id, planting_date)
            .await?
            .ok_or_else(|| AppError::NotFound("Crop cycle".to_string()))
    }
}
