//! Crop cycle integration tests
//!
//! Tests for farmer-owned crop cycles including:
//! - Harvest date derived from the planting date on every read
//! - Owner scoping

mod common;

use common::*;
use farm_stats_backend::services::CropCycleService;
use farm_stats_backend::AppError;
use shared::{CropCycleInput, CropStatus};
use uuid::Uuid;

fn input(planting: chrono::NaiveDate) -> CropCycleInput {
    CropCycleInput {
        crop_name: "Soybean".to_string(),
        status: "planted".to_string(),
        season: Some("kharif".to_string()),
        planting_date: planting,
        notes: Some("  ".to_string()),
    }
}

#[tokio::test]
async fn test_create_and_read_back() {
    let service = CropCycleService::new(repository());
    let owner = Uuid::new_v4();

    let created = service.create(owner, input(date(2024, 6, 15))).await.unwrap();
    assert_eq!(created.status, CropStatus::Planted);
    assert_eq!(created.notes, None);
    assert_eq!(created.expected_harvest_date(), date(2024, 10, 13));

    let read = service.get(owner, created.id).await.unwrap();
    assert_eq!(read, created);
    assert_eq!(read.expected_harvest_date(), date(2024, 10, 13));
}

#[tokio::test]
async fn test_rescheduling_moves_harvest_date() {
    let service = CropCycleService::new(repository());
    let owner = Uuid::new_v4();
    let created = service.create(owner, input(date(2024, 6, 15))).await.unwrap();

    let updated = service
        .update_planting_date(owner, created.id, date(2024, 7, 1))
        .await
        .unwrap();
    assert_eq!(updated.expected_harvest_date(), date(2024, 10, 29));

    let read = service.get(owner, created.id).await.unwrap();
    assert_eq!(read.planting_date, date(2024, 7, 1));
    assert_eq!(read.expected_harvest_date(), date(2024, 10, 29));
}

#[tokio::test]
async fn test_other_owner_sees_not_found() {
    let service = CropCycleService::new(repository());
    let created = service
        .create(Uuid::new_v4(), input(date(2024, 6, 15)))
        .await
        .unwrap();

    let stranger = Uuid::new_v4();
    assert!(matches!(
        service.get(stranger, created.id).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        service
            .update_planting_date(stranger, created.id, date(2024, 7, 1))
            .await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_invalid_status_rejected() {
    let service = CropCycleService::new(repository());
    let mut raw = input(date(2024, 6, 15));
    raw.status = "sown".to_string();

    let err = service.create(Uuid::new_v4(), raw).await.unwrap_err();
    assert!(matches!(err, AppError::Validation { ref field, .. } if field == "status"));
}

#[tokio::test]
async fn test_out_of_range_planting_date_rejected() {
    let service = CropCycleService::new(repository());
    let owner = Uuid::new_v4();
    let created = service.create(owner, input(date(2024, 6, 15))).await.unwrap();

    let err = service
        .update_planting_date(owner, created.id, date(1850, 1, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { ref field, .. } if field == "planting_date"));
}
