//! Ingestion integration tests
//!
//! Batches are all-or-nothing: one invalid record writes nothing.

mod common;

use common::*;
use farm_stats_backend::query::{MarketPriceQuery, RegionalStatsQuery};
use farm_stats_backend::services::{IngestionService, MarketService, StatisticsService};
use farm_stats_backend::AppError;
use rust_decimal::Decimal;

#[tokio::test]
async fn test_valid_batch_is_written() {
    let repo = repository();
    let receipt = IngestionService::new(repo.clone())
        .ingest_regional_statistics(vec![
            regional_input("Pune", Some(2023)),
            regional_input("Satara", Some(2023)),
        ])
        .await
        .unwrap();

    assert_eq!(receipt.inserted, 2);
    assert_eq!(receipt.ids.len(), 2);
}

#[tokio::test]
async fn test_one_bad_record_writes_nothing() {
    let repo = repository();
    let mut bad = regional_input("Satara", Some(2023));
    bad.irrigation_percent = Some(Decimal::from(150));

    let err = IngestionService::new(repo.clone())
        .ingest_regional_statistics(vec![regional_input("Pune", Some(2023)), bad])
        .await
        .unwrap_err();

    match err {
        AppError::BatchValidation { index, field, .. } => {
            assert_eq!(index, 1);
            assert_eq!(field, "irrigation_percent");
        }
        other => panic!("unexpected error: {:?}", other),
    }

    let stored = StatisticsService::new(repo, test_config().analytics)
        .regional_statistics(&RegionalStatsQuery::default())
        .await
        .unwrap();
    assert_eq!(stored.count, 0);
}

#[tokio::test]
async fn test_non_positive_price_rejects_batch() {
    let repo = repository();
    let mut bad = market_input("Onion", date(2024, 3, 2), 0);
    bad.modal_price = Some(Decimal::ZERO);

    let err = IngestionService::new(repo.clone())
        .ingest_market_prices(vec![market_input("Onion", date(2024, 3, 1), 2000), bad])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BatchValidation { index: 1, .. }));

    let stored = MarketService::new(repo, test_config().analytics)
        .market_prices(MarketPriceQuery::default())
        .await
        .unwrap();
    assert!(stored.records.is_empty());
}

#[tokio::test]
async fn test_empty_batch_rejected() {
    let err = IngestionService::new(repository())
        .ingest_market_prices(vec![])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { ref field, .. } if field == "records"));
}

#[tokio::test]
async fn test_unknown_season_rejected() {
    let mut bad = regional_input("Pune", Some(2023));
    bad.season = Some("spring".to_string());

    let err = IngestionService::new(repository())
        .ingest_regional_statistics(vec![bad])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BatchValidation { index: 0, ref field, .. } if field == "season"));
}

#[tokio::test]
async fn test_price_beyond_stored_precision_rejects_batch() {
    let repo = repository();
    let mut bad = market_input("Onion", date(2024, 3, 2), 0);
    bad.modal_price = Some(Decimal::MAX);

    let err = IngestionService::new(repo.clone())
        .ingest_market_prices(vec![market_input("Onion", date(2024, 3, 1), 2000), bad])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BatchValidation { index: 1, ref field, .. } if field == "modal_price"));

    // Nothing stored, and the read path still serves
    let stored = MarketService::new(repo, test_config().analytics)
        .market_prices(MarketPriceQuery::default())
        .await
        .unwrap();
    assert!(stored.records.is_empty());
}

#[tokio::test]
async fn test_measure_beyond_stored_precision_rejects_batch() {
    let mut huge = regional_input("Pune", Some(2023));
    huge.area_hectares = Some(Decimal::MAX);

    let err = IngestionService::new(repository())
        .ingest_regional_statistics(vec![regional_input("Pune", Some(2023)), huge])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BatchValidation { index: 1, ref field, .. } if field == "area_hectares"));
}

#[tokio::test]
async fn test_widest_accepted_prices_classify_without_error() {
    let repo = repository();
    let mut high = market_input("Onion", date(2024, 3, 2), 0);
    high.modal_price = Some(dec("9999999999.99"));
    let mut low = market_input("Onion", date(2024, 3, 1), 0);
    low.modal_price = Some(dec("0.01"));

    IngestionService::new(repo.clone())
        .ingest_market_prices(vec![high, low])
        .await
        .unwrap();

    let response = MarketService::new(repo, test_config().analytics)
        .market_prices(MarketPriceQuery::default())
        .await
        .unwrap();
    assert_eq!(response.records[0].change.trend, shared::Trend::Up);
    assert_eq!(response.summary.highest_price_per_unit, Some(dec("100000000.00")));
}
