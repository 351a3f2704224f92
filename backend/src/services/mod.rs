//! Business logic services for the Farm Statistics Platform

pub mod crop_cycle;
pub mod ingestion;
pub mod market;
pub mod statistics;

pub use crop_cycle::CropCycleService;
pub use ingestion::IngestionService;
pub use market::MarketService;
pub use statistics::StatisticsService;
