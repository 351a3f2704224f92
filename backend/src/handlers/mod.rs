//! HTTP handlers for the Farm Statistics Platform

pub mod crop_cycle;
pub mod health;
pub mod ingestion;
pub mod market;
pub mod soil;
pub mod statistics;

pub use crop_cycle::{create_crop_cycle, get_crop_cycle, update_planting_date};
pub use health::health_check;
pub use ingestion::{ingest_market_prices, ingest_regional_statistics};
pub use market::get_market_prices;
pub use soil::score_soil;
pub use statistics::get_regional_statistics;
