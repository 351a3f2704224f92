//! Batch ingestion of reference data
//!
//! A batch is validated as a whole before anything is written; one invalid
//! record rejects the batch.

use std::sync::Arc;

use serde::Serialize;
use shared::{
    validate_batch, MarketPriceInput, NewMarketPrice, NewRegionalStatistic,
    RegionalStatisticInput, ValidationError,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::repository::Repository;

/// Outcome of an accepted batch
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct IngestionReceipt {
    pub inserted: usize,
    pub ids: Vec<Uuid>,
}

fn require_records<T>(records: &[T]) -> AppResult<()> {
    if records.is_empty() {
        return Err(ValidationError::new("records", "must contain at least one record").into());
    }
    Ok(())
}

/// Ingestion service
#[derive(Clone)]
pub struct IngestionService {
    repository: Arc<dyn Repository>,
}

impl IngestionService {
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self { repository }
    }

    pub async fn ingest_market_prices(
        &self,
        inputs: Vec<MarketPriceInput>,
    ) -> AppResult<IngestionReceipt> {
        require_records(&inputs)?;
        let records = validate_batch::<_, NewMarketPrice>(inputs)?;
        let inserted = self.repository.insert_market_prices(records).await?;

        tracing::info!(count = inserted.len(), "Market prices ingested");
        Ok(IngestionReceipt {
            inserted: inserted.len(),
            ids: inserted.iter().map(|p| p.id).collect(),
        })
    }

    pub async fn ingest_regional_statistics(
        &self,
        inputs: Vec<RegionalStatisticInput>,
    ) -> AppResult<IngestionReceipt> {
        require_records(&inputs)?;
        let records = validate_batch::<_, NewRegionalStatistic>(inputs)?;
        let inserted = self.repository.insert_regional_statistics(records).await?;

        tracing::info!(count = inserted.len(), "Regional statistics ingested");
        Ok(IngestionReceipt {
            inserted: inserted.len(),
            ids: inserted.iter().map(|s| s.id).collect(),
        })
    }
}
