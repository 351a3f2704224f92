//! Persistence boundary for the Farm Statistics Platform
//!
//! Services talk to storage only through the [`Repository`] trait. Reads take
//! a [`RecordQuery`] built by the query adapter; writes take records that
//! already passed validation.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use shared::{
    CropCycle, MarketPrice, NewCropCycle, NewMarketPrice, NewRegionalStatistic,
    RegionalStatistic,
};
use thiserror::Error;
use uuid::Uuid;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryRepository;
pub use postgres::PgRepository;

/// Repository failures. None of these are retried.
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("stored {field} value {value:?} is not recognised")]
    Corrupt { field: String, value: String },

    #[error("query on {entity} cannot use column {column}")]
    InvalidColumn { entity: Entity, column: Column },
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Queryable public reference tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    RegionalStatistics,
    MarketPrices,
}

impl Entity {
    pub fn table(&self) -> &'static str {
        match self {
            Entity::RegionalStatistics => "regional_statistics",
            Entity::MarketPrices => "market_prices",
        }
    }

    /// Whether `column` exists on this entity
    pub fn has_column(&self, column: Column) -> bool {
        match self {
            Entity::RegionalStatistics => matches!(
                column,
                Column::State
                    | Column::District
                    | Column::Taluka
                    | Column::Crop
                    | Column::Year
                    | Column::CreatedAt
                    | Column::Id
            ),
            Entity::MarketPrices => matches!(
                column,
                Column::State
                    | Column::District
                    | Column::Commodity
                    | Column::ArrivalDate
                    | Column::CreatedAt
                    | Column::Id
            ),
        }
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.table())
    }
}

/// Columns a query may filter or order on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    State,
    District,
    Taluka,
    Crop,
    Commodity,
    Year,
    ArrivalDate,
    /// Insertion time
    CreatedAt,
    Id,
}

impl Column {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Column::State => "state",
            Column::District => "district",
            Column::Taluka => "taluka",
            Column::Crop => "crop",
            Column::Commodity => "commodity",
            Column::Year => "year",
            Column::ArrivalDate => "arrival_date",
            Column::CreatedAt => "created_at",
            Column::Id => "id",
        }
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_sql())
    }
}

/// Case-insensitive substring match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFilter {
    pub column: Column,
    pub needle: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Int(i32),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
    Id(Uuid),
}

/// Exact equality match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactFilter {
    pub column: Column,
    pub value: FilterValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub column: Column,
    pub direction: SortDirection,
}

impl OrderBy {
    pub fn asc(column: Column) -> Self {
        Self { column, direction: SortDirection::Asc }
    }

    pub fn desc(column: Column) -> Self {
        Self { column, direction: SortDirection::Desc }
    }
}

/// A filtered, ordered, bounded read. Absent values always sort last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordQuery {
    pub entity: Entity,
    pub text_filters: Vec<TextFilter>,
    pub exact_filters: Vec<ExactFilter>,
    pub order_by: Vec<OrderBy>,
    pub limit: i64,
}

impl RecordQuery {
    pub fn new(entity: Entity, limit: i64) -> Self {
        Self {
            entity,
            text_filters: Vec::new(),
            exact_filters: Vec::new(),
            order_by: Vec::new(),
            limit,
        }
    }

    /// Add a substring filter; blank needles are ignored
    pub fn contains(mut self, column: Column, needle: Option<&str>) -> Self {
        if let Some(needle) = needle.map(str::trim).filter(|n| !n.is_empty()) {
            self.text_filters.push(TextFilter {
                column,
                needle: needle.to_string(),
            });
        }
        self
    }

    pub fn equals(mut self, column: Column, value: Option<FilterValue>) -> Self {
        if let Some(value) = value {
            self.exact_filters.push(ExactFilter { column, value });
        }
        self
    }

    pub fn order(mut self, order: OrderBy) -> Self {
        self.order_by.push(order);
        self
    }

    /// Reject columns that do not belong to the queried entity
    pub fn check_columns(&self) -> RepositoryResult<()> {
        let columns = self
            .text_filters
            .iter()
            .map(|f| f.column)
            .chain(self.exact_filters.iter().map(|f| f.column))
            .chain(self.order_by.iter().map(|o| o.column));

        for column in columns {
            if !self.entity.has_column(column) {
                return Err(RepositoryError::InvalidColumn {
                    entity: self.entity,
                    column,
                });
            }
        }
        Ok(())
    }
}

/// Storage for reference data and farmer-owned crop cycles.
///
/// Batch inserts are atomic: either every record is written or none is.
/// Owner-scoped reads return `None` both for a missing record and for a
/// record owned by someone else.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Verify the backing store is reachable
    async fn ping(&self) -> RepositoryResult<()>;

    async fn regional_statistics(&self, query: &RecordQuery)
        -> RepositoryResult<Vec<RegionalStatistic>>;

    async fn market_prices(&self, query: &RecordQuery) -> RepositoryResult<Vec<MarketPrice>>;

    async fn insert_regional_statistics(
        &self,
        records: Vec<NewRegionalStatistic>,
    ) -> RepositoryResult<Vec<RegionalStatistic>>;

    async fn insert_market_prices(
        &self,
        records: Vec<NewMarketPrice>,
    ) -> RepositoryResult<Vec<MarketPrice>>;

    async fn insert_crop_cycle(
        &self,
        owner_id: Uuid,
        cycle: NewCropCycle,
    ) -> RepositoryResult<CropCycle>;

    async fn crop_cycle(&self, owner_id: Uuid, id: Uuid) -> RepositoryResult<Option<CropCycle>>;

    async fn update_planting_date(
        &self,
        owner_id: Uuid,
        id: Uuid,
        planting_date: NaiveDate,
    ) -> RepositoryResult<Option<CropCycle>>;
}
