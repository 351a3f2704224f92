//! In-memory repository with the same filter and ordering semantics as the
//! PostgreSQL one. Used by tests and local demos.

use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use shared::{
    CropCycle, MarketPrice, NewCropCycle, NewMarketPrice, NewRegionalStatistic,
    RegionalStatistic,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    Column, FilterValue, RecordQuery, Repository, RepositoryResult, SortDirection,
};

/// Column access for filtering and ordering stored records
trait Queryable {
    fn text(&self, column: Column) -> Option<&str>;
    fn value(&self, column: Column) -> Option<FilterValue>;
}

impl Queryable for RegionalStatistic {
    fn text(&self, column: Column) -> Option<&str> {
        match column {
            Column::State => Some(&self.state),
            Column::District => Some(&self.district),
            Column::Taluka => self.taluka.as_deref(),
            Column::Crop => self.crop.as_deref(),
            _ => None,
        }
    }

    fn value(&self, column: Column) -> Option<FilterValue> {
        match column {
            Column::Year => self.year.map(FilterValue::Int),
            Column::CreatedAt => Some(FilterValue::Timestamp(self.created_at)),
            Column::Id => Some(FilterValue::Id(self.id)),
            _ => None,
        }
    }
}

impl Queryable for MarketPrice {
    fn text(&self, column: Column) -> Option<&str> {
        match column {
            Column::State => Some(&self.state),
            Column::District => Some(&self.district),
            Column::Commodity => Some(&self.commodity),
            _ => None,
        }
    }

    fn value(&self, column: Column) -> Option<FilterValue> {
        match column {
            Column::ArrivalDate => Some(FilterValue::Date(self.arrival_date)),
            Column::CreatedAt => Some(FilterValue::Timestamp(self.created_at)),
            Column::Id => Some(FilterValue::Id(self.id)),
            _ => None,
        }
    }
}

fn is_match<T: Queryable>(record: &T, query: &RecordQuery) -> bool {
    let text_ok = query.text_filters.iter().all(|f| {
        record
            .text(f.column)
            .map(|v| v.to_lowercase().contains(&f.needle.to_lowercase()))
            .unwrap_or(false)
    });
    let exact_ok = query
        .exact_filters
        .iter()
        .all(|f| record.value(f.column).as_ref() == Some(&f.value));
    text_ok && exact_ok
}

fn compare_values(a: &FilterValue, b: &FilterValue) -> Ordering {
    match (a, b) {
        (FilterValue::Int(x), FilterValue::Int(y)) => x.cmp(y),
        (FilterValue::Date(x), FilterValue::Date(y)) => x.cmp(y),
        (FilterValue::Timestamp(x), FilterValue::Timestamp(y)) => x.cmp(y),
        (FilterValue::Id(x), FilterValue::Id(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

/// Compare two present-or-absent keys with absent always last
fn nulls_last<K>(
    a: Option<K>,
    b: Option<K>,
    direction: SortDirection,
    cmp: impl Fn(&K, &K) -> Ordering,
) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => match direction {
            SortDirection::Asc => cmp(&x, &y),
            SortDirection::Desc => cmp(&y, &x),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare<T: Queryable>(a: &T, b: &T, query: &RecordQuery) -> Ordering {
    for order in &query.order_by {
        let ordering = match (a.text(order.column), b.text(order.column)) {
            (None, None) => nulls_last(
                a.value(order.column),
                b.value(order.column),
                order.direction,
                compare_values,
            ),
            (x, y) => nulls_last(x, y, order.direction, |x, y| x.cmp(y)),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn run<T: Queryable + Clone>(records: &[T], query: &RecordQuery) -> RepositoryResult<Vec<T>> {
    query.check_columns()?;

    let mut found: Vec<T> = records.iter().filter(|r| is_match(*r, query)).cloned().collect();
    found.sort_by(|a, b| compare(a, b, query));
    found.truncate(usize::try_from(query.limit.max(0)).unwrap_or(usize::MAX));
    Ok(found)
}

#[derive(Default)]
struct Tables {
    regional_statistics: Vec<RegionalStatistic>,
    market_prices: Vec<MarketPrice>,
    crop_cycles: Vec<CropCycle>,
}

/// Repository holding every table in process memory
#[derive(Default)]
pub struct InMemoryRepository {
    tables: RwLock<Tables>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn ping(&self) -> RepositoryResult<()> {
        Ok(())
    }

    async fn regional_statistics(
        &self,
        query: &RecordQuery,
    ) -> RepositoryResult<Vec<RegionalStatistic>> {
        let tables = self.tables.read().await;
        run(&tables.regional_statistics, query)
    }

    async fn market_prices(&self, query: &RecordQuery) -> RepositoryResult<Vec<MarketPrice>> {
        let tables = self.tables.read().await;
        run(&tables.market_prices, query)
    }

    async fn insert_regional_statistics(
        &self,
        records: Vec<NewRegionalStatistic>,
    ) -> RepositoryResult<Vec<RegionalStatistic>> {
        let now = Utc::now();
        let inserted: Vec<RegionalStatistic> = records
            .into_iter()
            .map(|r| r.into_record(Uuid::new_v4(), now))
            .collect();

        let mut tables = self.tables.write().await;
        tables.regional_statistics.extend(inserted.iter().cloned());
        Ok(inserted)
    }

    async fn insert_market_prices(
        &self,
        records: Vec<NewMarketPrice>,
    ) -> RepositoryResult<Vec<MarketPrice>> {
        let now = Utc::now();
        let inserted: Vec<MarketPrice> = records
            .into_iter()
            .map(|r| r.into_record(Uuid::new_v4(), now))
            .collect();

        let mut tables = self.tables.write().await;
        tables.market_prices.extend(inserted.iter().cloned());
        Ok(inserted)
    }

    async fn insert_crop_cycle(
        &self,
        owner_id: Uuid,
        cycle: NewCropCycle,
    ) -> RepositoryResult<CropCycle> {
        let record = cycle.into_record(Uuid::new_v4(), owner_id, Utc::now());
        self.tables.write().await.crop_cycles.push(record.clone());
        Ok(record)
    }

    async fn crop_cycle(&self, owner_id: Uuid, id: Uuid) -> RepositoryResult<Option<CropCycle>> {
        let tables = self.tables.read().await;
        Ok(tables
            .crop_cycles
            .iter()
            .find(|c| c.id == id && c.owner_id == owner_id)
            .cloned())
    }

    async fn update_planting_date(
        &self,
        owner_id: Uuid,
        id: Uuid,
        planting_date: NaiveDate,
    ) -> RepositoryResult<Option<CropCycle>> {
        let mut tables = self.tables.write().await;
        let cycle = tables
            .crop_cycles
            .iter_mut()
            .find(|c| c.id == id && c.owner_id == owner_id);

        Ok(cycle.map(|c| {
            c.reschedule(planting_date, Utc::now());
            c.clone()
        }))
    }
}
