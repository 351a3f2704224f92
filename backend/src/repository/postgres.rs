//! PostgreSQL repository

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use shared::{
    parse_category, parse_optional_category, CropCycle, CropStatus, MarketPrice, NewCropCycle,
    NewMarketPrice, NewRegionalStatistic, RegionalStatistic, Season, ValidationError,
};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{
    Entity, FilterValue, RecordQuery, Repository, RepositoryError, RepositoryResult,
};

const REGIONAL_COLUMNS: &str = "id, state, district, taluka, crop, season, year, area_hectares, \
    production_tonnes, yield_kg_per_hectare, rainfall_mm, irrigation_percent, \
    horticulture_area_hectares, medicinal_plant_area_hectares, created_at";

const MARKET_COLUMNS: &str = "id, commodity, commodity_code, variety, grade, market, state, \
    district, arrival_date, min_price, max_price, modal_price, created_at";

const CROP_CYCLE_COLUMNS: &str =
    "id, owner_id, crop_name, status, season, planting_date, notes, created_at, updated_at";

/// Repository backed by a PostgreSQL pool
#[derive(Clone)]
pub struct PgRepository {
    db: PgPool,
}

impl PgRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

/// Escape LIKE wildcards so user input only ever matches literally
fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Build `SELECT ... WHERE ... ORDER BY ... LIMIT` for a record query
fn select<'a>(columns: &str, query: &'a RecordQuery) -> RepositoryResult<QueryBuilder<'a, Postgres>> {
    query.check_columns()?;

    let mut builder = QueryBuilder::new(format!(
        "SELECT {} FROM {} WHERE 1=1",
        columns,
        query.entity.table()
    ));

    for filter in &query.text_filters {
        builder.push(format!(" AND {} ILIKE ", filter.column.as_sql()));
        builder.push_bind(like_pattern(&filter.needle));
    }

    for filter in &query.exact_filters {
        builder.push(format!(" AND {} = ", filter.column.as_sql()));
        match &filter.value {
            FilterValue::Int(v) => builder.push_bind(*v),
            FilterValue::Date(v) => builder.push_bind(*v),
            FilterValue::Timestamp(v) => builder.push_bind(*v),
            FilterValue::Id(v) => builder.push_bind(*v),
        };
    }

    if !query.order_by.is_empty() {
        let order = query
            .order_by
            .iter()
            .map(|o| format!("{} {} NULLS LAST", o.column.as_sql(), o.direction.as_sql()))
            .collect::<Vec<_>>()
            .join(", ");
        builder.push(format!(" ORDER BY {}", order));
    }

    builder.push(" LIMIT ");
    builder.push_bind(query.limit);

    Ok(builder)
}

fn corrupt(error: ValidationError, value: &str) -> RepositoryError {
    RepositoryError::Corrupt {
        field: error.field,
        value: value.to_string(),
    }
}

#[derive(Debug, FromRow)]
struct RegionalStatisticRow {
    id: Uuid,
    state: String,
    district: String,
    taluka: Option<String>,
    crop: Option<String>,
    season: Option<String>,
    year: Option<i32>,
    area_hectares: Option<Decimal>,
    production_tonnes: Option<Decimal>,
    yield_kg_per_hectare: Option<Decimal>,
    rainfall_mm: Option<Decimal>,
    irrigation_percent: Option<Decimal>,
    horticulture_area_hectares: Option<Decimal>,
    medicinal_plant_area_hectares: Option<Decimal>,
    created_at: DateTime<Utc>,
}

impl TryFrom<RegionalStatisticRow> for RegionalStatistic {
    type Error = RepositoryError;

    fn try_from(row: RegionalStatisticRow) -> Result<Self, Self::Error> {
        let season = parse_optional_category::<Season>("season", row.season.as_deref())
            .map_err(|e| corrupt(e, row.season.as_deref().unwrap_or_default()))?;

        Ok(Self {
            id: row.id,
            state: row.state,
            district: row.district,
            taluka: row.taluka,
            crop: row.crop,
            season,
            year: row.year,
            area_hectares: row.area_hectares,
            production_tonnes: row.production_tonnes,
            yield_kg_per_hectare: row.yield_kg_per_hectare,
            rainfall_mm: row.rainfall_mm,
            irrigation_percent: row.irrigation_percent,
            horticulture_area_hectares: row.horticulture_area_hectares,
            medicinal_plant_area_hectares: row.medicinal_plant_area_hectares,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct CropCycleRow {
    id: Uuid,
    owner_id: Uuid,
    crop_name: String,
    status: String,
    season: Option<String>,
    planting_date: NaiveDate,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CropCycleRow> for CropCycle {
    type Error = RepositoryError;

    fn try_from(row: CropCycleRow) -> Result<Self, Self::Error> {
        let status = parse_category::<CropStatus>("status", &row.status)
            .map_err(|e| corrupt(e, &row.status))?;
        let season = parse_optional_category::<Season>("season", row.season.as_deref())
            .map_err(|e| corrupt(e, row.season.as_deref().unwrap_or_default()))?;

        Ok(Self {
            id: row.id,
            owner_id: row.owner_id,
            crop_name: row.crop_name,
            status,
            season,
            planting_date: row.planting_date,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct MarketPriceRow {
    id: Uuid,
    commodity: String,
    commodity_code: Option<String>,
    variety: Option<String>,
    grade: Option<String>,
    market: String,
    state: String,
    district: String,
    arrival_date: NaiveDate,
    min_price: Option<Decimal>,
    max_price: Option<Decimal>,
    modal_price: Option<Decimal>,
    created_at: DateTime<Utc>,
}

impl From<MarketPriceRow> for MarketPrice {
    fn from(row: MarketPriceRow) -> Self {
        Self {
            id: row.id,
            commodity: row.commodity,
            commodity_code: row.commodity_code,
            variety: row.variety,
            grade: row.grade,
            market: row.market,
            state: row.state,
            district: row.district,
            arrival_date: row.arrival_date,
            min_price: row.min_price,
            max_price: row.max_price,
            modal_price: row.modal_price,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl Repository for PgRepository {
    async fn ping(&self) -> RepositoryResult<()> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }

    async fn regional_statistics(
        &self,
        query: &RecordQuery,
    ) -> RepositoryResult<Vec<RegionalStatistic>> {
        debug_assert_eq!(query.entity, Entity::RegionalStatistics);
        let rows = select(REGIONAL_COLUMNS, query)?
            .build_query_as::<RegionalStatisticRow>()
            .fetch_all(&self.db)
            .await?;

        rows.into_iter().map(RegionalStatistic::try_from).collect()
    }

    async fn market_prices(&self, query: &RecordQuery) -> RepositoryResult<Vec<MarketPrice>> {
        debug_assert_eq!(query.entity, Entity::MarketPrices);
        let rows = select(MARKET_COLUMNS, query)?
            .build_query_as::<MarketPriceRow>()
            .fetch_all(&self.db)
            .await?;

        Ok(rows.into_iter().map(MarketPrice::from).collect())
    }

    async fn insert_regional_statistics(
        &self,
        records: Vec<NewRegionalStatistic>,
    ) -> RepositoryResult<Vec<RegionalStatistic>> {
        let mut tx = self.db.begin().await?;
        let mut inserted = Vec::with_capacity(records.len());

        for record in records {
            let row = sqlx::query_as::<_, RegionalStatisticRow>(&format!(
                r#"
                INSERT INTO regional_statistics (
                    state, district, taluka, crop, season, year, area_hectares,
                    production_tonnes, yield_kg_per_hectare, rainfall_mm, irrigation_percent,
                    horticulture_area_hectares, medicinal_plant_area_hectares
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
                RETURNING {}
                "#,
                REGIONAL_COLUMNS
            ))
            .bind(&record.state)
            .bind(&record.district)
            .bind(&record.taluka)
            .bind(&record.crop)
            .bind(record.season.map(|s| s.to_string()))
            .bind(record.year)
            .bind(record.area_hectares)
            .bind(record.production_tonnes)
            .bind(record.yield_kg_per_hectare)
            .bind(record.rainfall_mm)
            .bind(record.irrigation_percent)
            .bind(record.horticulture_area_hectares)
            .bind(record.medicinal_plant_area_hectares)
            .fetch_one(&mut *tx)
            .await?;

            inserted.push(RegionalStatistic::try_from(row)?);
        }

        tx.commit().await?;
        Ok(inserted)
    }

    async fn insert_market_prices(
        &self,
        records: Vec<NewMarketPrice>,
    ) -> RepositoryResult<Vec<MarketPrice>> {
        let mut tx = self.db.begin().await?;
        let mut inserted = Vec::with_capacity(records.len());

        for record in records {
            let row = sqlx::query_as::<_, MarketPriceRow>(&format!(
                r#"
                INSERT INTO market_prices (
                    commodity, commodity_code, variety, grade, market, state, district,
                    arrival_date, min_price, max_price, modal_price
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                RETURNING {}
                "#,
                MARKET_COLUMNS
            ))
            .bind(&record.commodity)
            .bind(&record.commodity_code)
            .bind(&record.variety)
            .bind(&record.grade)
            .bind(&record.market)
            .bind(&record.state)
            .bind(&record.district)
            .bind(record.arrival_date)
            .bind(record.min_price)
            .bind(record.max_price)
            .bind(record.modal_price)
            .fetch_one(&mut *tx)
            .await?;

            inserted.push(MarketPrice::from(row));
        }

        tx.commit().await?;
        Ok(inserted)
    }

    async fn insert_crop_cycle(
        &self,
        owner_id: Uuid,
        cycle: NewCropCycle,
    ) -> RepositoryResult<CropCycle> {
        let row = sqlx::query_as::<_, CropCycleRow>(&format!(
            r#"
            INSERT INTO crop_cycles (owner_id, crop_name, status, season, planting_date, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            CROP_CYCLE_COLUMNS
        ))
        .bind(owner_id)
        .bind(&cycle.crop_name)
        .bind(cycle.status.to_string())
        .bind(cycle.season.map(|s| s.to_string()))
        .bind(cycle.planting_date)
        .bind(&cycle.notes)
        .fetch_one(&self.db)
        .await?;

        CropCycle::try_from(row)
    }

    async fn crop_cycle(&self, owner_id: Uuid, id: Uuid) -> RepositoryResult<Option<CropCycle>> {
        let row = sqlx::query_as::<_, CropCycleRow>(&format!(
            "SELECT {} FROM crop_cycles WHERE id = $1 AND owner_id = $2",
            CROP_CYCLE_COLUMNS
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.db)
        .await?;

        row.map(CropCycle::try_from).transpose()
    }

    async fn update_planting_date(
        &self,
        owner_id: Uuid,
        id: Uuid,
        planting_date: NaiveDate,
    ) -> RepositoryResult<Option<CropCycle>> {
        let row = sqlx::query_as::<_, CropCycleRow>(&format!(
            r#"
            UPDATE crop_cycles
            SET planting_date = $3, updated_at = NOW()
            WHERE id = $1 AND owner_id = $2
            RETURNING {}
            "#,
            CROP_CYCLE_COLUMNS
        ))
        .bind(id)
        .bind(owner_id)
        .bind(planting_date)
        .fetch_optional(&self.db)
        .await?;

        row.map(CropCycle::try_from).transpose()
    }
}
