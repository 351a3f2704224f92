//! Regional statistics queries and aggregation

use std::sync::Arc;

use serde::Serialize;
use shared::{aggregate_regional, group_by_district, DistrictGroup, RegionalAggregates, RegionalStatistic};

use crate::config::AnalyticsConfig;
use crate::error::{AppError, AppResult};
use crate::query::RegionalStatsQuery;
use crate::repository::Repository;

/// Regional statistics with their aggregates
#[derive(Debug, Clone, Serialize)]
pub struct RegionalStatisticsResponse {
    pub records: Vec<RegionalStatistic>,
    /// `None` when no record matched
    pub aggregates: Option<RegionalAggregates>,
    pub count: usize,
    pub by_district: Vec<DistrictGroup>,
}

/// Column names of [`RegionalStatisticCsvRow`], in field order
const CSV_HEADER: [&str; 13] = [
    "state",
    "district",
    "taluka",
    "crop",
    "season",
    "year",
    "area_hectares",
    "production_tonnes",
    "yield_kg_per_hectare",
    "rainfall_mm",
    "irrigation_percent",
    "horticulture_area_hectares",
    "medicinal_plant_area_hectares",
];

/// Flat CSV row for a regional statistic
#[derive(Debug, Serialize)]
struct RegionalStatisticCsvRow<'a> {
    state: &'a str,
    district: &'a str,
    taluka: Option<&'a str>,
    crop: Option<&'a str>,
    season: Option<String>,
    year: Option<i32>,
    area_hectares: Option<String>,
    production_tonnes: Option<String>,
    yield_kg_per_hectare: Option<String>,
    rainfall_mm: Option<String>,
    irrigation_percent: Option<String>,
    horticulture_area_hectares: Option<String>,
    medicinal_plant_area_hectares: Option<String>,
}

impl<'a> From<&'a RegionalStatistic> for RegionalStatisticCsvRow<'a> {
    fn from(s: &'a RegionalStatistic) -> Self {
        Self {
            state: &s.state,
            district: &s.district,
            taluka: s.taluka.as_deref(),
            crop: s.crop.as_deref(),
            season: s.season.map(|v| v.to_string()),
            year: s.year,
            area_hectares: s.area_hectares.map(|v| v.to_string()),
            production_tonnes: s.production_tonnes.map(|v| v.to_string()),
            yield_kg_per_hectare: s.yield_kg_per_hectare.map(|v| v.to_string()),
            rainfall_mm: s.rainfall_mm.map(|v| v.to_string()),
            irrigation_percent: s.irrigation_percent.map(|v| v.to_string()),
            horticulture_area_hectares: s.horticulture_area_hectares.map(|v| v.to_string()),
            medicinal_plant_area_hectares: s.medicinal_plant_area_hectares.map(|v| v.to_string()),
        }
    }
}

/// Statistics service
#[derive(Clone)]
pub struct StatisticsService {
    repository: Arc<dyn Repository>,
    analytics: AnalyticsConfig,
}

impl StatisticsService {
    pub fn new(repository: Arc<dyn Repository>, analytics: AnalyticsConfig) -> Self {
        Self {
            repository,
            analytics,
        }
    }

    /// Filtered regional statistics with overall and per-district aggregates
    pub async fn regional_statistics(
        &self,
        params: &RegionalStatsQuery,
    ) -> AppResult<RegionalStatisticsResponse> {
        let query = params.to_record_query(&self.analytics);
        let records = self.repository.regional_statistics(&query).await?;

        let policy = self.analytics.average_policy;
        let aggregates = aggregate_regional(&records, policy);
        let by_district = group_by_district(&records, policy);

        tracing::info!(
            count = records.len(),
            districts = by_district.len(),
            "Regional statistics query served"
        );

        Ok(RegionalStatisticsResponse {
            count: records.len(),
            records,
            aggregates,
            by_district,
        })
    }

    /// Export regional statistics as CSV. The header row is written even
    /// when there are no records.
    pub fn export_to_csv(records: &[RegionalStatistic]) -> AppResult<String> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(vec![]);
        wtr.write_record(CSV_HEADER)
            .map_err(|e| AppError::Internal(format!("CSV header error: {}", e)))?;
        for record in records {
            wtr.serialize(RegionalStatisticCsvRow::from(record))
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let csv_data = String::from_utf8(
            wtr.into_inner()
                .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?,
        )
        .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))?;
        Ok(csv_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use shared::Season;
    use uuid::Uuid;

    #[test]
    fn test_csv_export_has_header_and_rows() {
        let record = RegionalStatistic {
            id: Uuid::new_v4(),
            state: "Maharashtra".to_string(),
            district: "Pune".to_string(),
            taluka: None,
            crop: Some("Sugarcane".to_string()),
            season: Some(Season::Kharif),
            year: Some(2023),
            area_hectares: Some(Decimal::from(120)),
            production_tonnes: None,
            yield_kg_per_hectare: None,
            rainfall_mm: None,
            irrigation_percent: None,
            horticulture_area_hectares: None,
            medicinal_plant_area_hectares: None,
            created_at: Utc::now(),
        };

        let csv = StatisticsService::export_to_csv(&[record]).unwrap();
        let mut lines = csv.lines();
        assert!(lines.next().unwrap().starts_with("state,district,taluka,crop,season,year"));
        assert!(lines.next().unwrap().starts_with("Maharashtra,Pune,,Sugarcane,kharif,2023,120"));
    }

    #[test]
    fn test_csv_includes_every_measure() {
        let record = RegionalStatistic {
            id: Uuid::new_v4(),
            state: "Maharashtra".to_string(),
            district: "Nashik".to_string(),
            taluka: None,
            crop: None,
            season: None,
            year: None,
            area_hectares: None,
            production_tonnes: None,
            yield_kg_per_hectare: None,
            rainfall_mm: None,
            irrigation_percent: None,
            horticulture_area_hectares: Some(Decimal::from(35)),
            medicinal_plant_area_hectares: Some(Decimal::new(45, 1)),
            created_at: Utc::now(),
        };

        let csv = StatisticsService::export_to_csv(&[record]).unwrap();
        let mut lines = csv.lines();
        assert!(lines
            .next()
            .unwrap()
            .ends_with("horticulture_area_hectares,medicinal_plant_area_hectares"));
        assert_eq!(lines.next().unwrap(), "Maharashtra,Nashik,,,,,,,,,,35,4.5");
    }

    #[test]
    fn test_empty_csv_still_has_header() {
        let csv = StatisticsService::export_to_csv(&[]).unwrap();
        assert_eq!(csv.trim_end(), CSV_HEADER.join(","));
    }
}
