//! Closed categorical domains
//!
//! Each domain is an enum with a fixed wire spelling. Values outside the set
//! are rejected at the boundary; nothing is coerced into a nearby member.

use serde::{Deserialize, Serialize};

use crate::validation::{ValidationError, ValidationResult};

/// A closed set of named values
pub trait Category: Sized + Copy + 'static {
    /// Name of the domain, used when no field name is available
    const DOMAIN: &'static str;
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;
}

/// Parse a wire value into a category, naming `field` on rejection
pub fn parse_category<T: Category>(field: &str, value: &str) -> ValidationResult<T> {
    T::ALL
        .iter()
        .copied()
        .find(|c| c.as_str() == value)
        .ok_or_else(|| {
            let allowed: Vec<&str> = T::ALL.iter().map(|c| c.as_str()).collect();
            ValidationError::new(field, format!("must be one of: {}", allowed.join(", ")))
        })
}

/// Parse an optional wire value; blank counts as absent
pub fn parse_optional_category<T: Category>(
    field: &str,
    value: Option<&str>,
) -> ValidationResult<Option<T>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => parse_category(field, v).map(Some),
        None => Ok(None),
    }
}

macro_rules! category_traits {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl std::fmt::Display for $ty {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.write_str(self.as_str())
                }
            }

            impl std::str::FromStr for $ty {
                type Err = ValidationError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    parse_category(<$ty as Category>::DOMAIN, s)
                }
            }
        )+
    };
}

/// Lifecycle of a crop cycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum CropStatus {
    Planning,
    Planted,
    Growing,
    Harvested,
    Failed,
}

impl Category for CropStatus {
    const DOMAIN: &'static str = "crop_status";
    const ALL: &'static [Self] = &[
        CropStatus::Planning,
        CropStatus::Planted,
        CropStatus::Growing,
        CropStatus::Harvested,
        CropStatus::Failed,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            CropStatus::Planning => "planning",
            CropStatus::Planted => "planted",
            CropStatus::Growing => "growing",
            CropStatus::Harvested => "harvested",
            CropStatus::Failed => "failed",
        }
    }
}

/// Soil texture classes, including the regional black/red/alluvial soils
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum SoilType {
    Clay,
    Sandy,
    Loamy,
    Silt,
    Peaty,
    Chalky,
    Black,
    Red,
    Alluvial,
}

impl Category for SoilType {
    const DOMAIN: &'static str = "soil_type";
    const ALL: &'static [Self] = &[
        SoilType::Clay,
        SoilType::Sandy,
        SoilType::Loamy,
        SoilType::Silt,
        SoilType::Peaty,
        SoilType::Chalky,
        SoilType::Black,
        SoilType::Red,
        SoilType::Alluvial,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            SoilType::Clay => "clay",
            SoilType::Sandy => "sandy",
            SoilType::Loamy => "loamy",
            SoilType::Silt => "silt",
            SoilType::Peaty => "peaty",
            SoilType::Chalky => "chalky",
            SoilType::Black => "black",
            SoilType::Red => "red",
            SoilType::Alluvial => "alluvial",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum IrrigationMethod {
    Drip,
    Sprinkler,
    Flood,
    CenterPivot,
    Manual,
    Rainfed,
}

impl Category for IrrigationMethod {
    const DOMAIN: &'static str = "irrigation_method";
    const ALL: &'static [Self] = &[
        IrrigationMethod::Drip,
        IrrigationMethod::Sprinkler,
        IrrigationMethod::Flood,
        IrrigationMethod::CenterPivot,
        IrrigationMethod::Manual,
        IrrigationMethod::Rainfed,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            IrrigationMethod::Drip => "drip",
            IrrigationMethod::Sprinkler => "sprinkler",
            IrrigationMethod::Flood => "flood",
            IrrigationMethod::CenterPivot => "center-pivot",
            IrrigationMethod::Manual => "manual",
            IrrigationMethod::Rainfed => "rainfed",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum WeatherCondition {
    Clear,
    PartlyCloudy,
    Cloudy,
    Fog,
    Rain,
    Snow,
    Thunderstorm,
}

impl Category for WeatherCondition {
    const DOMAIN: &'static str = "weather_condition";
    const ALL: &'static [Self] = &[
        WeatherCondition::Clear,
        WeatherCondition::PartlyCloudy,
        WeatherCondition::Cloudy,
        WeatherCondition::Fog,
        WeatherCondition::Rain,
        WeatherCondition::Snow,
        WeatherCondition::Thunderstorm,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            WeatherCondition::Clear => "clear",
            WeatherCondition::PartlyCloudy => "partly-cloudy",
            WeatherCondition::Cloudy => "cloudy",
            WeatherCondition::Fog => "fog",
            WeatherCondition::Rain => "rain",
            WeatherCondition::Snow => "snow",
            WeatherCondition::Thunderstorm => "thunderstorm",
        }
    }
}

/// Agricultural season
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Season {
    /// Monsoon-sown, June-October
    Kharif,
    /// Winter-sown, October-March
    Rabi,
    /// Short summer crop between rabi and kharif
    Zaid,
    Summer,
    Winter,
    Monsoon,
}

impl Category for Season {
    const DOMAIN: &'static str = "season";
    const ALL: &'static [Self] = &[
        Season::Kharif,
        Season::Rabi,
        Season::Zaid,
        Season::Summer,
        Season::Winter,
        Season::Monsoon,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Season::Kharif => "kharif",
            Season::Rabi => "rabi",
            Season::Zaid => "zaid",
            Season::Summer => "summer",
            Season::Winter => "winter",
            Season::Monsoon => "monsoon",
        }
    }
}

category_traits!(CropStatus, SoilType, IrrigationMethod, WeatherCondition, Season);

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_round_trips<T>()
    where
        T: Category + PartialEq + std::fmt::Debug + std::str::FromStr + Serialize,
        <T as std::str::FromStr>::Err: std::fmt::Debug,
    {
        for value in T::ALL {
            let parsed: T = value.as_str().parse().unwrap();
            assert_eq!(&parsed, value);
            // Wire spelling is the serde spelling
            let json = serde_json::to_string(value).unwrap();
            assert_eq!(json, format!("\"{}\"", value.as_str()));
        }
    }

    #[test]
    fn test_every_member_round_trips() {
        assert_round_trips::<CropStatus>();
        assert_round_trips::<SoilType>();
        assert_round_trips::<IrrigationMethod>();
        assert_round_trips::<WeatherCondition>();
        assert_round_trips::<Season>();
    }

    #[test]
    fn test_domain_sizes() {
        assert_eq!(CropStatus::ALL.len(), 5);
        assert_eq!(SoilType::ALL.len(), 9);
        assert_eq!(IrrigationMethod::ALL.len(), 6);
        assert_eq!(WeatherCondition::ALL.len(), 7);
        assert_eq!(Season::ALL.len(), 6);
    }

    #[test]
    fn test_unknown_soil_type_rejected() {
        let err = parse_category::<SoilType>("soil_type", "volcanic").unwrap_err();
        assert_eq!(err.field, "soil_type");
        assert!(err.constraint.contains("alluvial"));
    }

    #[test]
    fn test_no_case_coercion() {
        assert!(parse_category::<Season>("season", "Kharif").is_err());
        assert!(parse_category::<IrrigationMethod>("irrigation_method", "center_pivot").is_err());
        assert_eq!(
            parse_category::<IrrigationMethod>("irrigation_method", "center-pivot").unwrap(),
            IrrigationMethod::CenterPivot
        );
    }

    #[test]
    fn test_from_str_uses_domain_name() {
        let err = "volcanic".parse::<SoilType>().unwrap_err();
        assert_eq!(err.field, "soil_type");
    }

    #[test]
    fn test_serde_rejects_unknown() {
        assert!(serde_json::from_str::<WeatherCondition>("\"hail\"").is_err());
        assert_eq!(
            serde_json::from_str::<WeatherCondition>("\"partly-cloudy\"").unwrap(),
            WeatherCondition::PartlyCloudy
        );
    }

    #[test]
    fn test_optional_category() {
        assert_eq!(parse_optional_category::<Season>("season", None).unwrap(), None);
        assert_eq!(parse_optional_category::<Season>("season", Some("  ")).unwrap(), None);
        assert_eq!(
            parse_optional_category::<Season>("season", Some("rabi")).unwrap(),
            Some(Season::Rabi)
        );
        assert!(parse_optional_category::<Season>("season", Some("spring")).is_err());
    }
}
