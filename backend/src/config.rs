//! Configuration management for the Farm Statistics Platform
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with FARM_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::AveragePolicy;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT authentication configuration
    pub jwt: JwtConfig,

    /// Query limits and aggregation policy
    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    /// Secret key for verifying bearer tokens
    pub secret: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AnalyticsConfig {
    /// Default result count for regional statistics queries
    pub regional_default_limit: i64,

    /// Default result count for market price queries
    pub market_default_limit: i64,

    /// Hard ceiling applied to every requested limit
    pub max_limit: i64,

    /// How missing measures contribute to regional averages
    pub average_policy: AveragePolicy,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("FARM_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("analytics.regional_default_limit", 100)?
            .set_default("analytics.market_default_limit", 50)?
            .set_default("analytics.max_limit", 1000)?
            .set_default("analytics.average_policy", "missing_as_zero")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (FARM_ prefix)
            .add_source(
                Environment::with_prefix("FARM")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.analytics.check()?;
        Ok(config)
    }
}

impl AnalyticsConfig {
    /// Defaults must be positive and within the ceiling
    pub fn check(&self) -> Result<(), ConfigError> {
        if self.max_limit < 1 {
            return Err(ConfigError::Message(
                "analytics.max_limit must be at least 1".to_string(),
            ));
        }
        for (name, value) in [
            ("regional_default_limit", self.regional_default_limit),
            ("market_default_limit", self.market_default_limit),
        ] {
            if value < 1 || value > self.max_limit {
                return Err(ConfigError::Message(format!(
                    "analytics.{} must be between 1 and {}",
                    name, self.max_limit
                )));
            }
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            regional_default_limit: 100,
            market_default_limit: 50,
            max_limit: 1000,
            average_policy: AveragePolicy::MissingAsZero,
        }
    }
}
