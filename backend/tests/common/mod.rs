//! Shared fixtures for backend integration tests

#![allow(dead_code)]

use std::str::FromStr;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use farm_stats_backend::config::{
    AnalyticsConfig, Config, DatabaseConfig, JwtConfig, ServerConfig,
};
use farm_stats_backend::middleware::auth::Claims;
use farm_stats_backend::{AppState, InMemoryRepository, Repository};
use jsonwebtoken::{encode, EncodingKey, Header};
use rust_decimal::Decimal;
use shared::{MarketPriceInput, RegionalStatisticInput};
use uuid::Uuid;

pub const JWT_SECRET: &str = "test-secret";

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn test_config() -> Config {
    Config {
        environment: "test".to_string(),
        server: ServerConfig::default(),
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: 1,
            min_connections: 0,
        },
        jwt: JwtConfig {
            secret: JWT_SECRET.to_string(),
        },
        analytics: AnalyticsConfig::default(),
    }
}

pub fn repository() -> Arc<dyn Repository> {
    Arc::new(InMemoryRepository::new())
}

pub fn state_with(repository: Arc<dyn Repository>) -> AppState {
    AppState::new(repository, test_config())
}

pub fn bearer_token(user_id: Uuid) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        exp: now + 3600,
        iat: now,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .unwrap();
    format!("Bearer {}", token)
}

pub fn market_input(commodity: &str, arrival: NaiveDate, modal: i64) -> MarketPriceInput {
    MarketPriceInput {
        commodity: commodity.to_string(),
        commodity_code: None,
        variety: None,
        grade: Some("FAQ".to_string()),
        market: "Lasalgaon".to_string(),
        state: "Maharashtra".to_string(),
        district: "Nashik".to_string(),
        arrival_date: arrival,
        min_price: None,
        max_price: None,
        modal_price: Some(Decimal::from(modal)),
    }
}

pub fn regional_input(district: &str, year: Option<i32>) -> RegionalStatisticInput {
    RegionalStatisticInput {
        state: "Maharashtra".to_string(),
        district: district.to_string(),
        crop: Some("Jowar".to_string()),
        season: Some("rabi".to_string()),
        year,
        ..Default::default()
    }
}
