//! Farm Statistics Platform - backend library
//!
//! Read-mostly analytics over regional crop statistics and market prices,
//! plus farmer-owned crop cycles. The binary in `main.rs` wires this library
//! to PostgreSQL; tests wire it to the in-memory repository.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod repository;
pub mod routes;
pub mod services;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use repository::{InMemoryRepository, PgRepository, Repository};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn Repository>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(repository: Arc<dyn Repository>, config: Config) -> Self {
        Self {
            repository,
            config: Arc::new(config),
        }
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .nest("/api/v1", routes::api_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Farm Statistics Platform API v1.0"
}
