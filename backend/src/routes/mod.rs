//! Route definitions for the Farm Statistics Platform

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Public reference data
        .route("/statistics/regional", get(handlers::get_regional_statistics))
        .route("/market/prices", get(handlers::get_market_prices))
        .route("/soil/score", post(handlers::score_soil))
        // Protected routes - ingestion
        .nest("/ingest", ingest_routes(state.clone()))
        // Protected routes - crop cycles
        .nest("/crop-cycles", crop_cycle_routes(state))
}

/// Reference data ingestion routes (protected)
fn ingest_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/market-prices", post(handlers::ingest_market_prices))
        .route(
            "/regional-statistics",
            post(handlers::ingest_regional_statistics),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Crop cycle routes (protected, owner scoped)
fn crop_cycle_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_crop_cycle))
        .route("/:cycle_id", get(handlers::get_crop_cycle))
        .route("/:cycle_id/planting-date", put(handlers::update_planting_date))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
