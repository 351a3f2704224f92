//! Shared types, models and analytics for the Farm Statistics Platform
//!
//! This crate contains everything that is pure computation: the validated
//! record model, the soil health scorer, the market trend classifier and the
//! aggregation engine. It is used by the backend and, via WASM, by the
//! browser for offline previews.

pub mod analytics;
pub mod models;
pub mod types;
pub mod validation;

pub use analytics::*;
pub use models::*;
pub use types::*;
pub use validation::*;
