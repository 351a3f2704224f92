//! Domain models for the Farm Statistics Platform

mod category;
mod crop_cycle;
mod farm;
mod market;
mod regional;
mod soil;
mod weather;

pub use category::*;
pub use crop_cycle::*;
pub use farm::*;
pub use market::*;
pub use regional::*;
pub use soil::*;
pub use weather::*;
