//! Pure analytics over validated records: trend classification and grouped
//! aggregation. Nothing here performs I/O.

mod aggregate;
mod trend;

pub use aggregate::*;
pub use trend::*;
