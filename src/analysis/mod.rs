//! Analysis modules.
//!
//! Filtering to successful runs and per-method aggregation.

pub mod aggregator;
pub mod filter;

pub use aggregator::*;
pub use filter::*;
