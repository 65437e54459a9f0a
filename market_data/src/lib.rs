//! Market data acquisition for the volume comparison tool.
//!
//! [`models`] holds the vendor-agnostic bar types, [`providers`] the
//! [`DataProvider`](providers::DataProvider) abstraction together with the
//! trading-terminal implementations that back it.

pub mod models;
pub mod providers;

pub use providers::fetch_recent_bars;
