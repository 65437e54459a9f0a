//! Compares the volume traded so far today with the previous session and with
//! the average of recent sessions, all cut at the same time of day.
//!
//! [`controller::obtain_comparison`] is the entry point: it pulls one-minute bars
//! through a [`market_data::providers::DataProvider`], runs
//! [`comparison::compare`] and hands back an [`controller::Outcome`] for
//! [`presentation::render`].

#[cfg(feature = "cli")]
pub mod cli;
pub mod comparison;
pub mod config;
pub mod controller;
pub mod errors;
#[cfg(feature = "cli")]
pub mod logging;
pub mod presentation;
pub mod providers;
