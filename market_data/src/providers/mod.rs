//! Provider abstraction for market data sources.
//!
//! This module defines the [`DataProvider`] trait, the unified interface for
//! fetching time-series bar data. The concrete implementation shipped here is
//! [`TerminalProvider`](terminal::provider::TerminalProvider), which drives any
//! [`Terminal`](terminal::Terminal): a live terminal reached through
//! [`BridgeTerminal`](terminal_bridge::BridgeTerminal) or a rates export replayed
//! by [`CsvTerminal`](csv_replay::CsvTerminal).
//!
//! The trait supports dynamic dispatch (`dyn DataProvider`) so the binary can pick
//! a provider from configuration at runtime.
//!
//! # Example
//!
//! ```rust
//! use market_data::models::{bar_series::BarSeries, request_params::BarsRequestParams};
//! use market_data::providers::{DataProvider, ProviderError};
//!
//! struct MyProvider;
//!
//! impl DataProvider for MyProvider {
//!     fn fetch_bars(&self, params: &BarsRequestParams) -> Result<BarSeries, ProviderError> {
//!         Ok(BarSeries::new(params.symbol.clone(), params.timeframe, vec![]))
//!     }
//! }
//! ```

pub mod csv_replay;
pub mod terminal;
pub mod terminal_bridge;

use chrono::DateTime;
use chrono_tz::Tz;
use snafu::{Backtrace, Snafu, ensure};
use tracing::debug;

use crate::models::{bar_series::BarSeries, request_params::BarsRequestParams};
use terminal::TerminalError;

/// Trait for fetching time-series bar data from a market data provider.
pub trait DataProvider {
    /// Fetches the bars of `params.symbol` inside `[params.start, params.end]`.
    ///
    /// # Returns
    ///
    /// * `Ok(BarSeries)` - A non-empty series sorted oldest first.
    /// * `Err(ProviderError)` - If the terminal cannot be reached, the symbol cannot
    ///   be selected, or no bars exist in the window.
    fn fetch_bars(&self, params: &BarsRequestParams) -> Result<BarSeries, ProviderError>;
}

/// Fetches the one-minute bars needed to compare `days` sessions up to `now`.
///
/// The window spans `days` plus a margin of calendar days so that weekends and
/// holidays still leave enough sessions; bar timestamps come back in `now`'s zone.
pub fn fetch_recent_bars<P>(
    provider: &P,
    symbol: &str,
    days: u32,
    now: DateTime<Tz>,
) -> Result<BarSeries, ProviderError>
where
    P: DataProvider + ?Sized,
{
    ensure!(
        days >= 1,
        ValidationSnafu {
            message: format!("number of days must be at least 1, got {days}"),
        }
    );
    let params = BarsRequestParams::lookback(symbol, days, now);
    debug!(
        symbol,
        start = %params.start,
        end = %params.end,
        "requesting one-minute bars"
    );
    provider.fetch_bars(&params)
}

/// Errors that can occur during the creation of a provider instance.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// The bridge base URL does not parse.
    #[snafu(display("Invalid terminal bridge URL {url}: {message}"))]
    InvalidUrl {
        url: String,
        message: String,
        backtrace: Backtrace,
    },

    /// failed to init reqwest client
    #[snafu(display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// Bridge token contains invalid characters.
    #[snafu(display("Invalid bridge token format: {source}"))]
    InvalidToken {
        source: reqwest::header::InvalidHeaderValue,
        backtrace: Backtrace,
    },

    /// A terminal must accept at least one bar per request.
    #[snafu(display("Invalid page limit {limit}: a request must allow at least one bar"))]
    InvalidPageLimit { limit: usize, backtrace: Backtrace },
}

/// Errors that can occur within a `DataProvider` implementation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderError {
    /// The terminal connection could not be established.
    #[snafu(display("Failed to connect to the trading terminal: {source}"))]
    Connection {
        source: TerminalError,
        backtrace: Backtrace,
    },

    /// The symbol is unknown to the terminal or could not be activated.
    #[snafu(display("Symbol {symbol} is not available on the terminal: {source}"))]
    SymbolUnavailable {
        symbol: String,
        source: TerminalError,
        backtrace: Backtrace,
    },

    /// A rates request failed.
    #[snafu(display("Failed to obtain rates for {symbol}: {source}"))]
    Request {
        symbol: String,
        source: TerminalError,
        backtrace: Backtrace,
    },

    /// The terminal answered, but with no bars inside the requested window.
    #[snafu(display(
        "No data returned for {symbol}. Check that the symbol is correct and that there was a trading session."
    ))]
    NoData { symbol: String, backtrace: Backtrace },

    /// The request parameters were invalid for this provider.
    #[snafu(display("Invalid parameters for provider: {message}"))]
    Validation { message: String, backtrace: Backtrace },

    /// An internal error occurred while processing data within the provider.
    #[snafu(display("Internal provider error: {message}"))]
    Internal { message: String, backtrace: Backtrace },
}
