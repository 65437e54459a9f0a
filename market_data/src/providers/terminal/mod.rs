//! Trading terminal abstraction.
//!
//! A [`Terminal`] exposes the handful of calls a desktop trading terminal offers
//! for historical data: connect, activate a symbol, copy rates, disconnect. Calls
//! are blocking and a single request is capped at a terminal-defined number of
//! bars, which [`provider::TerminalProvider`] works around by paging.

pub mod provider;
pub mod session;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use thiserror::Error;

use crate::models::{bar::Bar, timeframe::TimeFrame};

/// Bars a terminal serves per request unless configured otherwise.
pub const DEFAULT_PAGE_LIMIT: usize = 1000;

/// One rate row exactly as the terminal reports it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Rate {
    /// Bar opening time, seconds since the Unix epoch.
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub tick_volume: Option<u64>,
    #[serde(default)]
    pub spread: Option<i64>,
    #[serde(default)]
    pub real_volume: Option<u64>,
}

impl Rate {
    /// Converts the row into a [`Bar`] stamped in `tz`.
    ///
    /// Returns `None` when `time` is outside the representable range.
    pub fn into_bar(self, tz: &Tz) -> Option<Bar> {
        let timestamp = DateTime::from_timestamp(self.time, 0)?.with_timezone(tz);
        Some(Bar {
            timestamp,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            tick_volume: self.tick_volume,
            real_volume: self.real_volume,
        })
    }
}

/// Failures reported by a terminal call.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// The terminal rejected a call; `code` is the terminal's own error code.
    #[error("terminal call failed ({code}): {message}")]
    Call { code: i32, message: String },

    /// The request covers more bars than the terminal serves at once.
    #[error("request exceeds the terminal limit of {limit} bars")]
    RequestLimit { limit: usize },

    #[error("symbol {0} is unknown to the terminal or cannot be selected")]
    UnknownSymbol(String),

    #[error("terminal is not connected")]
    NotConnected,

    #[error("terminal transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed terminal reply: {0}")]
    Malformed(String),

    #[error("failed to read rates file: {0}")]
    Csv(#[from] csv::Error),
}

/// Blocking connection to a trading terminal.
///
/// Implementations take `&self`; any connection state lives behind interior
/// mutability or in the remote process.
pub trait Terminal {
    /// Connects to the terminal. Must succeed before any other call.
    fn initialize(&self) -> Result<(), TerminalError>;

    /// Releases the connection acquired by [`Terminal::initialize`].
    fn shutdown(&self) -> Result<(), TerminalError>;

    /// Makes `symbol` available for rate requests.
    fn select_symbol(&self, symbol: &str) -> Result<(), TerminalError>;

    /// Bars opened inside `[from, to]`, ascending.
    ///
    /// Fails with [`TerminalError::RequestLimit`] when the range holds more bars
    /// than a single request may return.
    fn copy_rates_range(
        &self,
        symbol: &str,
        timeframe: TimeFrame,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Rate>, TerminalError>;

    /// Up to `count` of the most recent bars opened strictly before `before`, ascending.
    fn copy_rates_before(
        &self,
        symbol: &str,
        timeframe: TimeFrame,
        before: DateTime<Utc>,
        count: usize,
    ) -> Result<Vec<Rate>, TerminalError>;
}
