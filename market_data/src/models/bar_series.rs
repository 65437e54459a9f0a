//! A collection of time-series bars for a specific symbol and timeframe.

use crate::models::{bar::Bar, timeframe::TimeFrame};

/// Represents a complete set of time-series data for a single symbol.
///
/// This struct groups a vector of [`Bar`]s with their corresponding symbol
/// and [`TimeFrame`], making the data set self-describing. Bars are kept in
/// ascending timestamp order.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    /// The symbol this data represents (e.g., "WIN$N", "PETR4").
    pub symbol: String,
    /// The time interval for each bar in the series.
    pub timeframe: TimeFrame,
    /// The collection of OHLCV bars, oldest first.
    pub bars: Vec<Bar>,
}

impl BarSeries {
    /// Builds a series, sorting `bars` chronologically.
    pub fn new(symbol: impl Into<String>, timeframe: TimeFrame, mut bars: Vec<Bar>) -> Self {
        bars.sort_by_key(|bar| bar.timestamp);
        Self {
            symbol: symbol.into(),
            timeframe,
            bars,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }
}
