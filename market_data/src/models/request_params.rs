use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;

use crate::models::timeframe::TimeFrame;

/// Extra calendar days requested on top of the wanted number of sessions, so that
/// weekends and holidays inside the window still leave enough trading days.
pub const WINDOW_MARGIN_DAYS: i64 = 10;

/// Parameters for requesting time-series bar data from a [`DataProvider`](crate::providers::DataProvider).
#[derive(Clone, Debug, PartialEq)]
pub struct BarsRequestParams {
    /// Symbol to request as the terminal knows it (e.g. `"WIN$N"`).
    pub symbol: String,

    /// The time interval for each bar. Validation of allowed values is performed
    /// by each provider implementation.
    pub timeframe: TimeFrame,

    /// Start of the requested time range (inclusive, UTC).
    pub start: DateTime<Utc>,

    /// End of the requested time range (inclusive, UTC).
    pub end: DateTime<Utc>,

    /// Zone the returned bar timestamps are normalized to.
    pub timezone: Tz,
}

impl BarsRequestParams {
    /// One-minute bars covering `days` sessions plus [`WINDOW_MARGIN_DAYS`] up to `now`.
    ///
    /// The normalization zone is taken from `now`.
    pub fn lookback(symbol: impl Into<String>, days: u32, now: DateTime<Tz>) -> Self {
        let end = now.with_timezone(&Utc);
        let start = end - Duration::days(i64::from(days) + WINDOW_MARGIN_DAYS);
        Self {
            symbol: symbol.into(),
            timeframe: TimeFrame::minute(),
            start,
            end,
            timezone: now.timezone(),
        }
    }
}
