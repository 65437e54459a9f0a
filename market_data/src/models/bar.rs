//! Canonical in-memory representation of a one-interval OHLCV bar.
//!
//! This struct is the standard output of every
//! [`DataProvider`](crate::providers::DataProvider) implementation, whatever
//! terminal or file the bars came from.

use std::{fmt, str::FromStr};

use chrono::DateTime;
use chrono_tz::Tz;
use thiserror::Error;

/// A single time-series bar (OHLCV) for a given timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// Opening time of the bar, normalized to the configured time zone.
    pub timestamp: DateTime<Tz>,

    /// Opening price.
    pub open: f64,

    /// Highest price during the bar interval.
    pub high: f64,

    /// Lowest price during the bar interval.
    pub low: f64,

    /// Closing price.
    pub close: f64,

    /// Number of ticks during the bar interval. Not all providers supply this.
    pub tick_volume: Option<u64>,

    /// Traded (exchange) volume during the bar interval. Not all providers supply this.
    pub real_volume: Option<u64>,
}

impl Bar {
    /// Returns the volume field selected by `kind`, if the provider supplied it.
    pub fn volume(&self, kind: VolumeKind) -> Option<u64> {
        match kind {
            VolumeKind::Tick => self.tick_volume,
            VolumeKind::Real => self.real_volume,
        }
    }
}

/// Which per-bar volume measure to aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VolumeKind {
    /// Tick count, available for every instrument.
    #[default]
    Tick,
    /// Exchange-reported contracts/shares, only for exchange-traded instruments.
    Real,
}

impl VolumeKind {
    /// Human readable label used in reports.
    pub const fn label(self) -> &'static str {
        match self {
            VolumeKind::Tick => "Tick Volume",
            VolumeKind::Real => "Real Volume",
        }
    }

    /// Name of the bar field this kind reads.
    pub const fn field_name(self) -> &'static str {
        match self {
            VolumeKind::Tick => "tick_volume",
            VolumeKind::Real => "real_volume",
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown volume type {0:?}, expected \"tick\" or \"real\"")]
pub struct UnknownVolumeKindError(pub String);

impl FromStr for VolumeKind {
    type Err = UnknownVolumeKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tick" => Ok(VolumeKind::Tick),
            "real" => Ok(VolumeKind::Real),
            _ => Err(UnknownVolumeKindError(s.to_string())),
        }
    }
}

impl fmt::Display for VolumeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VolumeKind::Tick => f.write_str("tick"),
            VolumeKind::Real => f.write_str("real"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn volume_kind_parses_case_insensitively() {
        assert_eq!("tick".parse::<VolumeKind>().unwrap(), VolumeKind::Tick);
        assert_eq!(" REAL ".parse::<VolumeKind>().unwrap(), VolumeKind::Real);
        assert!("contracts".parse::<VolumeKind>().is_err());
        assert_eq!(VolumeKind::Real.to_string(), "real");
    }

    #[test]
    fn bar_volume_selects_field() {
        let bar = Bar {
            timestamp: chrono_tz::America::Sao_Paulo
                .with_ymd_and_hms(2025, 3, 10, 9, 0, 0)
                .unwrap(),
            open: 1.0,
            high: 2.0,
            low: 0.5,
            close: 1.5,
            tick_volume: Some(42),
            real_volume: None,
        };
        assert_eq!(bar.volume(VolumeKind::Tick), Some(42));
        assert_eq!(bar.volume(VolumeKind::Real), None);
    }
}
