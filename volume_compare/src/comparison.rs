//! Same-time-of-day volume comparison.
//!
//! [`compare`] answers "how much has traded so far today, compared with the same
//! time on the previous session and on average over the last few sessions?".
//!
//! Bars are grouped by calendar date in the zone of `now`. For every date two sums
//! of the selected volume field are kept: the full-day sum and the sum of bars
//! opened at or before the current time of day (the cutoff). A date is a valid
//! session iff its full-day sum is positive, so holidays and closures reported
//! with zero volume never count as sessions. Comparisons always use cutoff sums,
//! validity always uses full-day sums: a session that opened after the cutoff is
//! still valid and simply contributes zero.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveTime};
use chrono_tz::Tz;
use market_data::models::{bar::VolumeKind, bar_series::BarSeries};
use tracing::debug;

use crate::errors::ComparisonError;

/// Outcome of a successful comparison. Values are ready for presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonResult {
    pub symbol: String,
    /// Time of day the comparison was cut at, `HH:MM`.
    pub current_time: String,
    pub volume: VolumeKind,
    /// Number of sessions requested for the average.
    pub days: u32,
    pub vol_today: f64,
    pub vol_last_session: f64,
    pub vol_average: f64,
    pub perc_vs_last_session: f64,
    pub perc_vs_average: f64,
    /// Date of the session `vol_last_session` was taken from.
    pub last_session: NaiveDate,
}

#[derive(Debug, Default, Clone, Copy)]
struct TradingDay {
    full: u64,
    until_cutoff: u64,
}

impl TradingDay {
    fn is_valid(&self) -> bool {
        self.full > 0
    }
}

/// Compares today's volume up to `now` against previous sessions.
///
/// # Errors
///
/// * [`ComparisonError::InvalidArgument`] if `days` is 0.
/// * [`ComparisonError::NoData`] if `series` has no bars.
/// * [`ComparisonError::MissingVolumeField`] if a bar lacks the `volume` field.
/// * [`ComparisonError::NoPriorSession`] if no date before today has volume.
pub fn compare(
    series: &BarSeries,
    days: u32,
    volume: VolumeKind,
    now: DateTime<Tz>,
) -> Result<ComparisonResult, ComparisonError> {
    if days < 1 {
        return Err(ComparisonError::InvalidArgument(format!(
            "number of days must be at least 1, got {days}"
        )));
    }
    if series.is_empty() {
        return Err(ComparisonError::NoData {
            symbol: series.symbol.clone(),
        });
    }

    let today = now.date_naive();
    let sessions = partition_by_day(series, volume, &now.timezone(), now.time())?;
    let prior = || sessions.range(..today).rev();

    let vol_today = sessions.get(&today).map_or(0, |day| day.until_cutoff);

    let (last_session, last) = prior()
        .find(|(_, day)| day.is_valid())
        .ok_or_else(|| ComparisonError::NoPriorSession {
            symbol: series.symbol.clone(),
        })?;

    let pool: Vec<f64> = prior()
        .take(days as usize)
        .filter(|(_, day)| day.is_valid())
        .map(|(_, day)| day.until_cutoff as f64)
        .collect();
    let vol_average = if pool.is_empty() {
        0.0
    } else {
        pool.iter().sum::<f64>() / pool.len() as f64
    };

    let vol_today = vol_today as f64;
    let vol_last_session = last.until_cutoff as f64;

    debug!(
        symbol = %series.symbol,
        dates = sessions.len(),
        %last_session,
        pool = pool.len(),
        "volume comparison computed"
    );

    Ok(ComparisonResult {
        symbol: series.symbol.clone(),
        current_time: now.format("%H:%M").to_string(),
        volume,
        days,
        vol_today,
        vol_last_session,
        vol_average,
        perc_vs_last_session: percent_change(vol_today, vol_last_session),
        perc_vs_average: percent_change(vol_today, vol_average),
        last_session: *last_session,
    })
}

fn partition_by_day(
    series: &BarSeries,
    volume: VolumeKind,
    tz: &Tz,
    cutoff: NaiveTime,
) -> Result<BTreeMap<NaiveDate, TradingDay>, ComparisonError> {
    let mut sessions: BTreeMap<NaiveDate, TradingDay> = BTreeMap::new();
    for bar in &series.bars {
        let amount = bar
            .volume(volume)
            .ok_or_else(|| ComparisonError::MissingVolumeField {
                symbol: series.symbol.clone(),
                volume,
            })?;
        let local = bar.timestamp.with_timezone(tz);
        let day = sessions.entry(local.date_naive()).or_default();
        day.full = day.full.saturating_add(amount);
        if local.time() <= cutoff {
            day.until_cutoff = day.until_cutoff.saturating_add(amount);
        }
    }
    Ok(sessions)
}

/// Relative change in percent; 0 when there is nothing to compare against.
fn percent_change(current: f64, reference: f64) -> f64 {
    if reference > 0.0 {
        (current - reference) / reference * 100.0
    } else {
        0.0
    }
}
