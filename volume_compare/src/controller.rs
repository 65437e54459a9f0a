//! Invocation boundary: acquire bars, compare, and fold every failure into a message.

use chrono::DateTime;
use chrono_tz::Tz;
use market_data::{fetch_recent_bars, models::bar::VolumeKind, providers::DataProvider};
use tracing::{error, info};

use crate::{
    comparison::{ComparisonResult, compare},
    errors::ComparisonError,
};

/// What the caller asked to compare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonRequest {
    pub symbol: String,
    pub days: u32,
    pub volume: VolumeKind,
}

/// Result of one invocation, ready to be rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Comparison(ComparisonResult),
    Failure { message: String },
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure { .. })
    }
}

/// Runs one comparison against `provider` for the session containing `now`.
///
/// Never fails: errors are logged in full and reduced to their display message.
pub fn obtain_comparison<P>(provider: &P, request: &ComparisonRequest, now: DateTime<Tz>) -> Outcome
where
    P: DataProvider + ?Sized,
{
    match run(provider, request, now) {
        Ok(result) => {
            info!(
                symbol = %result.symbol,
                last_session = %result.last_session,
                "volume comparison ready"
            );
            Outcome::Comparison(result)
        }
        Err(err) => {
            error!(symbol = %request.symbol, error = ?err, "volume comparison failed");
            Outcome::Failure {
                message: err.to_string(),
            }
        }
    }
}

fn run<P>(
    provider: &P,
    request: &ComparisonRequest,
    now: DateTime<Tz>,
) -> Result<ComparisonResult, ComparisonError>
where
    P: DataProvider + ?Sized,
{
    if request.days < 1 {
        return Err(ComparisonError::InvalidArgument(format!(
            "number of days must be at least 1, got {}",
            request.days
        )));
    }
    let bars = fetch_recent_bars(provider, &request.symbol, request.days, now)?;
    compare(&bars, request.days, request.volume, now)
}
