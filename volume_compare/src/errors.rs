use market_data::{models::bar::VolumeKind, providers::ProviderError};
use thiserror::Error;

/// Why a volume comparison could not be produced.
///
/// A comparison either succeeds completely or yields exactly one of these; there
/// is no partially filled result.
#[derive(Debug, Error)]
pub enum ComparisonError {
    /// A caller-supplied argument is out of range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The bar series handed to the aggregator is empty.
    #[error("No bars available for {symbol}")]
    NoData { symbol: String },

    /// Bars could not be acquired from the terminal.
    #[error(transparent)]
    Acquisition(#[from] ProviderError),

    /// No day before today has any volume (e.g. a newly listed instrument).
    #[error("Could not find a valid trading session for {symbol} before today")]
    NoPriorSession { symbol: String },

    /// The bars do not carry the requested volume measure.
    #[error("Volume field '{}' not found in the data for symbol {symbol}", .volume.field_name())]
    MissingVolumeField { symbol: String, volume: VolumeKind },
}
