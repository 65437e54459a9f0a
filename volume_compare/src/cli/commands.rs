use std::path::PathBuf;

use clap::{ArgAction, Parser};
use market_data::models::bar::VolumeKind;

use crate::{config::Settings, controller::ComparisonRequest};

/// Compares today's volume with the last session and the recent average at the
/// same time of day.
#[derive(Debug, Parser)]
#[command(name = "volume-compare", author, version, about)]
pub struct Cli {
    /// Asset symbol (e.g. WIN$N). Defaults to the configured symbol
    #[arg(short, long)]
    pub symbol: Option<String>,

    /// Number of sessions to average over
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub days: Option<u32>,

    /// Volume type: tick or real
    #[arg(long)]
    pub volume: Option<VolumeKind>,

    /// Path to a TOML config file. Falls back to $VOLUME_COMPARE_CONFIG
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the configured timezone and exit
    #[arg(long)]
    pub show_tz: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Command-line values over configured defaults.
    pub fn request(&self, settings: &Settings) -> ComparisonRequest {
        ComparisonRequest {
            symbol: self
                .symbol
                .clone()
                .unwrap_or_else(|| settings.symbol.clone()),
            days: self.days.unwrap_or(settings.days_average),
            volume: self.volume.unwrap_or(settings.volume),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::FileConfig;

    use super::*;

    fn settings() -> Settings {
        Settings::resolve(FileConfig::default(), |_| None).unwrap()
    }

    #[test]
    fn defaults_come_from_settings() {
        let cli = Cli::try_parse_from(["volume-compare"]).unwrap();
        assert_eq!(
            cli.request(&settings()),
            ComparisonRequest {
                symbol: "WIN$N".to_string(),
                days: 5,
                volume: VolumeKind::Tick,
            }
        );
        assert!(!cli.show_tz);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn flags_override_settings() {
        let cli = Cli::try_parse_from([
            "volume-compare",
            "-s",
            "PETR4",
            "--days",
            "10",
            "--volume",
            "REAL",
            "-vv",
        ])
        .unwrap();
        let request = cli.request(&settings());
        assert_eq!(request.symbol, "PETR4");
        assert_eq!(request.days, 10);
        assert_eq!(request.volume, VolumeKind::Real);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn zero_days_is_rejected() {
        assert!(Cli::try_parse_from(["volume-compare", "--days", "0"]).is_err());
        assert!(Cli::try_parse_from(["volume-compare", "--days", "-3"]).is_err());
    }

    #[test]
    fn unknown_volume_is_rejected() {
        assert!(Cli::try_parse_from(["volume-compare", "--volume", "notional"]).is_err());
    }

    #[test]
    fn definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
