//! Picks the bar source named by the configuration.

use market_data::providers::{
    DataProvider, ProviderInitError, csv_replay::CsvTerminal,
    terminal::provider::TerminalProvider, terminal_bridge::BridgeTerminal,
};
use tracing::info;

use crate::config::{Settings, TerminalSettings};

pub fn build_provider(settings: &Settings) -> Result<Box<dyn DataProvider>, ProviderInitError> {
    match &settings.terminal {
        TerminalSettings::Bridge { url, page_limit } => {
            info!(%url, page_limit, "using terminal bridge");
            let terminal = BridgeTerminal::new(url, *page_limit)?;
            Ok(Box::new(TerminalProvider::new(terminal)))
        }
        TerminalSettings::Csv {
            path,
            symbol,
            page_limit,
        } => {
            info!(path = %path.display(), page_limit, "replaying rates export");
            let symbol = symbol.as_deref().unwrap_or(&settings.symbol);
            let terminal = CsvTerminal::new(path, symbol, *page_limit)?;
            Ok(Box::new(TerminalProvider::new(terminal)))
        }
    }
}
