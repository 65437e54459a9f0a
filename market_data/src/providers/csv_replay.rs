//! Terminal replay of a rates export.
//!
//! [`CsvTerminal`] serves bars from a CSV file written by a terminal's export
//! (`time,open,high,low,close,tick_volume,spread,real_volume`, `time` in epoch
//! seconds). It enforces the same per-request bar cap as a live terminal, so the
//! provider pages through it exactly as it would against the real thing. Volume
//! columns may be missing or empty; they then read as `None`.

use std::{cell::RefCell, path::PathBuf};

use chrono::{DateTime, Utc};
use snafu::ensure;
use tracing::debug;

use crate::{
    models::timeframe::TimeFrame,
    providers::{
        InvalidPageLimitSnafu, ProviderInitError,
        terminal::{Rate, Terminal, TerminalError},
    },
};

pub struct CsvTerminal {
    path: PathBuf,
    symbol: String,
    page_limit: usize,
    rates: RefCell<Option<Vec<Rate>>>,
}

impl CsvTerminal {
    /// A replay of `path`, which holds the bars of `symbol` in a single timeframe.
    pub fn new(
        path: impl Into<PathBuf>,
        symbol: impl Into<String>,
        page_limit: usize,
    ) -> Result<Self, ProviderInitError> {
        ensure!(page_limit > 0, InvalidPageLimitSnafu { limit: page_limit });
        Ok(Self {
            path: path.into(),
            symbol: symbol.into(),
            page_limit,
            rates: RefCell::new(None),
        })
    }

    pub fn is_connected(&self) -> bool {
        self.rates.borrow().is_some()
    }

    fn with_rates<R>(&self, f: impl FnOnce(&[Rate]) -> R) -> Result<R, TerminalError> {
        let loaded = self.rates.borrow();
        let rates = loaded.as_deref().ok_or(TerminalError::NotConnected)?;
        Ok(f(rates))
    }
}

impl Terminal for CsvTerminal {
    fn initialize(&self) -> Result<(), TerminalError> {
        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut rates = reader
            .deserialize::<Rate>()
            .collect::<Result<Vec<_>, _>>()?;
        rates.sort_by_key(|rate| rate.time);
        debug!(path = %self.path.display(), rates = rates.len(), "loaded rates export");
        *self.rates.borrow_mut() = Some(rates);
        Ok(())
    }

    fn shutdown(&self) -> Result<(), TerminalError> {
        self.rates
            .borrow_mut()
            .take()
            .map(|_| ())
            .ok_or(TerminalError::NotConnected)
    }

    fn select_symbol(&self, symbol: &str) -> Result<(), TerminalError> {
        self.with_rates(|_| ())?;
        if symbol.eq_ignore_ascii_case(&self.symbol) {
            Ok(())
        } else {
            Err(TerminalError::UnknownSymbol(symbol.to_string()))
        }
    }

    fn copy_rates_range(
        &self,
        _symbol: &str,
        _timeframe: TimeFrame,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Rate>, TerminalError> {
        let window = from.timestamp()..=to.timestamp();
        let rates = self.with_rates(|rates| {
            rates
                .iter()
                .filter(|rate| window.contains(&rate.time))
                .cloned()
                .collect::<Vec<_>>()
        })?;
        if rates.len() > self.page_limit {
            return Err(TerminalError::RequestLimit {
                limit: self.page_limit,
            });
        }
        Ok(rates)
    }

    fn copy_rates_before(
        &self,
        _symbol: &str,
        _timeframe: TimeFrame,
        before: DateTime<Utc>,
        count: usize,
    ) -> Result<Vec<Rate>, TerminalError> {
        let count = count.min(self.page_limit);
        self.with_rates(|rates| {
            let end = rates.partition_point(|rate| rate.time < before.timestamp());
            rates[end.saturating_sub(count)..end].to_vec()
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use chrono::TimeZone;
    use tempfile::NamedTempFile;

    use super::*;

    fn export(rows: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "time,open,high,low,close,tick_volume,spread,real_volume").unwrap();
        write!(file, "{rows}").unwrap();
        file
    }

    #[test]
    fn calls_before_initialize_fail() {
        let file = export("");
        let terminal = CsvTerminal::new(file.path(), "WIN$N", 10).unwrap();
        assert!(matches!(
            terminal.select_symbol("WIN$N"),
            Err(TerminalError::NotConnected)
        ));
        assert!(matches!(terminal.shutdown(), Err(TerminalError::NotConnected)));
    }

    #[test]
    fn loads_sorted_rates_and_blank_volumes() {
        let file = export("120,1,1,1,1,3,1,\n60,1,1,1,1,2,1,40\n");
        let terminal = CsvTerminal::new(file.path(), "WIN$N", 10).unwrap();
        terminal.initialize().unwrap();

        let rates = terminal
            .copy_rates_range(
                "WIN$N",
                TimeFrame::minute(),
                Utc.timestamp_opt(0, 0).unwrap(),
                Utc.timestamp_opt(600, 0).unwrap(),
            )
            .unwrap();
        assert_eq!(rates.iter().map(|r| r.time).collect::<Vec<_>>(), vec![60, 120]);
        assert_eq!(rates[0].real_volume, Some(40));
        assert_eq!(rates[1].real_volume, None);

        terminal.shutdown().unwrap();
        assert!(!terminal.is_connected());
    }

    #[test]
    fn range_over_limit_signals_request_limit() {
        let file = export("60,1,1,1,1,1,1,1\n120,1,1,1,1,1,1,1\n180,1,1,1,1,1,1,1\n");
        let terminal = CsvTerminal::new(file.path(), "WIN$N", 2).unwrap();
        terminal.initialize().unwrap();

        let err = terminal
            .copy_rates_range(
                "WIN$N",
                TimeFrame::minute(),
                Utc.timestamp_opt(0, 0).unwrap(),
                Utc.timestamp_opt(600, 0).unwrap(),
            )
            .unwrap_err();
        assert!(matches!(err, TerminalError::RequestLimit { limit: 2 }));

        let page = terminal
            .copy_rates_before("WIN$N", TimeFrame::minute(), Utc.timestamp_opt(180, 0).unwrap(), 5)
            .unwrap();
        assert_eq!(page.iter().map(|r| r.time).collect::<Vec<_>>(), vec![60, 120]);
    }

    #[test]
    fn unknown_symbol_is_rejected() {
        let file = export("60,1,1,1,1,1,1,1\n");
        let terminal = CsvTerminal::new(file.path(), "WIN$N", 10).unwrap();
        terminal.initialize().unwrap();
        assert!(terminal.select_symbol("win$n").is_ok());
        assert!(matches!(
            terminal.select_symbol("PETR4"),
            Err(TerminalError::UnknownSymbol(symbol)) if symbol == "PETR4"
        ));
    }
}
