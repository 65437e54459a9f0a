#![allow(dead_code)]

use std::cell::{Cell, RefCell};

use chrono::{DateTime, Utc};
use market_data::{
    models::timeframe::TimeFrame,
    providers::terminal::{Rate, Terminal, TerminalError},
};

/// Every call the provider made, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Initialize,
    Shutdown,
    Select(String),
    Range { from: i64, to: i64 },
    Before { before: i64, count: usize },
}

/// In-memory terminal with a per-request cap and switchable failures.
pub struct ScriptedTerminal {
    pub rates: Vec<Rate>,
    pub page_limit: usize,
    pub symbol: String,
    pub fail_initialize: bool,
    pub fail_shutdown: bool,
    pub fail_requests: bool,
    pub calls: RefCell<Vec<Call>>,
    pub connected: Cell<bool>,
}

impl ScriptedTerminal {
    pub fn new(symbol: &str, rates: Vec<Rate>, page_limit: usize) -> Self {
        Self {
            rates,
            page_limit,
            symbol: symbol.to_string(),
            fail_initialize: false,
            fail_shutdown: false,
            fail_requests: false,
            calls: RefCell::new(Vec::new()),
            connected: Cell::new(false),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn shutdowns(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| **call == Call::Shutdown)
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl Terminal for ScriptedTerminal {
    fn initialize(&self) -> Result<(), TerminalError> {
        self.record(Call::Initialize);
        if self.fail_initialize {
            return Err(TerminalError::Call {
                code: -10003,
                message: "IPC initialize failed".to_string(),
            });
        }
        self.connected.set(true);
        Ok(())
    }

    fn shutdown(&self) -> Result<(), TerminalError> {
        self.record(Call::Shutdown);
        self.connected.set(false);
        if self.fail_shutdown {
            return Err(TerminalError::Call {
                code: -10004,
                message: "IPC shutdown failed".to_string(),
            });
        }
        Ok(())
    }

    fn select_symbol(&self, symbol: &str) -> Result<(), TerminalError> {
        self.record(Call::Select(symbol.to_string()));
        if symbol == self.symbol {
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
        self.record(Call::Range {
            from: from.timestamp(),
            to: to.timestamp(),
        });
        if self.fail_requests {
            return Err(TerminalError::Call {
                code: -1,
                message: "generic fail".to_string(),
            });
        }
        let window: Vec<Rate> = self
            .rates
            .iter()
            .filter(|rate| (from.timestamp()..=to.timestamp()).contains(&rate.time))
            .cloned()
            .collect();
        if window.len() > self.page_limit {
            return Err(TerminalError::RequestLimit {
                limit: self.page_limit,
            });
        }
        Ok(window)
    }

    fn copy_rates_before(
        &self,
        _symbol: &str,
        _timeframe: TimeFrame,
        before: DateTime<Utc>,
        count: usize,
    ) -> Result<Vec<Rate>, TerminalError> {
        self.record(Call::Before {
            before: before.timestamp(),
            count,
        });
        if self.fail_requests {
            return Err(TerminalError::Call {
                code: -1,
                message: "generic fail".to_string(),
            });
        }
        let end = self
            .rates
            .partition_point(|rate| rate.time < before.timestamp());
        Ok(self.rates[end.saturating_sub(count)..end].to_vec())
    }
}

pub fn rate(time: i64, tick_volume: u64) -> Rate {
    Rate {
        time,
        open: 100.0,
        high: 101.0,
        low: 99.0,
        close: 100.5,
        tick_volume: Some(tick_volume),
        spread: Some(1),
        real_volume: Some(tick_volume * 10),
    }
}

/// One rate per minute for `count` minutes starting at `start` (epoch seconds).
pub fn minute_rates(start: i64, count: i64) -> Vec<Rate> {
    (0..count).map(|i| rate(start + i * 60, 1)).collect()
}
