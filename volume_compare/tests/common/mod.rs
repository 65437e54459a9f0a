#![allow(dead_code)]

use std::cell::RefCell;

use chrono::{DateTime, TimeZone};
use chrono_tz::{America::Sao_Paulo, Tz};
use market_data::{
    models::{
        bar::Bar, bar_series::BarSeries, request_params::BarsRequestParams, timeframe::TimeFrame,
    },
    providers::{
        ConnectionSnafu, DataProvider, NoDataSnafu, ProviderError, terminal::TerminalError,
    },
};
use snafu::ResultExt;

pub const SYMBOL: &str = "WIN$N";

/// A São Paulo wall-clock instant in March 2025.
pub fn at(day: u32, hour: u32, minute: u32) -> DateTime<Tz> {
    Sao_Paulo
        .with_ymd_and_hms(2025, 3, day, hour, minute, 0)
        .unwrap()
}

/// A one-minute bar whose real volume is ten times its tick volume.
pub fn bar(day: u32, hour: u32, minute: u32, tick: u64) -> Bar {
    Bar {
        timestamp: at(day, hour, minute),
        open: 128_000.0,
        high: 128_050.0,
        low: 127_950.0,
        close: 128_020.0,
        tick_volume: Some(tick),
        real_volume: Some(tick * 10),
    }
}

pub fn series(bars: Vec<Bar>) -> BarSeries {
    BarSeries::new(SYMBOL, TimeFrame::minute(), bars)
}

/// One prior session cut at 10:00 with 1000 ticks (5000 over the day) and 1200
/// ticks today by 10:00.
pub fn one_prior_session() -> BarSeries {
    series(vec![
        bar(13, 9, 0, 600),
        bar(13, 9, 30, 400),
        bar(13, 15, 0, 4000),
        bar(14, 9, 0, 700),
        bar(14, 9, 45, 500),
    ])
}

pub enum Reply {
    Bars(BarSeries),
    NoData,
    ConnectionRefused,
}

/// Provider answering every request with the same scripted reply.
pub struct StubProvider {
    reply: Reply,
    pub requests: RefCell<Vec<BarsRequestParams>>,
}

impl StubProvider {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn with_bars(series: BarSeries) -> Self {
        Self::new(Reply::Bars(series))
    }
}

impl DataProvider for StubProvider {
    fn fetch_bars(&self, params: &BarsRequestParams) -> Result<BarSeries, ProviderError> {
        self.requests.borrow_mut().push(params.clone());
        match &self.reply {
            Reply::Bars(series) => Ok(series.clone()),
            Reply::NoData => NoDataSnafu {
                symbol: &params.symbol,
            }
            .fail(),
            Reply::ConnectionRefused => Err(TerminalError::Call {
                code: -10004,
                message: "No IPC connection".to_string(),
            })
            .context(ConnectionSnafu),
        }
    }
}
