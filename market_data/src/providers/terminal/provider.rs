use chrono::{DateTime, TimeDelta};
use snafu::{OptionExt, ResultExt, ensure};
use tracing::debug;

use crate::{
    models::{bar_series::BarSeries, request_params::BarsRequestParams},
    providers::{
        ConnectionSnafu, DataProvider, InternalSnafu, NoDataSnafu, ProviderError, RequestSnafu,
        SymbolUnavailableSnafu, ValidationSnafu,
    },
};

use super::{Rate, Terminal, TerminalError, session::TerminalSession};

/// [`DataProvider`] backed by a trading [`Terminal`].
///
/// Every fetch opens its own terminal session and releases it before returning.
/// The whole window is asked for in one request first; when the terminal answers
/// that the window is over its per-request cap, the window is walked backwards
/// from `end` one page at a time.
pub struct TerminalProvider<T> {
    terminal: T,
}

impl<T: Terminal> TerminalProvider<T> {
    pub fn new(terminal: T) -> Self {
        Self { terminal }
    }

    pub fn terminal(&self) -> &T {
        &self.terminal
    }
}

impl<T: Terminal> DataProvider for TerminalProvider<T> {
    fn fetch_bars(&self, params: &BarsRequestParams) -> Result<BarSeries, ProviderError> {
        ensure!(
            params.start < params.end,
            ValidationSnafu {
                message: format!(
                    "window start {} must precede its end {}",
                    params.start, params.end
                ),
            }
        );

        let session = TerminalSession::open(&self.terminal).context(ConnectionSnafu)?;
        session
            .select_symbol(&params.symbol)
            .context(SymbolUnavailableSnafu {
                symbol: &params.symbol,
            })?;

        let rates = collect_rates(&*session, params)?;
        into_series(rates, params)
    }
}

fn collect_rates<T: Terminal + ?Sized>(
    terminal: &T,
    params: &BarsRequestParams,
) -> Result<Vec<Rate>, ProviderError> {
    match terminal.copy_rates_range(&params.symbol, params.timeframe, params.start, params.end) {
        Ok(rates) => Ok(rates),
        Err(TerminalError::RequestLimit { limit }) => {
            debug!(
                symbol = %params.symbol,
                limit,
                "window exceeds the terminal request limit, paging backwards"
            );
            page_backwards(terminal, params, limit)
        }
        Err(source) => Err(source).context(RequestSnafu {
            symbol: &params.symbol,
        }),
    }
}

/// Walks from `params.end` towards `params.start`, `limit` bars at a time.
///
/// The window end is inclusive, so the first page is bounded one second past it.
/// The oldest bar of each page is the exclusive upper bound of the next one. A
/// short page means the terminal has no older history.
fn page_backwards<T: Terminal + ?Sized>(
    terminal: &T,
    params: &BarsRequestParams,
    limit: usize,
) -> Result<Vec<Rate>, ProviderError> {
    ensure!(
        limit > 0,
        InternalSnafu {
            message: "terminal reported a request limit of zero bars",
        }
    );

    let start = params.start.timestamp();
    let mut upper = params.end + TimeDelta::seconds(1);
    let mut rates = Vec::new();
    let mut pages = 0_usize;

    loop {
        let page = terminal
            .copy_rates_before(&params.symbol, params.timeframe, upper, limit)
            .context(RequestSnafu {
                symbol: &params.symbol,
            })?;
        pages += 1;

        let Some(oldest) = page.iter().map(|rate| rate.time).min() else {
            break;
        };
        ensure!(
            oldest < upper.timestamp(),
            InternalSnafu {
                message: format!("page {pages} did not reach before {upper}"),
            }
        );

        let short_page = page.len() < limit;
        rates.extend(page);
        if short_page || oldest <= start {
            break;
        }
        upper = DateTime::from_timestamp(oldest, 0).with_context(|| InternalSnafu {
            message: format!("bar time {oldest} is out of range"),
        })?;
    }

    debug!(symbol = %params.symbol, pages, rates = rates.len(), "paging finished");
    Ok(rates)
}

fn into_series(rates: Vec<Rate>, params: &BarsRequestParams) -> Result<BarSeries, ProviderError> {
    let window = params.start.timestamp()..=params.end.timestamp();
    let mut rates: Vec<Rate> = rates
        .into_iter()
        .filter(|rate| window.contains(&rate.time))
        .collect();
    rates.sort_by_key(|rate| rate.time);
    rates.dedup_by_key(|rate| rate.time);

    ensure!(
        !rates.is_empty(),
        NoDataSnafu {
            symbol: &params.symbol,
        }
    );

    let bars = rates
        .into_iter()
        .map(|rate| {
            let time = rate.time;
            rate.into_bar(&params.timezone).with_context(|| InternalSnafu {
                message: format!("bar time {time} is out of range"),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(BarSeries::new(params.symbol.clone(), params.timeframe, bars))
}
