use chrono::{DateTime, Utc};
use reqwest::{
    Url,
    blocking::{Client, RequestBuilder},
    header::{self, HeaderMap, HeaderValue},
};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::json;
use shared_utils::env::optional_env_var;
use snafu::{ResultExt, ensure};
use tracing::debug;

use crate::{
    models::timeframe::TimeFrame,
    providers::{
        ClientBuildSnafu, InvalidPageLimitSnafu, InvalidTokenSnafu, InvalidUrlSnafu,
        ProviderInitError,
        terminal::{Rate, Terminal, TerminalError},
    },
};

use super::response::{BridgeReply, INVALID_PARAMS};

pub const DEFAULT_BRIDGE_URL: &str = "http://127.0.0.1:8228";

/// Environment variable holding the optional bridge bearer token.
pub const TOKEN_ENV_VAR: &str = "MT_BRIDGE_TOKEN";

pub struct BridgeTerminal {
    client: Client,
    base_url: Url,
    page_limit: usize,
    _token: Option<SecretString>,
}

impl BridgeTerminal {
    /// Creates a bridge client for `base_url`.
    ///
    /// Reads the bearer token from the `MT_BRIDGE_TOKEN` environment variable when
    /// it is set.
    pub fn new(base_url: &str, page_limit: usize) -> Result<Self, ProviderInitError> {
        let token = optional_env_var(TOKEN_ENV_VAR).map(|token| SecretString::new(token.into()));
        Self::with_token(base_url, page_limit, token)
    }

    pub fn with_token(
        base_url: &str,
        page_limit: usize,
        token: Option<SecretString>,
    ) -> Result<Self, ProviderInitError> {
        ensure!(page_limit > 0, InvalidPageLimitSnafu { limit: page_limit });

        let parsed = Url::parse(base_url).map_err(|err| {
            InvalidUrlSnafu {
                url: base_url,
                message: err.to_string(),
            }
            .build()
        })?;

        let mut headers = HeaderMap::new();
        if let Some(token) = &token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .context(InvalidTokenSnafu)?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .context(ClientBuildSnafu)?;

        Ok(Self {
            client,
            base_url: parsed,
            page_limit,
            _token: token,
        })
    }

    pub fn page_limit(&self) -> usize {
        self.page_limit
    }

    fn endpoint(&self, path: &str) -> Result<Url, TerminalError> {
        self.base_url
            .join(path)
            .map_err(|err| TerminalError::Malformed(format!("bad endpoint {path}: {err}")))
    }

    fn call<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, TerminalError> {
        let response = request.send()?;
        let status = response.status();
        let body = response.text()?;

        let reply = serde_json::from_str::<BridgeReply<T>>(&body);
        if !status.is_success() {
            // Prefer the terminal's own fault; otherwise report the HTTP status.
            return match reply {
                Ok(BridgeReply {
                    error: Some(fault), ..
                }) => Err(TerminalError::Call {
                    code: fault.code,
                    message: fault.message,
                }),
                _ => Err(TerminalError::Call {
                    code: i32::from(status.as_u16()),
                    message: body,
                }),
            };
        }
        reply
            .map_err(|err| TerminalError::Malformed(err.to_string()))?
            .into_result()
    }

    fn acknowledge(&self, path: &str) -> Result<(), TerminalError> {
        let accepted: bool = self.call(self.client.post(self.endpoint(path)?))?;
        if accepted {
            Ok(())
        } else {
            Err(TerminalError::Call {
                code: -1,
                message: format!("terminal refused {path}"),
            })
        }
    }

    fn rates(&self, path: &str, query: &[(&str, String)]) -> Result<Vec<Rate>, TerminalError> {
        let request = self.client.get(self.endpoint(path)?).query(query);
        self.call(request)
    }
}

impl Terminal for BridgeTerminal {
    fn initialize(&self) -> Result<(), TerminalError> {
        debug!(url = %self.base_url, "initializing terminal through bridge");
        self.acknowledge("initialize")
    }

    fn shutdown(&self) -> Result<(), TerminalError> {
        self.acknowledge("shutdown")
    }

    fn select_symbol(&self, symbol: &str) -> Result<(), TerminalError> {
        let request = self
            .client
            .post(self.endpoint("symbol_select")?)
            .json(&json!({ "symbol": symbol, "enable": true }));
        match self.call::<bool>(request) {
            Ok(true) => Ok(()),
            Ok(false) => Err(TerminalError::UnknownSymbol(symbol.to_string())),
            Err(TerminalError::Call { .. }) => Err(TerminalError::UnknownSymbol(symbol.to_string())),
            Err(err) => Err(err),
        }
    }

    fn copy_rates_range(
        &self,
        symbol: &str,
        timeframe: TimeFrame,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Rate>, TerminalError> {
        let query = [
            ("symbol", symbol.to_string()),
            ("timeframe", timeframe.code()),
            ("date_from", from.timestamp().to_string()),
            ("date_to", to.timestamp().to_string()),
        ];
        match self.rates("rates/range", &query) {
            Err(TerminalError::Call { code, .. }) if code == INVALID_PARAMS => {
                Err(TerminalError::RequestLimit {
                    limit: self.page_limit,
                })
            }
            other => other,
        }
    }

    fn copy_rates_before(
        &self,
        symbol: &str,
        timeframe: TimeFrame,
        before: DateTime<Utc>,
        count: usize,
    ) -> Result<Vec<Rate>, TerminalError> {
        // The terminal includes the bar opened at `date_from`.
        let query = [
            ("symbol", symbol.to_string()),
            ("timeframe", timeframe.code()),
            ("date_from", (before.timestamp() - 1).to_string()),
            ("count", count.to_string()),
        ];
        self.rates("rates/from", &query)
    }
}
