use serde_json::Value;
use thiserror::Error;

mod binance;
pub mod scripted;
pub mod signing;
pub mod types;

pub use binance::BinanceFutures;
pub use types::OrderRequest;

pub const FAPI_PRODUCTION: &str = "https://fapi.binance.com";
pub const FAPI_TESTNET: &str = "https://testnet.binancefuture.com";

/// Anything the exchange side can fail with. The bot never inspects the
/// variant; it logs the error and hands it back as-is.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExchangeError {
    #[error("APIError(code={code}): {msg}")]
    Api { status: u16, code: i64, msg: String },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unreadable response: {0}")]
    Decode(String),
    #[error("signing failed: {0}")]
    Signing(String),
}

impl From<reqwest::Error> for ExchangeError {
    fn from(err: reqwest::Error) -> Self {
        ExchangeError::Transport(err.to_string())
    }
}

/// Blocking seam over the futures REST API.
///
/// Responses are opaque JSON mappings; implementations return them untouched.
pub trait FuturesConnector {
    fn create_order(&self, req: &OrderRequest) -> Result<Value, ExchangeError>;
    fn get_order(&self, symbol: &str, order_id: i64) -> Result<Value, ExchangeError>;
    fn ping(&self) -> Result<(), ExchangeError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Production,
    Testnet,
}

impl Endpoint {
    pub fn from_testnet_flag(use_testnet: bool) -> Self {
        if use_testnet {
            Endpoint::Testnet
        } else {
            Endpoint::Production
        }
    }

    pub fn base_url(&self) -> &'static str {
        match self {
            Endpoint::Production => FAPI_PRODUCTION,
            Endpoint::Testnet => FAPI_TESTNET,
        }
    }
}
