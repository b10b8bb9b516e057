use anyhow::{anyhow, Result};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Method};
use serde::Deserialize;
use serde_json::Value;
use tokio::runtime::Runtime;

use crate::config::Config;
use crate::exchange::signing::signed_query;
use crate::exchange::{ExchangeError, FuturesConnector, OrderRequest};

/// USDⓈ-M futures REST client. Owns a current-thread runtime so every call
/// is a single blocking round trip.
pub struct BinanceFutures {
    client: Client,
    base: String,
    api_secret: String,
    recv_window_ms: u64,
    runtime: Runtime,
}

#[derive(Deserialize, Debug)]
struct BinanceError {
    code: i64,
    msg: String,
}

impl BinanceFutures {
    pub fn new(cfg: &Config) -> Result<Self> {
        let api_key = cfg.api_key.as_ref().ok_or_else(|| anyhow!("missing API_KEY"))?;
        let api_secret = cfg.api_secret.as_ref().ok_or_else(|| anyhow!("missing API_SECRET"))?;

        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(api_key)
            .map_err(|e| anyhow!("API_KEY is not a valid header value: {}", e))?;
        headers.insert("X-MBX-APIKEY", key);

        let client = Client::builder().default_headers(headers).build()?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        Ok(Self {
            client,
            base: cfg.fapi_base().trim_end_matches('/').to_string(),
            api_secret: api_secret.clone(),
            recv_window_ms: cfg.recv_window_ms,
            runtime,
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn timestamp_ms() -> u64 {
        chrono::Utc::now().timestamp_millis() as u64
    }

    async fn signed_async(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Value, ExchangeError> {
        let query = signed_query(params, self.recv_window_ms, Self::timestamp_ms(), &self.api_secret)?;
        let url = format!("{}{}?{}", self.base, path, query);

        let resp = self.client.request(method, &url).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            let err: BinanceError = serde_json::from_str(&body)
                .unwrap_or(BinanceError { code: -1, msg: body.clone() });
            return Err(ExchangeError::Api {
                status: status.as_u16(),
                code: err.code,
                msg: err.msg,
            });
        }

        serde_json::from_str(&body).map_err(|e| ExchangeError::Decode(format!("{}: {}", e, body)))
    }

    async fn ping_async(&self) -> Result<(), ExchangeError> {
        let url = format!("{}/fapi/v1/ping", self.base);
        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ExchangeError::Api { status, code: -1, msg: body });
        }
        Ok(())
    }
}

impl FuturesConnector for BinanceFutures {
    fn create_order(&self, req: &OrderRequest) -> Result<Value, ExchangeError> {
        let params = req.to_params();
        self.runtime
            .block_on(self.signed_async(Method::POST, "/fapi/v1/order", &params))
    }

    fn get_order(&self, symbol: &str, order_id: i64) -> Result<Value, ExchangeError> {
        let params = [("symbol", symbol.to_string()), ("orderId", order_id.to_string())];
        self.runtime
            .block_on(self.signed_async(Method::GET, "/fapi/v1/order", &params))
    }

    fn ping(&self) -> Result<(), ExchangeError> {
        self.runtime.block_on(self.ping_async())
    }
}
