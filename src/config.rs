use std::path::PathBuf;

use crate::exchange::Endpoint;
use crate::logging::{Level, LogFormat};

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub use_testnet: bool,
    /// Explicit base URL; wins over `use_testnet` when set.
    pub fapi_base_override: Option<String>,
    pub recv_window_ms: u64,
    pub log: LogConfig,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub path: PathBuf,
    pub level: Level,
    pub format: LogFormat,
    pub console: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("trading_bot.log"),
            level: Level::Info,
            format: LogFormat::Text,
            console: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_secret: None,
            use_testnet: true,
            fapi_base_override: None,
            recv_window_ms: 5000,
            log: LogConfig::default(),
        }
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    match std::env::var(name).as_deref().map(str::to_ascii_lowercase).as_deref() {
        Ok("1") | Ok("true") | Ok("yes") | Ok("on") => true,
        Ok("0") | Ok("false") | Ok("no") | Ok("off") => false,
        _ => default,
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = LogConfig::default();
        Self {
            api_key: std::env::var("API_KEY").ok().filter(|v| !v.is_empty()),
            api_secret: std::env::var("API_SECRET").ok().filter(|v| !v.is_empty()),
            use_testnet: env_flag("USE_TESTNET", true),
            fapi_base_override: std::env::var("BINANCE_FAPI_BASE").ok().filter(|v| !v.is_empty()),
            recv_window_ms: std::env::var("RECV_WINDOW_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(5000),
            log: LogConfig {
                path: std::env::var("LOG_FILE").map(PathBuf::from).unwrap_or(defaults.path),
                level: Level::from_env(),
                format: LogFormat::from_env(),
                console: env_flag("LOG_CONSOLE", defaults.console),
            },
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        Endpoint::from_testnet_flag(self.use_testnet)
    }

    pub fn fapi_base(&self) -> &str {
        self.fapi_base_override
            .as_deref()
            .unwrap_or_else(|| self.endpoint().base_url())
    }
}
