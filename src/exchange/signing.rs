use hmac::{Hmac, Mac};
use sha2::Sha256;
use url::form_urlencoded::byte_serialize;

use super::ExchangeError;

type HmacSha256 = Hmac<Sha256>;

/// Sign a query string with HMAC-SHA256 (Binance style).
/// Returns hex-encoded signature.
pub fn sign_binance(query: &str, secret: &str) -> Result<String, ExchangeError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| ExchangeError::Signing(format!("HMAC error: {}", e)))?;
    mac.update(query.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Join params as `k=v&k=v` with form-encoded values, append `recvWindow`
/// and `timestamp`, then the signature over exactly that string.
pub fn signed_query(
    params: &[(&str, String)],
    recv_window_ms: u64,
    timestamp_ms: u64,
    secret: &str,
) -> Result<String, ExchangeError> {
    let mut query = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, byte_serialize(v.as_bytes()).collect::<String>()))
        .collect::<Vec<_>>()
        .join("&");
    if !query.is_empty() {
        query.push('&');
    }
    query.push_str(&format!("recvWindow={}&timestamp={}", recv_window_ms, timestamp_ms));
    let signature = sign_binance(&query, secret)?;
    Ok(format!("{}&signature={}", query, signature))
}
