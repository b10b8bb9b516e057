use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderType {
    Market,
    Limit,
    /// Binance futures `STOP`: a limit order armed once `stopPrice` trades.
    Stop,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Market => "MARKET",
            OrderType::Limit => "LIMIT",
            OrderType::Stop => "STOP",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeInForce {
    Gtc,
}

impl TimeInForce {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeInForce::Gtc => "GTC",
        }
    }
}

/// Parameters of a new futures order, as sent to the exchange.
///
/// Nothing here is checked locally: a negative quantity or an unknown side
/// goes out as typed and the exchange decides.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub symbol: String,
    pub side: String,
    pub order_type: OrderType,
    pub quantity: f64,
    pub price: Option<f64>,
    pub stop_price: Option<f64>,
    pub time_in_force: Option<TimeInForce>,
}

impl OrderRequest {
    pub fn market(symbol: &str, side: &str, quantity: f64) -> Self {
        Self {
            symbol: symbol.to_string(),
            side: side.to_string(),
            order_type: OrderType::Market,
            quantity,
            price: None,
            stop_price: None,
            time_in_force: None,
        }
    }

    pub fn limit(symbol: &str, side: &str, quantity: f64, price: f64) -> Self {
        Self {
            order_type: OrderType::Limit,
            price: Some(price),
            time_in_force: Some(TimeInForce::Gtc),
            ..Self::market(symbol, side, quantity)
        }
    }

    pub fn stop_limit(symbol: &str, side: &str, quantity: f64, price: f64, stop_price: f64) -> Self {
        Self {
            order_type: OrderType::Stop,
            price: Some(price),
            stop_price: Some(stop_price),
            time_in_force: Some(TimeInForce::Gtc),
            ..Self::market(symbol, side, quantity)
        }
    }

    /// Query parameters in Binance order, without timestamp or signature.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("symbol", self.symbol.clone()),
            ("side", self.side.clone()),
            ("type", self.order_type.as_str().to_string()),
        ];
        if let Some(tif) = self.time_in_force {
            params.push(("timeInForce", tif.as_str().to_string()));
        }
        params.push(("quantity", self.quantity.to_string()));
        if let Some(price) = self.price {
            params.push(("price", price.to_string()));
        }
        if let Some(stop) = self.stop_price {
            params.push(("stopPrice", stop.to_string()));
        }
        params
    }
}

/// Render a top-level field of an exchange response for the console.
/// Strings come out unquoted; a missing field renders as `<missing>`.
pub fn display_field(resp: &Value, key: &str) -> String {
    match resp.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "<missing>".to_string(),
    }
}
