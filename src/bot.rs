use std::time::Instant;

use serde_json::{json, Map, Value};

use crate::exchange::{ExchangeError, FuturesConnector, OrderRequest};
use crate::logging::{obj, v_num, v_str, Logger};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BotAction {
    MarketOrder,
    LimitOrder,
    StopLimitOrder,
    OrderStatus,
}

impl BotAction {
    fn event(&self) -> &'static str {
        match self {
            BotAction::MarketOrder => "market_order",
            BotAction::LimitOrder => "limit_order",
            BotAction::StopLimitOrder => "stop_limit_order",
            BotAction::OrderStatus => "order_status",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            BotAction::MarketOrder => "Market Order",
            BotAction::LimitOrder => "Limit Order",
            BotAction::StopLimitOrder => "Stop-Limit Order",
            BotAction::OrderStatus => "Order Status",
        }
    }

    fn failure(&self) -> &'static str {
        match self {
            BotAction::MarketOrder => "Market order failed",
            BotAction::LimitOrder => "Limit order failed",
            BotAction::StopLimitOrder => "Stop-limit order failed",
            BotAction::OrderStatus => "Failed to get order status",
        }
    }
}

/// Logging facade over a futures connector.
///
/// Performs no validation; every call is one request, logged before and
/// after, with errors handed back unchanged.
pub struct BasicBot<C> {
    connector: C,
    logger: Logger,
}

impl<C: FuturesConnector> BasicBot<C> {
    pub fn new(connector: C, logger: Logger) -> Self {
        Self { connector, logger }
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    pub fn place_market_order(&self, symbol: &str, side: &str, quantity: f64) -> Result<Value, ExchangeError> {
        let req = OrderRequest::market(symbol, side, quantity);
        let msg = format!("Placing market {} order for {} {}", side, quantity, symbol);
        self.logged(BotAction::MarketOrder, &msg, request_fields(&req), |c| c.create_order(&req))
    }

    pub fn place_limit_order(
        &self,
        symbol: &str,
        side: &str,
        quantity: f64,
        price: f64,
    ) -> Result<Value, ExchangeError> {
        let req = OrderRequest::limit(symbol, side, quantity, price);
        let msg = format!("Placing limit {} order for {} {} at {}", side, quantity, symbol, price);
        self.logged(BotAction::LimitOrder, &msg, request_fields(&req), |c| c.create_order(&req))
    }

    pub fn place_stop_limit_order(
        &self,
        symbol: &str,
        side: &str,
        quantity: f64,
        price: f64,
        stop_price: f64,
    ) -> Result<Value, ExchangeError> {
        let req = OrderRequest::stop_limit(symbol, side, quantity, price, stop_price);
        let msg = format!(
            "Placing stop-limit {} order for {} {} at {} with stop at {}",
            side, quantity, symbol, price, stop_price
        );
        self.logged(BotAction::StopLimitOrder, &msg, request_fields(&req), |c| c.create_order(&req))
    }

    pub fn get_order_status(&self, symbol: &str, order_id: i64) -> Result<Value, ExchangeError> {
        let msg = format!("Fetching status of order {} for {}", order_id, symbol);
        let fields = obj(&[("symbol", v_str(symbol)), ("order_id", json!(order_id))]);
        self.logged(BotAction::OrderStatus, &msg, fields, |c| c.get_order(symbol, order_id))
    }

    /// Log the request, run `call` once, log its outcome, return it untouched.
    fn logged<F>(
        &self,
        action: BotAction,
        request_msg: &str,
        request: Map<String, Value>,
        call: F,
    ) -> Result<Value, ExchangeError>
    where
        F: FnOnce(&C) -> Result<Value, ExchangeError>,
    {
        let event = action.event();
        self.logger.info(&format!("{}.request", event), request_msg, request);

        let started = Instant::now();
        let result = call(&self.connector);
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

        match &result {
            Ok(resp) => {
                let pretty = serde_json::to_string_pretty(resp).unwrap_or_else(|_| resp.to_string());
                self.logger.info(
                    &format!("{}.response", event),
                    &format!("{} Response: {}", action.label(), pretty),
                    obj(&[("response", resp.clone()), ("elapsed_ms", v_num(elapsed_ms))]),
                );
            }
            Err(err) => {
                self.logger.error(
                    &format!("{}.error", event),
                    &format!("{}: {}", action.failure(), err),
                    obj(&[("error", v_str(&err.to_string())), ("elapsed_ms", v_num(elapsed_ms))]),
                );
            }
        }
        result
    }
}

fn request_fields(req: &OrderRequest) -> Map<String, Value> {
    req.to_params()
        .into_iter()
        .map(|(k, v)| (k.to_string(), Value::String(v)))
        .collect()
}
