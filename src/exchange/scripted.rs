use std::cell::RefCell;
use std::collections::VecDeque;

use serde_json::Value;

use super::{ExchangeError, FuturesConnector, OrderRequest};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateOrder(OrderRequest),
    GetOrder { symbol: String, order_id: i64 },
    Ping,
}

/// Offline connector: records every call and answers from a queue of
/// canned results. An empty queue answers with an API error.
#[derive(Debug, Default)]
pub struct ScriptedConnector {
    responses: RefCell<VecDeque<Result<Value, ExchangeError>>>,
    calls: RefCell<Vec<Call>>,
}

impl ScriptedConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, result: Result<Value, ExchangeError>) -> Self {
        self.responses.borrow_mut().push_back(result);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn next(&self, call: Call) -> Result<Value, ExchangeError> {
        self.calls.borrow_mut().push(call);
        self.responses.borrow_mut().pop_front().unwrap_or_else(|| {
            Err(ExchangeError::Api {
                status: 503,
                code: -1,
                msg: "no scripted response".to_string(),
            })
        })
    }
}

impl FuturesConnector for ScriptedConnector {
    fn create_order(&self, req: &OrderRequest) -> Result<Value, ExchangeError> {
        self.next(Call::CreateOrder(req.clone()))
    }

    fn get_order(&self, symbol: &str, order_id: i64) -> Result<Value, ExchangeError> {
        self.next(Call::GetOrder { symbol: symbol.to_string(), order_id })
    }

    fn ping(&self) -> Result<(), ExchangeError> {
        self.calls.borrow_mut().push(Call::Ping);
        Ok(())
    }
}
