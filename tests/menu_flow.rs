//! Console scenarios: drive the menu with scripted stdin against an offline
//! connector and check what reaches the exchange, the screen and the log.

use std::io::Cursor;
use std::path::PathBuf;

use serde_json::json;
use tempfile::TempDir;

use futures_order_cli::bot::BasicBot;
use futures_order_cli::config::LogConfig;
use futures_order_cli::exchange::scripted::{Call, ScriptedConnector};
use futures_order_cli::exchange::types::OrderType;
use futures_order_cli::exchange::{ExchangeError, OrderRequest};
use futures_order_cli::logging::{Level, LogFormat, Logger};
use futures_order_cli::menu::Menu;

struct Session {
    bot: BasicBot<ScriptedConnector>,
    _dir: TempDir,
    log_path: PathBuf,
}

impl Session {
    fn new(connector: ScriptedConnector) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("trading_bot.log");
        let cfg = LogConfig {
            path: log_path.clone(),
            level: Level::Info,
            format: LogFormat::Text,
            console: false,
        };
        let bot = BasicBot::new(connector, Logger::open(&cfg).unwrap());
        Self { bot, _dir: dir, log_path }
    }

    fn run(&self, stdin: &str) -> String {
        let mut out = Vec::new();
        Menu::new(&self.bot, Cursor::new(stdin.as_bytes().to_vec()), &mut out)
            .run()
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    fn calls(&self) -> Vec<Call> {
        self.bot.connector().calls()
    }

    fn log(&self) -> String {
        std::fs::read_to_string(&self.log_path).unwrap()
    }
}

#[test]
fn market_order_end_to_end() {
    let session = Session::new(
        ScriptedConnector::new().respond(Ok(json!({"orderId": 123, "status": "FILLED"}))),
    );
    let out = session.run("1\nbtcusdt\nbuy\n0.01\n5\n");

    assert_eq!(
        session.calls(),
        vec![Call::CreateOrder(OrderRequest::market("BTCUSDT", "BUY", 0.01))]
    );
    assert!(out.contains("Order placed successfully: 123\n"));

    let log = session.log();
    assert_eq!(log.matches("Placing market BUY order for 0.01 BTCUSDT").count(), 1);
    assert_eq!(log.matches("Market Order Response:").count(), 1);
}

#[test]
fn order_status_end_to_end() {
    let session = Session::new(ScriptedConnector::new().respond(Ok(json!({"status": "NEW"}))));
    let out = session.run("4\nethusdt\n55\n5\n");

    assert_eq!(
        session.calls(),
        vec![Call::GetOrder { symbol: "ETHUSDT".to_string(), order_id: 55 }]
    );
    assert!(out.contains("Order status: NEW\n"));
    assert!(!out.contains("Enter side"));
}

#[test]
fn negative_order_id_is_left_to_the_exchange() {
    let rejection = ExchangeError::Api { status: 400, code: -2013, msg: "Order does not exist.".to_string() };
    let session = Session::new(ScriptedConnector::new().respond(Err(rejection)));
    let out = session.run("4\nbtcusdt\n-1\n5\n");

    assert_eq!(
        session.calls(),
        vec![Call::GetOrder { symbol: "BTCUSDT".to_string(), order_id: -1 }]
    );
    assert!(!out.contains("Invalid input"));
    assert!(out.contains("Error: APIError(code=-2013): Order does not exist.\n"));
}

#[test]
fn limit_and_stop_limit_orders() {
    let session = Session::new(
        ScriptedConnector::new()
            .respond(Ok(json!({"orderId": 1, "status": "NEW"})))
            .respond(Ok(json!({"orderId": 2, "status": "NEW"}))),
    );
    let out = session.run("2\nbtcusdt\nsell\n0.5\n70000\n3\nethusdt\nbuy\n1\n3100\n3050\n5\n");

    let calls = session.calls();
    assert_eq!(calls.len(), 2);
    match &calls[0] {
        Call::CreateOrder(req) => {
            assert_eq!(req, &OrderRequest::limit("BTCUSDT", "SELL", 0.5, 70000.0));
            assert!(req.to_params().contains(&("timeInForce", "GTC".to_string())));
        }
        other => panic!("unexpected call {:?}", other),
    }
    match &calls[1] {
        Call::CreateOrder(req) => {
            assert_eq!(req.order_type, OrderType::Stop);
            assert_eq!(req.price, Some(3100.0));
            assert_eq!(req.stop_price, Some(3050.0));
        }
        other => panic!("unexpected call {:?}", other),
    }
    assert!(out.contains("Order placed successfully: 1\n"));
    assert!(out.contains("Order placed successfully: 2\n"));
}

#[test]
fn non_numeric_quantity_skips_the_exchange() {
    let session = Session::new(ScriptedConnector::new());
    let out = session.run("1\nbtcusdt\nbuy\nlots\n5\n");

    assert!(session.calls().is_empty());
    assert!(out.contains("Invalid input: could not convert 'lots' to a number"));
    // menu shown again after the abandoned action
    assert_eq!(out.matches("1. Place Market Order").count(), 2);
    assert!(session.log().is_empty());
}

#[test]
fn non_numeric_price_abandons_before_stop_price() {
    let session = Session::new(ScriptedConnector::new());
    let out = session.run("3\nbtcusdt\nbuy\n1\ncheap\n5\n");

    assert!(session.calls().is_empty());
    assert!(out.contains("Invalid input:"));
    assert!(!out.contains("Enter stop price"));
}

#[test]
fn exchange_error_is_printed_and_loop_continues() {
    let rejection = ExchangeError::Api { status: 400, code: -1121, msg: "Invalid symbol.".to_string() };
    let session = Session::new(
        ScriptedConnector::new()
            .respond(Err(rejection))
            .respond(Ok(json!({"orderId": 9, "status": "NEW"}))),
    );
    let out = session.run("1\nnope\nbuy\n1\n1\nbtcusdt\nbuy\n1\n5\n");

    assert!(out.contains("Error: APIError(code=-1121): Invalid symbol.\n"));
    assert!(out.contains("Order placed successfully: 9\n"));
    assert_eq!(session.calls().len(), 2);
    assert!(session.log().contains("ERROR - Market order failed: APIError(code=-1121): Invalid symbol."));
}

#[test]
fn exit_prompts_nothing_further() {
    let session = Session::new(ScriptedConnector::new());
    let out = session.run("5\nbtcusdt\n");

    assert!(out.trim_end().ends_with("Enter your choice (1-5):"));
    assert!(!out.contains("Enter symbol"));
    assert!(session.calls().is_empty());
}

#[test]
fn invalid_choice_redisplays_menu() {
    let session = Session::new(ScriptedConnector::new());
    let out = session.run("9\n5\n");

    assert!(out.contains("Invalid choice: 9"));
    assert!(!out.contains("Enter symbol"));
    assert_eq!(out.matches("5. Exit").count(), 2);
}

#[test]
fn end_of_input_stops_the_loop() {
    let session = Session::new(ScriptedConnector::new());
    let out = session.run("1\nbtcusdt\n");

    assert!(out.contains("Enter side (BUY/SELL): "));
    assert!(session.calls().is_empty());
}
