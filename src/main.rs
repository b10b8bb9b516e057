use std::io;

use anyhow::{Context, Result};

use futures_order_cli::bot::BasicBot;
use futures_order_cli::config::Config;
use futures_order_cli::exchange::{BinanceFutures, FuturesConnector};
use futures_order_cli::logging::{obj, v_str, Logger};
use futures_order_cli::menu::Menu;

fn main() -> Result<()> {
    let cfg = Config::from_env();
    let logger = Logger::open(&cfg.log)
        .with_context(|| format!("cannot open log file {}", cfg.log.path.display()))?;

    let exchange = BinanceFutures::new(&cfg)?;
    exchange
        .ping()
        .with_context(|| format!("exchange unreachable at {}", exchange.base()))?;
    logger.info(
        "startup",
        &format!("Connected to {}", exchange.base()),
        obj(&[
            ("endpoint", v_str(&format!("{:?}", cfg.endpoint()).to_lowercase())),
            ("base", v_str(exchange.base())),
        ]),
    );

    let bot = BasicBot::new(exchange, logger);
    let stdin = io::stdin();
    Menu::new(&bot, stdin.lock(), io::stdout()).run()?;
    Ok(())
}
