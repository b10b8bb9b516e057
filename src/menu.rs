use std::io::{self, BufRead, Write};
use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error;

use crate::bot::BasicBot;
use crate::exchange::types::display_field;
use crate::exchange::{ExchangeError, FuturesConnector};

const MENU: &str = "\nBinance Futures Trading Bot\n\
1. Place Market Order\n\
2. Place Limit Order\n\
3. Place Stop-Limit Order\n\
4. Check Order Status\n\
5. Exit";

#[derive(Debug, Error)]
pub enum InputError {
    #[error("could not convert '{text}' to a number: {source}")]
    Decimal { text: String, source: ParseFloatError },
    #[error("could not convert '{text}' to an order id: {source}")]
    OrderId { text: String, source: ParseIntError },
}

pub fn parse_decimal(text: &str) -> Result<f64, InputError> {
    text.trim().parse().map_err(|source| InputError::Decimal { text: text.to_string(), source })
}

pub fn parse_order_id(text: &str) -> Result<i64, InputError> {
    text.trim().parse().map_err(|source| InputError::OrderId { text: text.to_string(), source })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Market,
    Limit,
    StopLimit,
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Run(Choice),
    Exit,
    Invalid,
}

impl Selection {
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "1" => Selection::Run(Choice::Market),
            "2" => Selection::Run(Choice::Limit),
            "3" => Selection::Run(Choice::StopLimit),
            "4" => Selection::Run(Choice::Status),
            "5" => Selection::Exit,
            _ => Selection::Invalid,
        }
    }
}

#[derive(Debug, Error)]
enum ActionError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Exchange(#[from] ExchangeError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("end of input")]
    EndOfInput,
}

/// Numbered console menu driving a [`BasicBot`].
///
/// Input and output are generic so the loop can run against stdin/stdout or
/// in-memory buffers.
pub struct Menu<'a, C, R, W> {
    bot: &'a BasicBot<C>,
    input: R,
    output: W,
}

impl<'a, C, R, W> Menu<'a, C, R, W>
where
    C: FuturesConnector,
    R: BufRead,
    W: Write,
{
    pub fn new(bot: &'a BasicBot<C>, input: R, output: W) -> Self {
        Self { bot, input, output }
    }

    /// Runs until `5` is chosen or input is exhausted. Only console I/O
    /// failures escape; order and input errors are printed and the loop goes on.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            writeln!(self.output, "{}", MENU)?;
            let Some(line) = self.prompt("\nEnter your choice (1-5): ")? else {
                return Ok(());
            };
            let choice = match Selection::parse(&line) {
                Selection::Run(choice) => choice,
                Selection::Exit => return Ok(()),
                Selection::Invalid => {
                    writeln!(self.output, "Invalid choice: {}", line.trim())?;
                    continue;
                }
            };

            match self.dispatch(choice) {
                Ok(summary) => writeln!(self.output, "{}", summary)?,
                Err(ActionError::Exchange(e)) => writeln!(self.output, "Error: {}", e)?,
                Err(ActionError::Input(e)) => writeln!(self.output, "Invalid input: {}", e)?,
                Err(ActionError::Io(e)) => return Err(e),
                Err(ActionError::EndOfInput) => return Ok(()),
            }
        }
    }

    fn dispatch(&mut self, choice: Choice) -> Result<String, ActionError> {
        let symbol = self.ask("Enter symbol (e.g., BTCUSDT): ")?.to_uppercase();

        let order = match choice {
            Choice::Status => {
                let order_id = parse_order_id(&self.ask("Enter order ID: ")?)?;
                let status = self.bot.get_order_status(&symbol, order_id)?;
                return Ok(format!("Order status: {}", display_field(&status, "status")));
            }
            Choice::Market => {
                let (side, quantity) = self.ask_side_and_quantity()?;
                self.bot.place_market_order(&symbol, &side, quantity)?
            }
            Choice::Limit => {
                let (side, quantity) = self.ask_side_and_quantity()?;
                let price = parse_decimal(&self.ask("Enter price: ")?)?;
                self.bot.place_limit_order(&symbol, &side, quantity, price)?
            }
            Choice::StopLimit => {
                let (side, quantity) = self.ask_side_and_quantity()?;
                let price = parse_decimal(&self.ask("Enter price: ")?)?;
                let stop_price = parse_decimal(&self.ask("Enter stop price: ")?)?;
                self.bot.place_stop_limit_order(&symbol, &side, quantity, price, stop_price)?
            }
        };
        Ok(format!("Order placed successfully: {}", display_field(&order, "orderId")))
    }

    fn ask_side_and_quantity(&mut self) -> Result<(String, f64), ActionError> {
        let side = self.ask("Enter side (BUY/SELL): ")?.to_uppercase();
        let quantity = parse_decimal(&self.ask("Enter quantity: ")?)?;
        Ok((side, quantity))
    }

    fn ask(&mut self, text: &str) -> Result<String, ActionError> {
        self.prompt(text)?
            .map(|s| s.trim().to_string())
            .ok_or(ActionError::EndOfInput)
    }

    /// `None` on end of input.
    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(&['\r', '\n'][..]).to_string()))
    }
}
