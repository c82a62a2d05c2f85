use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::AppError;
use crate::models::{Portfolio, Stock};

// Display name attached to stocks created from a transaction; the real
// name is unknown here and is not persisted anyway.
const TRANSACTION_STOCK_NAME: &str = "Dummy Stock";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

// A one-shot buy or sell instruction. Applied to a portfolio and then
// discarded; only the resulting holdings are durable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub symbol: String,
    pub side: Side,
    pub quantity: i64,
    pub price: f64,
}

impl Transaction {
    pub fn new(symbol: impl Into<String>, side: Side, quantity: i64, price: f64) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            quantity,
            price,
        }
    }

    /// Applies the instruction to a portfolio. A buy always succeeds; a
    /// sell propagates the aggregate's insufficient-shares failure
    /// unchanged.
    pub fn execute(&self, portfolio: &mut Portfolio) -> Result<(), AppError> {
        match self.side {
            Side::Buy => {
                self.execute_buy(portfolio);
                Ok(())
            }
            Side::Sell => self.execute_sell(portfolio),
        }
    }

    fn execute_buy(&self, portfolio: &mut Portfolio) {
        let stock = Stock::new(self.symbol.clone(), TRANSACTION_STOCK_NAME, self.price);
        portfolio.add_stock(stock, self.quantity);
    }

    fn execute_sell(&self, portfolio: &mut Portfolio) -> Result<(), AppError> {
        let stock = Stock::new(self.symbol.clone(), TRANSACTION_STOCK_NAME, self.price);
        portfolio.remove_stock(&stock, self.quantity)
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} shares of {} at ${} per share",
            self.side, self.quantity, self.symbol, self.price
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateTransaction {
    pub symbol: String,
    pub side: Side,
    pub quantity: i64,
    pub price: f64,
}
