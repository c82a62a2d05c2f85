use serde::{Deserialize, Serialize};
use std::fmt;

// A tradable instrument: ticker symbol, display name, last known price.
// Not persisted with its own identity; it lives embedded in a holding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stock {
    pub symbol: String,
    pub name: String,
    pub price: f64,
}

impl Stock {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>, price: f64) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            price,
        }
    }
}

impl fmt::Display for Stock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} - ${}", self.symbol, self.name, self.price)
    }
}

#[derive(Debug, Deserialize)]
pub struct CreatePosition {
    pub symbol: String,
    pub quantity: i64,
}
