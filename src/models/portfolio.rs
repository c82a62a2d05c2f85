use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::Stock;

// One position a portfolio currently owns: the stock plus how many shares.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Holding {
    pub stock: Stock,
    pub quantity: i64,
}

// A named collection of holdings owned by one profile. Holdings keep
// insertion order and hold at most one entry per symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portfolio {
    pub name: String,
    holdings: Vec<Holding>,
}

impl Portfolio {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            holdings: Vec::new(),
        }
    }

    /// Adds shares of a stock. An existing holding for the same symbol
    /// accumulates the quantity and takes over the incoming stock, so the
    /// price seen last wins.
    pub fn add_stock(&mut self, stock: Stock, quantity: i64) {
        match self
            .holdings
            .iter_mut()
            .find(|h| h.stock.symbol == stock.symbol)
        {
            Some(holding) => {
                holding.quantity += quantity;
                holding.stock = stock;
            }
            None => self.holdings.push(Holding { stock, quantity }),
        }
    }

    /// Removes shares of a stock. The aggregate is the single enforcement
    /// point for the sell invariant: an absent symbol or a quantity larger
    /// than what is held fails without touching the holdings. A successful
    /// decrement takes over the incoming stock's price, and a holding that
    /// reaches zero is deleted rather than kept as a zero row.
    pub fn remove_stock(&mut self, stock: &Stock, quantity: i64) -> Result<(), AppError> {
        let index = self
            .holdings
            .iter()
            .position(|h| h.stock.symbol == stock.symbol)
            .ok_or_else(|| AppError::InsufficientShares {
                symbol: stock.symbol.clone(),
                held: 0,
                requested: quantity,
            })?;

        let holding = &mut self.holdings[index];
        if holding.quantity < quantity {
            return Err(AppError::InsufficientShares {
                symbol: stock.symbol.clone(),
                held: holding.quantity,
                requested: quantity,
            });
        }

        holding.quantity -= quantity;
        holding.stock = stock.clone();
        if holding.quantity == 0 {
            self.holdings.remove(index);
        }
        Ok(())
    }

    /// Total market value: Σ price * quantity. Zero for an empty portfolio.
    pub fn value(&self) -> f64 {
        self.holdings
            .iter()
            .map(|h| h.stock.price * h.quantity as f64)
            .sum()
    }

    pub fn has_stock(&self, symbol: &str) -> bool {
        self.holdings.iter().any(|h| h.stock.symbol == symbol)
    }

    /// Shares held for a symbol, zero if absent.
    pub fn quantity_of(&self, symbol: &str) -> i64 {
        self.holdings
            .iter()
            .find(|h| h.stock.symbol == symbol)
            .map(|h| h.quantity)
            .unwrap_or(0)
    }

    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }
}

#[derive(Debug, Deserialize)]
pub struct CreatePortfolio {
    pub name: String,
}

// Listing shape for the portfolio collection endpoint.
#[derive(Debug, Serialize)]
pub struct PortfolioSummary {
    pub name: String,
    pub value: f64,
    pub positions: usize,
}

impl From<&Portfolio> for PortfolioSummary {
    fn from(portfolio: &Portfolio) -> Self {
        Self {
            name: portfolio.name.clone(),
            value: portfolio.value(),
            positions: portfolio.holdings().len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_portfolio_has_zero_value() {
        let portfolio = Portfolio::new("Growth");
        assert_eq!(portfolio.value(), 0.0);
        assert!(!portfolio.has_stock("AAPL"));
        assert_eq!(portfolio.quantity_of("AAPL"), 0);
    }

    #[test]
    fn add_accumulates_quantity_and_latest_price_wins() {
        let mut portfolio = Portfolio::new("Growth");
        portfolio.add_stock(Stock::new("AAPL", "Apple Inc.", 150.0), 10);
        portfolio.add_stock(Stock::new("AAPL", "Apple Inc.", 160.0), 5);

        assert_eq!(portfolio.quantity_of("AAPL"), 15);
        // Replaced on every add, not averaged.
        assert_eq!(portfolio.value(), 15.0 * 160.0);
        assert_eq!(portfolio.holdings().len(), 1);
    }

    #[test]
    fn remove_more_than_held_fails_and_leaves_holdings_unchanged() {
        let mut portfolio = Portfolio::new("Growth");
        portfolio.add_stock(Stock::new("AAPL", "Apple Inc.", 150.0), 3);

        let err = portfolio
            .remove_stock(&Stock::new("AAPL", "Apple Inc.", 150.0), 5)
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::InsufficientShares {
                held: 3,
                requested: 5,
                ..
            }
        ));
        assert_eq!(portfolio.quantity_of("AAPL"), 3);
    }

    #[test]
    fn remove_absent_symbol_fails() {
        let mut portfolio = Portfolio::new("Growth");
        let err = portfolio
            .remove_stock(&Stock::new("MSFT", "Microsoft", 300.0), 1)
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::InsufficientShares {
                held: 0,
                requested: 1,
                ..
            }
        ));
    }

    #[test]
    fn removing_exact_quantity_deletes_the_holding() {
        let mut portfolio = Portfolio::new("Growth");
        portfolio.add_stock(Stock::new("AAPL", "Apple Inc.", 150.0), 4);
        portfolio
            .remove_stock(&Stock::new("AAPL", "Apple Inc.", 150.0), 4)
            .unwrap();

        assert!(!portfolio.has_stock("AAPL"));
        assert!(portfolio.holdings().is_empty());
    }

    #[test]
    fn holdings_keep_insertion_order() {
        let mut portfolio = Portfolio::new("Growth");
        portfolio.add_stock(Stock::new("MSFT", "Microsoft", 300.0), 1);
        portfolio.add_stock(Stock::new("AAPL", "Apple Inc.", 150.0), 2);
        portfolio.add_stock(Stock::new("GOOG", "Alphabet", 120.0), 3);

        let symbols: Vec<&str> = portfolio
            .holdings()
            .iter()
            .map(|h| h.stock.symbol.as_str())
            .collect();
        assert_eq!(symbols, vec!["MSFT", "AAPL", "GOOG"]);
    }
}
