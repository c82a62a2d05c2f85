mod portfolio;
mod stock;
mod transaction;

pub use portfolio::{CreatePortfolio, Holding, Portfolio, PortfolioSummary};
pub use stock::{CreatePosition, Stock};
pub use transaction::{CreateTransaction, Side, Transaction};
