use sqlx::SqlitePool;
use tracing::info;

use crate::db;
use crate::errors::AppError;
use crate::external::quote_provider::QuoteProvider;
use crate::models::{Portfolio, Stock, Transaction};

// Display name for stocks added via a quote lookup; providers return a
// price only.
const FETCHED_STOCK_NAME: &str = "Fetched Stock";

/// Per-profile working set of portfolios. Constructed explicitly for one
/// profile and passed around as a session object; there is no ambient
/// "current user" state anywhere in the crate.
pub struct PortfolioRegistry {
    profile: String,
    portfolios: Vec<Portfolio>,
}

impl PortfolioRegistry {
    pub fn new(profile: impl Into<String>) -> Self {
        Self {
            profile: profile.into(),
            portfolios: Vec::new(),
        }
    }

    /// Replaces the working set with what the store holds for the
    /// profile. Unsaved in-memory changes are overwritten, not merged.
    pub async fn load(pool: &SqlitePool, profile: &str) -> Result<Self, AppError> {
        let portfolios = db::portfolio_queries::load_all(pool, profile).await?;
        Ok(Self {
            profile: profile.to_string(),
            portfolios,
        })
    }

    pub fn portfolios(&self) -> &[Portfolio] {
        &self.portfolios
    }

    pub fn create_portfolio(&mut self, name: &str) -> Result<&Portfolio, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Portfolio name cannot be empty".into()));
        }
        if self.get(name).is_some() {
            return Err(AppError::DuplicatePortfolio(name.to_string()));
        }

        self.portfolios.push(Portfolio::new(name));
        info!("Created portfolio '{}' for profile '{}'", name, self.profile);
        Ok(self.portfolios.last().expect("just pushed"))
    }

    pub fn get(&self, name: &str) -> Option<&Portfolio> {
        self.portfolios.iter().find(|p| p.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Portfolio> {
        self.portfolios.iter_mut().find(|p| p.name == name)
    }

    /// Fetches the current price for a symbol and adds the position to a
    /// portfolio. A failed lookup surfaces as an error and performs no
    /// mutation; a wrong sentinel price is never substituted.
    pub async fn quick_add_stock(
        &mut self,
        quotes: &dyn QuoteProvider,
        portfolio_name: &str,
        symbol: &str,
        quantity: i64,
    ) -> Result<(), AppError> {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(AppError::Validation("Stock symbol cannot be empty".into()));
        }
        if quantity <= 0 {
            return Err(AppError::Validation("Quantity must be positive".into()));
        }
        if self.get(portfolio_name).is_none() {
            return Err(AppError::NotFound(format!(
                "Portfolio '{portfolio_name}' does not exist"
            )));
        }

        let price = quotes.fetch_price(&symbol).await?;
        info!("Fetched quote for {}: ${}", symbol, price);

        let portfolio = self.get_mut(portfolio_name).expect("checked above");
        portfolio.add_stock(Stock::new(symbol, FETCHED_STOCK_NAME, price), quantity);
        Ok(())
    }

    /// Applies a buy/sell instruction to the named portfolio, propagating
    /// the domain's insufficient-shares failure to the caller.
    pub fn execute_transaction(
        &mut self,
        portfolio_name: &str,
        transaction: &Transaction,
    ) -> Result<(), AppError> {
        if transaction.quantity <= 0 {
            return Err(AppError::Validation("Quantity must be positive".into()));
        }
        if transaction.price < 0.0 {
            return Err(AppError::Validation("Price cannot be negative".into()));
        }

        let portfolio = self.get_mut(portfolio_name).ok_or_else(|| {
            AppError::NotFound(format!("Portfolio '{portfolio_name}' does not exist"))
        })?;

        transaction.execute(portfolio)?;
        info!("Executed {} on portfolio '{}'", transaction, portfolio_name);
        Ok(())
    }

    /// Persists one portfolio of the working set.
    pub async fn save(&self, pool: &SqlitePool, portfolio_name: &str) -> Result<(), AppError> {
        let portfolio = self.get(portfolio_name).ok_or_else(|| {
            AppError::NotFound(format!("Portfolio '{portfolio_name}' does not exist"))
        })?;
        db::portfolio_queries::save(pool, portfolio, &self.profile).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{schema, test_pool};
    use crate::external::quote_provider::QuoteError;
    use crate::models::Side;
    use async_trait::async_trait;

    struct FixedQuote(f64);

    #[async_trait]
    impl QuoteProvider for FixedQuote {
        async fn fetch_price(&self, _symbol: &str) -> Result<f64, QuoteError> {
            Ok(self.0)
        }
    }

    struct FailingQuote;

    #[async_trait]
    impl QuoteProvider for FailingQuote {
        async fn fetch_price(&self, _symbol: &str) -> Result<f64, QuoteError> {
            Err(QuoteError::Network("connection refused".into()))
        }
    }

    #[test]
    fn duplicate_portfolio_name_is_rejected() {
        let mut registry = PortfolioRegistry::new("default");
        registry.create_portfolio("Growth").unwrap();
        registry
            .get_mut("Growth")
            .unwrap()
            .add_stock(Stock::new("AAPL", "Apple Inc.", 150.0), 2);

        let err = registry.create_portfolio("Growth").unwrap_err();
        assert!(matches!(err, AppError::DuplicatePortfolio(_)));

        // The existing portfolio is untouched.
        assert_eq!(registry.get("Growth").unwrap().quantity_of("AAPL"), 2);
    }

    #[test]
    fn blank_portfolio_name_is_rejected() {
        let mut registry = PortfolioRegistry::new("default");
        let err = registry.create_portfolio("   ").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn quick_add_uses_the_fetched_price() {
        let mut registry = PortfolioRegistry::new("default");
        registry.create_portfolio("Growth").unwrap();

        registry
            .quick_add_stock(&FixedQuote(150.0), "Growth", "aapl", 10)
            .await
            .unwrap();

        let portfolio = registry.get("Growth").unwrap();
        assert_eq!(portfolio.quantity_of("AAPL"), 10);
        assert_eq!(portfolio.value(), 1500.0);
    }

    #[tokio::test]
    async fn quick_add_on_missing_portfolio_is_not_found() {
        let mut registry = PortfolioRegistry::new("default");
        let err = registry
            .quick_add_stock(&FixedQuote(150.0), "Nope", "AAPL", 1)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn failed_quote_lookup_adds_nothing() {
        let mut registry = PortfolioRegistry::new("default");
        registry.create_portfolio("Growth").unwrap();

        let err = registry
            .quick_add_stock(&FailingQuote, "Growth", "AAPL", 1)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Quote(_)));
        assert!(registry.get("Growth").unwrap().holdings().is_empty());
    }

    #[test]
    fn transaction_on_missing_portfolio_is_not_found() {
        let mut registry = PortfolioRegistry::new("default");
        let tx = Transaction::new("AAPL", Side::Buy, 1, 150.0);
        let err = registry.execute_transaction("Nope", &tx).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn transaction_quantity_must_be_positive() {
        let mut registry = PortfolioRegistry::new("default");
        registry.create_portfolio("Growth").unwrap();
        let tx = Transaction::new("AAPL", Side::Buy, 0, 150.0);
        let err = registry.execute_transaction("Growth", &tx).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn load_replaces_the_working_set() {
        let pool = test_pool().await;
        schema::ensure_schema(&pool).await.unwrap();

        let mut registry = PortfolioRegistry::new("alice");
        registry.create_portfolio("Growth").unwrap();
        registry.save(&pool, "Growth").await.unwrap();

        // Unsaved portfolio disappears on reload.
        registry.create_portfolio("Scratch").unwrap();
        let reloaded = PortfolioRegistry::load(&pool, "alice").await.unwrap();
        assert!(reloaded.get("Growth").is_some());
        assert!(reloaded.get("Scratch").is_none());
    }
}
