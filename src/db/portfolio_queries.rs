use sqlx::{FromRow, SqlitePool};

use crate::db::profile_queries;
use crate::models::{Portfolio, Stock};

// Display name for stocks rebuilt from storage; only symbol, quantity and
// price are persisted.
const SAVED_STOCK_NAME: &str = "Saved Stock";

#[derive(FromRow)]
struct PortfolioRow {
    id: i64,
    name: String,
}

#[derive(FromRow)]
struct HoldingRow {
    symbol: String,
    quantity: i64,
    price: f64,
}

/// Persists one portfolio for a profile. The write is a full replace:
/// the portfolio row is upserted by `(profile_id, name)`, then every
/// stored holding row is deleted and the in-memory set reinserted. One
/// transaction wraps the whole cycle so readers never observe a
/// half-replaced portfolio.
pub async fn save(
    pool: &SqlitePool,
    portfolio: &Portfolio,
    username: &str,
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    let profile_id = profile_queries::get_or_create(&mut tx, username).await?;

    sqlx::query("INSERT OR IGNORE INTO portfolios (profile_id, name) VALUES (?1, ?2)")
        .bind(profile_id)
        .bind(&portfolio.name)
        .execute(&mut *tx)
        .await?;

    let portfolio_id: i64 =
        sqlx::query_scalar("SELECT id FROM portfolios WHERE profile_id = ?1 AND name = ?2")
            .bind(profile_id)
            .bind(&portfolio.name)
            .fetch_one(&mut *tx)
            .await?;

    sqlx::query("DELETE FROM holdings WHERE portfolio_id = ?1")
        .bind(portfolio_id)
        .execute(&mut *tx)
        .await?;

    for holding in portfolio.holdings() {
        sqlx::query(
            "INSERT INTO holdings (portfolio_id, symbol, quantity, price) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(portfolio_id)
        .bind(&holding.stock.symbol)
        .bind(holding.quantity)
        .bind(holding.stock.price)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await
}

/// Loads every portfolio owned by a profile, creating the profile on
/// first reference. Holdings come back in the order they were saved.
pub async fn load_all(pool: &SqlitePool, username: &str) -> Result<Vec<Portfolio>, sqlx::Error> {
    let mut conn = pool.acquire().await?;
    let profile_id = profile_queries::get_or_create(&mut conn, username).await?;

    let rows: Vec<PortfolioRow> =
        sqlx::query_as("SELECT id, name FROM portfolios WHERE profile_id = ?1 ORDER BY id")
            .bind(profile_id)
            .fetch_all(&mut *conn)
            .await?;

    let mut portfolios = Vec::with_capacity(rows.len());
    for row in rows {
        let mut portfolio = Portfolio::new(row.name);
        let holdings: Vec<HoldingRow> = sqlx::query_as(
            "SELECT symbol, quantity, price FROM holdings WHERE portfolio_id = ?1 ORDER BY id",
        )
        .bind(row.id)
        .fetch_all(&mut *conn)
        .await?;

        for h in holdings {
            portfolio.add_stock(Stock::new(h.symbol, SAVED_STOCK_NAME, h.price), h.quantity);
        }
        portfolios.push(portfolio);
    }

    Ok(portfolios)
}
