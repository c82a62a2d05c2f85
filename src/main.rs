mod app;
mod db;
mod errors;
mod external;
mod models;
mod routes;
mod services;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::sqlite::SqlitePoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::external::alphavantage::AlphaVantageProvider;
use crate::external::quote_provider::QuoteProvider;
use crate::external::yahoo::YahooQuoteProvider;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(log_level))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://portfolio.db?mode=rwc".to_string());

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    db::schema::ensure_schema(&pool).await?;

    // Select quote provider based on QUOTE_PROVIDER env var (defaults to yahoo)
    let provider_name =
        std::env::var("QUOTE_PROVIDER").unwrap_or_else(|_| "yahoo".to_string());

    let quotes: Arc<dyn QuoteProvider> = match provider_name.to_lowercase().as_str() {
        "yahoo" => {
            tracing::info!("📊 Using quote provider: Yahoo Finance");
            Arc::new(YahooQuoteProvider::new())
        }
        "alphavantage" => {
            tracing::info!("📊 Using quote provider: Alpha Vantage");
            Arc::new(
                AlphaVantageProvider::from_env()
                    .expect("Failed to create AlphaVantageProvider (check ALPHAVANTAGE_API_KEY)"),
            )
        }
        _ => {
            panic!(
                "Invalid QUOTE_PROVIDER: {}. Must be 'yahoo' or 'alphavantage'",
                provider_name
            );
        }
    };

    let state = AppState::new(pool, quotes);
    let app = app::create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Trackfolio running at http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
