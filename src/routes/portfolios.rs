use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use http::StatusCode;
use serde::Deserialize;
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{
    CreatePortfolio, CreatePosition, CreateTransaction, Portfolio, PortfolioSummary, Transaction,
};
use crate::services::registry::PortfolioRegistry;
use crate::services::report_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_portfolio).get(list_portfolios))
        .route("/:name", get(get_portfolio))
        .route("/:name/positions", post(add_position))
        .route("/:name/transactions", post(execute_transaction))
        .route("/:name/report", get(portfolio_report))
}

// Every endpoint is scoped to a profile, defaulting to "default".
#[derive(Debug, Deserialize)]
pub struct ProfileQuery {
    profile: Option<String>,
}

impl ProfileQuery {
    fn profile(self) -> String {
        self.profile.unwrap_or_else(|| "default".to_string())
    }
}

#[axum::debug_handler]
pub async fn create_portfolio(
    State(state): State<AppState>,
    Query(query): Query<ProfileQuery>,
    Json(data): Json<CreatePortfolio>,
) -> Result<(StatusCode, Json<PortfolioSummary>), AppError> {
    info!("POST /portfolios - Creating portfolio '{}'", data.name);
    let profile = query.profile();

    let _guard = state.write_lock.lock().await;
    let mut registry = PortfolioRegistry::load(&state.pool, &profile).await?;
    let name = registry
        .create_portfolio(&data.name)
        .map_err(|e| {
            error!("Failed to create portfolio '{}': {}", data.name, e);
            e
        })?
        .name
        .clone();

    // Persist the empty shell right away.
    registry.save(&state.pool, &name).await?;
    let summary = PortfolioSummary::from(registry.get(&name).expect("just created"));
    Ok((StatusCode::CREATED, Json(summary)))
}

pub async fn list_portfolios(
    State(state): State<AppState>,
    Query(query): Query<ProfileQuery>,
) -> Result<Json<Vec<PortfolioSummary>>, AppError> {
    info!("GET /portfolios - Listing portfolios");
    let registry = PortfolioRegistry::load(&state.pool, &query.profile()).await?;
    let summaries = registry
        .portfolios()
        .iter()
        .map(PortfolioSummary::from)
        .collect();
    Ok(Json(summaries))
}

pub async fn get_portfolio(
    State(state): State<AppState>,
    Query(query): Query<ProfileQuery>,
    Path(name): Path<String>,
) -> Result<Json<Portfolio>, AppError> {
    info!("GET /portfolios/{} - Fetching portfolio", name);
    let registry = PortfolioRegistry::load(&state.pool, &query.profile()).await?;
    let portfolio = registry
        .get(&name)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Portfolio '{name}' does not exist")))?;
    Ok(Json(portfolio))
}

pub async fn add_position(
    State(state): State<AppState>,
    Query(query): Query<ProfileQuery>,
    Path(name): Path<String>,
    Json(data): Json<CreatePosition>,
) -> Result<Json<Portfolio>, AppError> {
    info!(
        "POST /portfolios/{}/positions - Adding {} x {}",
        name, data.quantity, data.symbol
    );
    let profile = query.profile();

    let _guard = state.write_lock.lock().await;
    let mut registry = PortfolioRegistry::load(&state.pool, &profile).await?;
    registry
        .quick_add_stock(state.quotes.as_ref(), &name, &data.symbol, data.quantity)
        .await
        .map_err(|e| {
            error!("Failed to add {} to '{}': {}", data.symbol, name, e);
            e
        })?;

    registry.save(&state.pool, &name).await?;
    Ok(Json(registry.get(&name).cloned().expect("checked by add")))
}

pub async fn execute_transaction(
    State(state): State<AppState>,
    Query(query): Query<ProfileQuery>,
    Path(name): Path<String>,
    Json(data): Json<CreateTransaction>,
) -> Result<Json<Portfolio>, AppError> {
    info!(
        "POST /portfolios/{}/transactions - {} {} x {}",
        name, data.side, data.quantity, data.symbol
    );
    let profile = query.profile();
    let transaction = Transaction::new(
        data.symbol.trim().to_uppercase(),
        data.side,
        data.quantity,
        data.price,
    );

    let _guard = state.write_lock.lock().await;
    let mut registry = PortfolioRegistry::load(&state.pool, &profile).await?;
    registry
        .execute_transaction(&name, &transaction)
        .map_err(|e| {
            error!("Failed to execute {} on '{}': {}", transaction, name, e);
            e
        })?;

    registry.save(&state.pool, &name).await?;
    Ok(Json(registry.get(&name).cloned().expect("checked by execute")))
}

pub async fn portfolio_report(
    State(state): State<AppState>,
    Query(query): Query<ProfileQuery>,
    Path(name): Path<String>,
) -> Result<String, AppError> {
    info!("GET /portfolios/{}/report - Rendering report", name);
    let registry = PortfolioRegistry::load(&state.pool, &query.profile()).await?;
    // A missing portfolio renders as a message; the result goes straight
    // to a display layer.
    Ok(report_service::portfolio_report(&registry, &name))
}
