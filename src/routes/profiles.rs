use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, info};

use crate::db;
use crate::errors::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_profiles))
}

pub async fn list_profiles(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    info!("GET /profiles - Listing profiles");
    let profiles = db::profile_queries::list(&state.pool).await.map_err(|e| {
        error!("Failed to list profiles: {}", e);
        AppError::Db(e)
    })?;
    Ok(Json(profiles))
}
