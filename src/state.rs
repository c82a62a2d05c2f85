use std::sync::Arc;

use sqlx::SqlitePool;
use tokio::sync::Mutex;

use crate::external::quote_provider::QuoteProvider;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub quotes: Arc<dyn QuoteProvider>,
    // Serializes load-mutate-save cycles; two concurrent writers to the
    // same portfolio would otherwise race on the full-replace save.
    pub write_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(pool: SqlitePool, quotes: Arc<dyn QuoteProvider>) -> Self {
        Self {
            pool,
            quotes,
            write_lock: Arc::new(Mutex::new(())),
        }
    }
}
