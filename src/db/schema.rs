use sqlx::{Row, SqlitePool};
use tracing::{info, warn};

use crate::db::profile_queries;

/// Creates the three tables if absent. Also handles the one-time upgrade
/// from the legacy single-column `portfolios` table: the old table is
/// renamed aside, the new schema is created, its rows are re-imported as
/// empty portfolios under the `default` profile, and the renamed table is
/// dropped. Migration failures are logged and never block startup.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    match detect_legacy_table(pool).await {
        Ok(true) => {
            info!("Legacy portfolios table detected, migrating to profile-scoped schema");
            if let Err(e) = sqlx::query("ALTER TABLE portfolios RENAME TO portfolios_legacy")
                .execute(pool)
                .await
            {
                warn!("Failed to rename legacy portfolios table: {}", e);
            }
        }
        Ok(false) => {}
        Err(e) => warn!("Legacy schema detection failed: {}", e),
    }

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS profiles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS portfolios (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            profile_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            UNIQUE(profile_id, name),
            FOREIGN KEY (profile_id) REFERENCES profiles(id) ON DELETE CASCADE
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS holdings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            portfolio_id INTEGER NOT NULL,
            symbol TEXT NOT NULL,
            quantity INTEGER NOT NULL,
            price REAL NOT NULL,
            FOREIGN KEY (portfolio_id) REFERENCES portfolios(id) ON DELETE CASCADE
        )",
    )
    .execute(pool)
    .await?;

    if let Err(e) = import_legacy_rows(pool).await {
        warn!("Legacy portfolio import failed: {}", e);
    }

    Ok(())
}

// The legacy table had exactly one column, `name`, with no profile scoping.
async fn detect_legacy_table(pool: &SqlitePool) -> Result<bool, sqlx::Error> {
    let columns = sqlx::query("PRAGMA table_info(portfolios)")
        .fetch_all(pool)
        .await?;

    if columns.len() != 1 {
        return Ok(false);
    }
    let name: String = columns[0].try_get("name")?;
    Ok(name.eq_ignore_ascii_case("name"))
}

async fn import_legacy_rows(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let renamed: Option<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'portfolios_legacy'",
    )
    .fetch_optional(pool)
    .await?;
    if renamed.is_none() {
        return Ok(());
    }

    let mut tx = pool.begin().await?;
    let profile_id = profile_queries::get_or_create(&mut tx, "default").await?;

    let names: Vec<String> = sqlx::query_scalar("SELECT name FROM portfolios_legacy")
        .fetch_all(&mut *tx)
        .await?;
    for name in &names {
        sqlx::query("INSERT OR IGNORE INTO portfolios (profile_id, name) VALUES (?1, ?2)")
            .bind(profile_id)
            .bind(name)
            .execute(&mut *tx)
            .await?;
    }

    sqlx::query("DROP TABLE portfolios_legacy")
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    info!(
        "Imported {} legacy portfolio(s) under the default profile",
        names.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn ensure_schema_is_idempotent() {
        let pool = test_pool().await;
        ensure_schema(&pool).await.unwrap();
        ensure_schema(&pool).await.unwrap();
    }

    #[tokio::test]
    async fn legacy_table_is_migrated_under_default_profile() {
        let pool = test_pool().await;

        sqlx::query("CREATE TABLE portfolios (name TEXT)")
            .execute(&pool)
            .await
            .unwrap();
        for name in ["Retirement", "Growth"] {
            sqlx::query("INSERT INTO portfolios (name) VALUES (?1)")
                .bind(name)
                .execute(&pool)
                .await
                .unwrap();
        }

        ensure_schema(&pool).await.unwrap();

        let portfolios = crate::db::portfolio_queries::load_all(&pool, "default")
            .await
            .unwrap();
        let names: Vec<&str> = portfolios.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Retirement", "Growth"]);
        assert!(portfolios.iter().all(|p| p.holdings().is_empty()));

        // The renamed table must be gone.
        let leftover: Option<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'portfolios_legacy'",
        )
        .fetch_optional(&pool)
        .await
        .unwrap();
        assert!(leftover.is_none());

        // Running again must not re-import anything.
        ensure_schema(&pool).await.unwrap();
        let portfolios = crate::db::portfolio_queries::load_all(&pool, "default")
            .await
            .unwrap();
        assert_eq!(portfolios.len(), 2);
    }
}
