use sqlx::{SqliteConnection, SqlitePool};

/// Insert-if-absent then select. Safe to call repeatedly with the same
/// username; the unique constraint makes the insert a no-op on repeats.
pub async fn get_or_create(conn: &mut SqliteConnection, username: &str) -> Result<i64, sqlx::Error> {
    sqlx::query("INSERT OR IGNORE INTO profiles (username) VALUES (?1)")
        .bind(username)
        .execute(&mut *conn)
        .await?;

    sqlx::query_scalar("SELECT id FROM profiles WHERE username = ?1")
        .bind(username)
        .fetch_one(&mut *conn)
        .await
}

/// All known usernames, sorted. Falls back to `default` when no profile
/// has been created yet.
pub async fn list(pool: &SqlitePool) -> Result<Vec<String>, sqlx::Error> {
    let usernames: Vec<String> = sqlx::query_scalar("SELECT username FROM profiles ORDER BY username")
        .fetch_all(pool)
        .await?;

    if usernames.is_empty() {
        return Ok(vec!["default".to_string()]);
    }
    Ok(usernames)
}
