use chrono::NaiveDate;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{Connection, SqliteConnection};
use std::path::Path;
use thiserror::Error;
use tokio::fs;
use tracing::info;

/// Highest schema version `migrate` knows how to reach.
pub const SCHEMA_VERSION: i64 = 2;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("failed to prepare database directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored date {value:?} is not a calendar date")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

pub async fn connect(path: &Path) -> Result<SqlitePool, StorageError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Brings the schema up to [`SCHEMA_VERSION`]. Safe to run on every start.
pub async fn migrate(pool: &SqlitePool) -> Result<(), StorageError> {
    let mut conn = pool.acquire().await?;
    let version = schema_version(&mut conn).await?;
    if version >= SCHEMA_VERSION {
        return Ok(());
    }

    let mut tx = conn.begin().await?;

    if version < 1 {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                hash TEXT NOT NULL
            )",
        )
        .execute(&mut *tx)
        .await?;

        // Tables created before usernames were constrained.
        sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS users_username ON users (username)")
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS progress (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                current REAL NOT NULL DEFAULT 0,
                actual REAL NOT NULL DEFAULT 0,
                date TEXT NOT NULL DEFAULT (DATE('now')),
                user_id INTEGER NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(id),
                UNIQUE (user_id, date)
            )",
        )
        .execute(&mut *tx)
        .await?;
    }

    if version < 2 {
        let has_goal: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM pragma_table_info('users') WHERE name = 'daily_goal'",
        )
        .fetch_one(&mut *tx)
        .await?;
        if has_goal == 0 {
            sqlx::query("ALTER TABLE users ADD COLUMN daily_goal REAL")
                .execute(&mut *tx)
                .await?;
        }
    }

    sqlx::query(&format!("PRAGMA user_version = {SCHEMA_VERSION}"))
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    info!(from = version, to = SCHEMA_VERSION, "database schema migrated");
    Ok(())
}

pub async fn schema_version(conn: &mut SqliteConnection) -> Result<i64, StorageError> {
    let version: i64 = sqlx::query_scalar("PRAGMA user_version")
        .fetch_one(&mut *conn)
        .await?;
    Ok(version)
}

pub(crate) fn date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn parse_date_key(value: String) -> Result<NaiveDate, StorageError> {
    NaiveDate::parse_from_str(&value, DATE_FORMAT)
        .map_err(|source| StorageError::InvalidDate { value, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_keys_are_iso_and_parse_back() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(date_key(date), "2026-03-07");
        assert_eq!(parse_date_key("2026-03-07".to_string()).unwrap(), date);
    }

    #[test]
    fn malformed_date_is_reported() {
        let err = parse_date_key("07/03/2026".to_string()).unwrap_err();
        assert!(matches!(err, StorageError::InvalidDate { ref value, .. } if value == "07/03/2026"));
    }
}
