use crate::models::UserId;
use crate::storage::{date_key, parse_date_key, StorageError};
use chrono::{Duration, NaiveDate};
use sqlx::sqlite::SqlitePool;
use sqlx::{Connection, SqliteConnection};
use tracing::debug;

/// Days kept before today; the window `[today - RETENTION_DAYS, today]` holds 31 days.
pub const RETENTION_DAYS: i64 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressRecord {
    pub id: i64,
    pub user_id: UserId,
    pub date: NaiveDate,
    pub current: f64,
    pub actual: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayProgress {
    pub date: NaiveDate,
    pub current: f64,
}

/// Outcome of a [`ProgressLedger::reconcile`] pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reconciliation {
    pub today_current: f64,
    pub first_date: NaiveDate,
    pub pruned: u64,
    pub backfilled: u64,
}

pub fn retention_start(today: NaiveDate) -> NaiveDate {
    today - Duration::days(RETENTION_DAYS)
}

/// Per-user, per-day water intake rows.
#[derive(Clone)]
pub struct ProgressLedger {
    pool: SqlitePool,
}

impl ProgressLedger {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Backfills the retention window, prunes rows that fell out of it and
    /// returns today's running total.
    ///
    /// Idempotent. The steps are not one transaction, so a pass interrupted
    /// by a storage error is repaired by calling this again.
    pub async fn reconcile(
        &self,
        user_id: UserId,
        today: NaiveDate,
    ) -> Result<Reconciliation, StorageError> {
        let mut conn = self.pool.acquire().await?;

        let first: Option<String> =
            sqlx::query_scalar("SELECT MIN(date) FROM progress WHERE user_id = ?")
                .bind(user_id.0)
                .fetch_one(&mut *conn)
                .await?;
        let first_date = match first {
            Some(value) => parse_date_key(value)?,
            None => {
                ensure_day(&mut conn, user_id, today).await?;
                debug!(user_id = %user_id, "first progress record created");
                today
            }
        };

        let start = retention_start(today);
        let pruned = sqlx::query("DELETE FROM progress WHERE user_id = ? AND date < ?")
            .bind(user_id.0)
            .bind(date_key(start))
            .execute(&mut *conn)
            .await?
            .rows_affected();

        let backfilled = backfill(&mut conn, user_id, start, today).await?;
        ensure_day(&mut conn, user_id, today).await?;

        let today_current: f64 =
            sqlx::query_scalar("SELECT current FROM progress WHERE user_id = ? AND date = ?")
                .bind(user_id.0)
                .bind(date_key(today))
                .fetch_one(&mut *conn)
                .await?;

        debug!(
            user_id = %user_id,
            %first_date,
            pruned,
            backfilled,
            today_current,
            "ledger reconciled"
        );

        Ok(Reconciliation {
            today_current,
            first_date,
            pruned,
            backfilled,
        })
    }

    /// Adds `delta` to the day's total. Returns 0 when the day has no record.
    pub async fn increment(
        &self,
        user_id: UserId,
        date: NaiveDate,
        delta: f64,
    ) -> Result<f64, StorageError> {
        let mut conn = self.pool.acquire().await?;
        let updated: Option<f64> = sqlx::query_scalar(
            "UPDATE progress SET current = current + ?
             WHERE user_id = ? AND date = ?
             RETURNING current",
        )
        .bind(delta)
        .bind(user_id.0)
        .bind(date_key(date))
        .fetch_optional(&mut *conn)
        .await?;

        if updated.is_none() {
            debug!(user_id = %user_id, %date, "increment on missing day ignored");
        }
        Ok(updated.unwrap_or(0.0))
    }

    pub async fn reset(&self, user_id: UserId, date: NaiveDate) -> Result<f64, StorageError> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query("UPDATE progress SET current = 0 WHERE user_id = ? AND date = ?")
            .bind(user_id.0)
            .bind(date_key(date))
            .execute(&mut *conn)
            .await?;
        Ok(0.0)
    }

    pub async fn current(
        &self,
        user_id: UserId,
        date: NaiveDate,
    ) -> Result<Option<f64>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        let current: Option<f64> =
            sqlx::query_scalar("SELECT current FROM progress WHERE user_id = ? AND date = ?")
                .bind(user_id.0)
                .bind(date_key(date))
                .fetch_optional(&mut *conn)
                .await?;
        Ok(current)
    }

    /// Stored days in `[start, end]`, oldest first. Days without a row are skipped.
    pub async fn range_query(
        &self,
        user_id: UserId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DayProgress>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        let rows: Vec<(String, f64)> = sqlx::query_as(
            "SELECT date, current FROM progress
             WHERE user_id = ? AND date >= ? AND date <= ?
             ORDER BY date",
        )
        .bind(user_id.0)
        .bind(date_key(start))
        .bind(date_key(end))
        .fetch_all(&mut *conn)
        .await?;

        rows.into_iter()
            .map(|(date, current)| {
                Ok(DayProgress {
                    date: parse_date_key(date)?,
                    current,
                })
            })
            .collect()
    }

    pub async fn records(&self, user_id: UserId) -> Result<Vec<ProgressRecord>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        let rows: Vec<(i64, String, f64, f64)> = sqlx::query_as(
            "SELECT id, date, current, actual FROM progress WHERE user_id = ? ORDER BY date",
        )
        .bind(user_id.0)
        .fetch_all(&mut *conn)
        .await?;

        rows.into_iter()
            .map(|(id, date, current, actual)| {
                Ok(ProgressRecord {
                    id,
                    user_id,
                    date: parse_date_key(date)?,
                    current,
                    actual,
                })
            })
            .collect()
    }
}

async fn backfill(
    conn: &mut SqliteConnection,
    user_id: UserId,
    start: NaiveDate,
    today: NaiveDate,
) -> Result<u64, StorageError> {
    let mut tx = conn.begin().await?;
    let mut inserted = 0;
    let mut day = start;
    while day <= today {
        inserted += sqlx::query(
            "INSERT OR IGNORE INTO progress (user_id, date, current, actual) VALUES (?, ?, 0, 0)",
        )
        .bind(user_id.0)
        .bind(date_key(day))
        .execute(&mut *tx)
        .await?
        .rows_affected();
        day += Duration::days(1);
    }
    tx.commit().await?;
    Ok(inserted)
}

async fn ensure_day(
    conn: &mut SqliteConnection,
    user_id: UserId,
    day: NaiveDate,
) -> Result<(), StorageError> {
    let inserted = sqlx::query("INSERT INTO progress (user_id, date) VALUES (?, ?)")
        .bind(user_id.0)
        .bind(date_key(day))
        .execute(&mut *conn)
        .await;

    match inserted {
        Ok(_) => Ok(()),
        Err(sqlx::Error::Database(err)) if err.is_unique_violation() => Ok(()),
        Err(err) => Err(err.into()),
    }
}
