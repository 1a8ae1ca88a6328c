use crate::models::{User, UserId};
use crate::storage::StorageError;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use sqlx::sqlite::SqlitePool;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Username taken")]
    UsernameTaken,
    #[error("password hashing failed: {0}")]
    Hash(argon2::password_hash::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        Self::Storage(StorageError::Database(err))
    }
}

type UserRow = (i64, String, String, Option<f64>);

fn user_from_row((id, username, password_hash, daily_goal): UserRow) -> User {
    User {
        id: UserId(id),
        username,
        password_hash,
        daily_goal,
    }
}

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(AuthError::Hash)
}

/// Constant-time check of `password` against a PHC hash string.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(err) => {
            warn!("stored password hash is unreadable: {err}");
            false
        }
    }
}

#[derive(Clone)]
pub struct UserStore {
    pool: SqlitePool,
}

impl UserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let hash = hash_password(password)?;
        let mut conn = self.pool.acquire().await?;
        let inserted = sqlx::query("INSERT INTO users (username, hash) VALUES (?, ?)")
            .bind(username)
            .bind(&hash)
            .execute(&mut *conn)
            .await;

        let id = match inserted {
            Ok(result) => result.last_insert_rowid(),
            Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
                return Err(AuthError::UsernameTaken);
            }
            Err(err) => return Err(err.into()),
        };

        info!(user_id = id, username, "user registered");
        Ok(User {
            id: UserId(id),
            username: username.to_string(),
            password_hash: hash,
            daily_goal: None,
        })
    }

    /// `None` for an unknown username or a wrong password.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, AuthError> {
        let mut conn = self.pool.acquire().await?;
        let row: Option<UserRow> =
            sqlx::query_as("SELECT id, username, hash, daily_goal FROM users WHERE username = ?")
                .bind(username)
                .fetch_optional(&mut *conn)
                .await?;

        let Some(user) = row.map(user_from_row) else {
            return Ok(None);
        };
        if !verify_password(password, &user.password_hash) {
            return Ok(None);
        }
        Ok(Some(user))
    }

    pub async fn find(&self, user_id: UserId) -> Result<Option<User>, AuthError> {
        let mut conn = self.pool.acquire().await?;
        let row: Option<UserRow> =
            sqlx::query_as("SELECT id, username, hash, daily_goal FROM users WHERE id = ?")
                .bind(user_id.0)
                .fetch_optional(&mut *conn)
                .await?;
        Ok(row.map(user_from_row))
    }

    pub async fn set_goal(&self, user_id: UserId, goal: f64) -> Result<(), AuthError> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query("UPDATE users SET daily_goal = ? WHERE id = ?")
            .bind(goal)
            .bind(user_id.0)
            .execute(&mut *conn)
            .await?;
        info!(user_id = %user_id, goal, "daily goal updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_are_salted_and_verify() {
        let first = hash_password("hunter2").unwrap();
        let second = hash_password("hunter2").unwrap();
        assert_ne!(first, second);
        assert!(verify_password("hunter2", &first));
        assert!(verify_password("hunter2", &second));
        assert!(!verify_password("hunter3", &first));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
