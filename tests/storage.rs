use tempfile::TempDir;
use water_tracker::models::UserId;
use water_tracker::storage::{schema_version, SCHEMA_VERSION};
use water_tracker::users::{AuthError, UserStore};
use water_tracker::{connect, migrate};

async fn open() -> (TempDir, sqlx::SqlitePool) {
    let dir = tempfile::tempdir().expect("temp dir");
    let pool = connect(&dir.path().join("nested/dir/water.db"))
        .await
        .expect("connect");
    (dir, pool)
}

async fn has_column(pool: &sqlx::SqlitePool, table: &str, column: &str) -> bool {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM pragma_table_info(?) WHERE name = ?")
            .bind(table)
            .bind(column)
            .fetch_one(pool)
            .await
            .unwrap();
    count == 1
}

#[tokio::test]
async fn migrate_creates_schema_and_is_idempotent() {
    let (_dir, pool) = open().await;
    migrate(&pool).await.unwrap();
    migrate(&pool).await.unwrap();

    let mut conn = pool.acquire().await.unwrap();
    assert_eq!(schema_version(&mut conn).await.unwrap(), SCHEMA_VERSION);
    assert!(has_column(&pool, "users", "daily_goal").await);
    assert!(has_column(&pool, "progress", "actual").await);
}

#[tokio::test]
async fn migrate_upgrades_a_legacy_users_table() {
    let (_dir, pool) = open().await;
    sqlx::query(
        "CREATE TABLE users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL,
            hash TEXT NOT NULL
        )",
    )
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query("INSERT INTO users (username, hash) VALUES ('old', 'x')")
        .execute(&pool)
        .await
        .unwrap();

    migrate(&pool).await.unwrap();

    assert!(has_column(&pool, "users", "daily_goal").await);
    let kept: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = 'old'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(kept, 1);

    let users = UserStore::new(pool.clone());
    assert!(matches!(
        users.register("old", "pw").await,
        Err(AuthError::UsernameTaken)
    ));
}

#[tokio::test]
async fn legacy_table_that_already_has_the_goal_column() {
    let (_dir, pool) = open().await;
    sqlx::query(
        "CREATE TABLE users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL,
            hash TEXT NOT NULL,
            daily_goal REAL
        )",
    )
    .execute(&pool)
    .await
    .unwrap();

    migrate(&pool).await.unwrap();
    let mut conn = pool.acquire().await.unwrap();
    assert_eq!(schema_version(&mut conn).await.unwrap(), SCHEMA_VERSION);
}

#[tokio::test]
async fn register_then_authenticate() {
    let (_dir, pool) = open().await;
    migrate(&pool).await.unwrap();
    let users = UserStore::new(pool);

    let created = users.register("ada", "lovelace").await.unwrap();
    assert_eq!(created.daily_goal, None);
    assert_ne!(created.password_hash, "lovelace");

    let found = users.authenticate("ada", "lovelace").await.unwrap().unwrap();
    assert_eq!(found.id, created.id);
    assert!(users.authenticate("ada", "babbage").await.unwrap().is_none());
    assert!(users.authenticate("nobody", "lovelace").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_username_is_taken() {
    let (_dir, pool) = open().await;
    migrate(&pool).await.unwrap();
    let users = UserStore::new(pool);

    users.register("ada", "one").await.unwrap();
    let err = users.register("ada", "two").await.unwrap_err();
    assert!(matches!(err, AuthError::UsernameTaken));
    assert!(users.authenticate("ada", "one").await.unwrap().is_some());
}

#[tokio::test]
async fn goal_is_persisted() {
    let (_dir, pool) = open().await;
    migrate(&pool).await.unwrap();
    let users = UserStore::new(pool);

    let user = users.register("grace", "hopper").await.unwrap();
    users.set_goal(user.id, 3258.5).await.unwrap();

    let found = users.find(user.id).await.unwrap().unwrap();
    assert_eq!(found.daily_goal, Some(3258.5));
    let signed_in = users.authenticate("grace", "hopper").await.unwrap().unwrap();
    assert_eq!(signed_in.daily_goal, Some(3258.5));

    assert!(users.find(UserId(9_999)).await.unwrap().is_none());
}
