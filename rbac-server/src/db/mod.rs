//! Database Module
//!
//! Handles SQLite connection pool and migrations

pub mod bootstrap;
pub mod repository;

use shared::error::AppError;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::str::FromStr;
use std::time::Duration;

/// Database service, owns a SQLite connection pool
#[derive(Clone, Debug)]
pub struct DbService {
    pub pool: SqlitePool,
}

impl DbService {
    /// Open (or create) the database with WAL mode and run migrations
    ///
    /// `:memory:` opens a private in-memory database on a single connection.
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        if db_path == ":memory:" {
            return Self::in_memory().await;
        }

        // Build connection options: WAL, foreign keys, normal sync
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))
            .map_err(|e| AppError::database(format!("Invalid database path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            // busy_timeout: 写冲突时等待 5s 而非立即失败
            .busy_timeout(Duration::from_secs(5))
            .optimize_on_close(true, None);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        tracing::info!(path = %db_path, "Database connection established (SQLite WAL, busy_timeout=5000ms)");

        Self::migrate(pool).await
    }

    /// Private in-memory database with the full schema and seed data
    ///
    /// Every connection to `:memory:` is a different database, so the pool is
    /// pinned to one connection that never expires.
    pub async fn in_memory() -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| AppError::database(format!("Invalid database path: {e}")))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        Self::migrate(pool).await
    }

    async fn migrate(pool: SqlitePool) -> Result<Self, AppError> {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply migrations: {e}")))?;
        tracing::info!("Database migrations applied");

        Ok(Self { pool })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rbac.db");
        let db = DbService::new(path.to_str().unwrap()).await.unwrap();

        let roles: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM role")
            .fetch_one(&db.pool)
            .await
            .unwrap();
        assert_eq!(roles, 2);
        assert!(path.exists());

        // Reopening applies no migration twice
        drop(db);
        let db = DbService::new(path.to_str().unwrap()).await.unwrap();
        let perms: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM permission")
            .fetch_one(&db.pool)
            .await
            .unwrap();
        assert_eq!(perms, 16);
    }

    #[tokio::test]
    async fn test_foreign_keys_enforced() {
        let db = DbService::in_memory().await.unwrap();
        let result = sqlx::query(
            "INSERT INTO refresh_token (token, expiry_date, created_at, updated_at, user_id) \
             VALUES ('x', 0, 0, 0, 424242)",
        )
        .execute(&db.pool)
        .await;
        assert!(result.is_err());
    }
}
