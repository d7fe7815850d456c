//! Refresh token storage
//!
//! One opaque token per user. Every write path (issue, rotate) removes the
//! user's previous row in the same transaction as the insert, and the
//! `UNIQUE(user_id)` constraint backs that at the schema level.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Duration;
use ring::rand::{SecureRandom, SystemRandom};
use shared::util::now_millis;
use sqlx::{SqliteConnection, SqlitePool};

use super::{RepoError, RepoResult};

/// Random bytes per token (256 bits)
const TOKEN_BYTES: usize = 32;

/// Persisted refresh token
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct RefreshToken {
    pub id: i64,
    pub token: String,
    /// Expiry instant (Unix millis)
    pub expiry_date: i64,
    pub created_at: i64,
    pub updated_at: i64,
    pub user_id: i64,
}

impl RefreshToken {
    /// Valid strictly before `expiry_date`; a token is expired at its expiry instant
    pub fn is_valid_at(&self, now_ms: i64) -> bool {
        now_ms < self.expiry_date
    }
}

/// URL-safe base64 of 32 bytes from the system CSPRNG
fn generate_token_value(rng: &SystemRandom) -> RepoResult<String> {
    let mut bytes = [0u8; TOKEN_BYTES];
    rng.fill(&mut bytes)
        .map_err(|_| RepoError::Database("Failed to generate refresh token".into()))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

async fn insert(
    conn: &mut SqliteConnection,
    value: String,
    user_id: i64,
    ttl: Duration,
) -> RepoResult<RefreshToken> {
    let now = now_millis();
    let expiry_date = now + ttl.num_milliseconds();

    let token = sqlx::query_as::<_, RefreshToken>(
        "INSERT INTO refresh_token (token, expiry_date, created_at, updated_at, user_id) \
         VALUES (?, ?, ?, ?, ?) \
         RETURNING id, token, expiry_date, created_at, updated_at, user_id",
    )
    .bind(value)
    .bind(expiry_date)
    .bind(now)
    .bind(now)
    .bind(user_id)
    .fetch_one(conn)
    .await?;
    Ok(token)
}

/// Refresh token store over SQLite
#[derive(Clone, Debug)]
pub struct RefreshTokenRepository {
    pool: SqlitePool,
    rng: SystemRandom,
}

impl RefreshTokenRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            rng: SystemRandom::new(),
        }
    }

    /// Create a new token for `user_id`, replacing any existing one
    pub async fn issue_for(&self, user_id: i64, ttl: Duration) -> RepoResult<RefreshToken> {
        let value = generate_token_value(&self.rng)?;

        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM refresh_token WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        let token = insert(&mut *tx, value, user_id, ttl).await?;
        tx.commit().await?;

        Ok(token)
    }

    /// Look up a token that is still valid now; expired rows count as absent
    pub async fn find_valid(&self, value: &str) -> RepoResult<Option<RefreshToken>> {
        self.find_valid_at(value, now_millis()).await
    }

    pub async fn find_valid_at(&self, value: &str, now_ms: i64) -> RepoResult<Option<RefreshToken>> {
        let token = sqlx::query_as::<_, RefreshToken>(
            "SELECT id, token, expiry_date, created_at, updated_at, user_id \
             FROM refresh_token WHERE token = ?",
        )
        .bind(value)
        .fetch_optional(&self.pool)
        .await?;

        Ok(token.filter(|t| t.is_valid_at(now_ms)))
    }

    /// Consume `presented` and issue its replacement atomically
    ///
    /// Returns `None` when this transaction did not delete the presented row:
    /// another refresh already consumed it, or it expired after lookup.
    /// The prior token stays intact if any step fails.
    pub async fn rotate(
        &self,
        presented: &str,
        user_id: i64,
        ttl: Duration,
    ) -> RepoResult<Option<RefreshToken>> {
        let value = generate_token_value(&self.rng)?;

        let mut tx = self.pool.begin().await?;
        let consumed = sqlx::query(
            "DELETE FROM refresh_token WHERE token = ? AND user_id = ? AND expiry_date > ?",
        )
        .bind(presented)
        .bind(user_id)
        .bind(now_millis())
        .execute(&mut *tx)
        .await?;
        if consumed.rows_affected() != 1 {
            return Ok(None);
        }

        sqlx::query("DELETE FROM refresh_token WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        let token = insert(&mut *tx, value, user_id, ttl).await?;
        tx.commit().await?;

        Ok(Some(token))
    }

    /// Delete the user's token; no-op if none
    pub async fn revoke_for(&self, user_id: i64) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM refresh_token WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete one token by value; no-op if unknown
    pub async fn revoke(&self, value: &str) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM refresh_token WHERE token = ?")
            .bind(value)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Purge every row expired at `now_ms`
    pub async fn sweep_expired(&self, now_ms: i64) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM refresh_token WHERE expiry_date <= ?")
            .bind(now_ms)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Current token of a user, valid or not
    pub async fn find_by_user(&self, user_id: i64) -> RepoResult<Option<RefreshToken>> {
        let token = sqlx::query_as::<_, RefreshToken>(
            "SELECT id, token, expiry_date, created_at, updated_at, user_id \
             FROM refresh_token WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(token)
    }

    pub async fn count(&self) -> RepoResult<i64> {
        Ok(sqlx::query_scalar("SELECT COUNT(*) FROM refresh_token")
            .fetch_one(&self.pool)
            .await?)
    }
}
