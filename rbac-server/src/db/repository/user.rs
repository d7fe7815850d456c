//! User Repository

use super::{RepoError, RepoResult, parse_column};
use async_trait::async_trait;
use shared::models::{Status, User};
use sqlx::SqlitePool;

/// User row joined with its role, including the password hash
///
/// Never serialized; [`UserRecord::to_public`] strips the hash.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub display_name: String,
    pub password_hash: String,
    pub role_id: i64,
    pub role_name: String,
    pub role_status: Status,
    pub status: Status,
    pub created_at: i64,
    pub updated_at: i64,
}

impl UserRecord {
    /// Both the user and its role are ACTIVE
    pub fn can_sign_in(&self) -> bool {
        self.status.is_active() && self.role_status.is_active()
    }

    pub fn to_public(&self) -> User {
        User {
            id: self.id,
            name: self.name.clone(),
            display_name: self.display_name.clone(),
            role_id: self.role_id,
            role_name: self.role_name.clone(),
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    display_name: String,
    password_hash: String,
    role_id: i64,
    role_name: String,
    role_status: String,
    status: String,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = RepoError;

    fn try_from(row: UserRow) -> RepoResult<Self> {
        Ok(Self {
            id: row.id,
            name: row.name,
            display_name: row.display_name,
            password_hash: row.password_hash,
            role_id: row.role_id,
            role_name: row.role_name,
            role_status: parse_column(&row.role_status, "role.status")?,
            status: parse_column(&row.status, "user.status")?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const SELECT_USER: &str = "SELECT u.id, u.name, u.display_name, u.password_hash, u.role_id, \
     r.name AS role_name, r.status AS role_status, u.status, u.created_at, u.updated_at \
     FROM user u JOIN role r ON r.id = u.role_id";

/// New user data (password already hashed)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub display_name: String,
    pub password_hash: String,
    pub role_id: i64,
}

pub async fn find_by_name(pool: &SqlitePool, name: &str) -> RepoResult<Option<UserRecord>> {
    let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE u.name = ? LIMIT 1"))
        .bind(name)
        .fetch_optional(pool)
        .await?;
    row.map(UserRecord::try_from).transpose()
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<UserRecord>> {
    let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE u.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.map(UserRecord::try_from).transpose()
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<UserRecord>> {
    let rows = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} ORDER BY u.name"))
        .fetch_all(pool)
        .await?;
    rows.into_iter().map(UserRecord::try_from).collect()
}

pub async fn create(pool: &SqlitePool, data: NewUser) -> RepoResult<UserRecord> {
    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO user (name, display_name, password_hash, role_id, status, created_at, updated_at) \
         VALUES (?, ?, ?, ?, 'ACTIVE', ?, ?) RETURNING id",
    )
    .bind(&data.name)
    .bind(&data.display_name)
    .bind(&data.password_hash)
    .bind(data.role_id)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

pub async fn update_password(pool: &SqlitePool, id: i64, password_hash: &str) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE user SET password_hash = ?, updated_at = ? WHERE id = ?")
        .bind(password_hash)
        .bind(shared::util::now_millis())
        .bind(id)
        .execute(pool)
        .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id} not found")));
    }
    Ok(())
}

pub async fn update_status(pool: &SqlitePool, id: i64, status: Status) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE user SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status.as_str())
        .bind(shared::util::now_millis())
        .bind(id)
        .execute(pool)
        .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id} not found")));
    }
    Ok(())
}

pub async fn update_role(pool: &SqlitePool, id: i64, role_id: i64) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE user SET role_id = ?, updated_at = ? WHERE id = ?")
        .bind(role_id)
        .bind(shared::util::now_millis())
        .bind(id)
        .execute(pool)
        .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id} not found")));
    }
    Ok(())
}

/// Delete a user; `false` when no row matched
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM user WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// User lookups needed by authentication
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_name(&self, name: &str) -> RepoResult<Option<UserRecord>>;

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<UserRecord>>;
}

/// SQLite-backed [`UserDirectory`]
#[derive(Clone, Debug)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for UserRepository {
    async fn find_by_name(&self, name: &str) -> RepoResult<Option<UserRecord>> {
        find_by_name(&self.pool, name).await
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<UserRecord>> {
        find_by_id(&self.pool, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    fn new_user(name: &str, role_id: i64) -> NewUser {
        NewUser {
            name: name.to_string(),
            display_name: format!("{name} display"),
            password_hash: "$argon2id$fake".to_string(),
            role_id,
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let db = DbService::in_memory().await.unwrap();
        let created = create(&db.pool, new_user("alice", 2)).await.unwrap();

        assert_eq!(created.role_name, "USER");
        assert!(created.can_sign_in());

        let by_name = find_by_name(&db.pool, "alice").await.unwrap().unwrap();
        assert_eq!(by_name.id, created.id);
        let by_id = find_by_id(&db.pool, created.id).await.unwrap().unwrap();
        assert_eq!(by_id.name, "alice");

        assert!(find_by_name(&db.pool, "nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_name() {
        let db = DbService::in_memory().await.unwrap();
        create(&db.pool, new_user("alice", 2)).await.unwrap();
        let err = create(&db.pool, new_user("alice", 1)).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_inactive_cannot_sign_in() {
        let db = DbService::in_memory().await.unwrap();
        let user = create(&db.pool, new_user("carol", 2)).await.unwrap();
        update_status(&db.pool, user.id, Status::Inactive).await.unwrap();

        let user = find_by_id(&db.pool, user.id).await.unwrap().unwrap();
        assert!(!user.can_sign_in());
    }

    #[tokio::test]
    async fn test_delete() {
        let db = DbService::in_memory().await.unwrap();
        let user = create(&db.pool, new_user("dave", 2)).await.unwrap();

        assert!(delete(&db.pool, user.id).await.unwrap());
        assert!(!delete(&db.pool, user.id).await.unwrap());
        assert!(find_by_id(&db.pool, user.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_public_view_has_no_hash() {
        let db = DbService::in_memory().await.unwrap();
        let user = create(&db.pool, new_user("erin", 1)).await.unwrap();
        let json = serde_json::to_value(user.to_public()).unwrap();

        assert_eq!(json["roleName"], "ADMIN");
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
    }
}
