//! Role Repository

use super::{RepoError, RepoResult, parse_column, permission};
use async_trait::async_trait;
use shared::models::Role;
use sqlx::{SqliteConnection, SqlitePool};

#[derive(sqlx::FromRow)]
struct RoleRow {
    id: i64,
    name: String,
    status: String,
}

async fn load_permissions(conn: &mut SqliteConnection, row: RoleRow) -> RepoResult<Role> {
    let permissions = permission::find_for_role(conn, row.id).await?;
    Ok(Role {
        id: row.id,
        name: row.name,
        status: parse_column(&row.status, "role.status")?,
        permissions,
    })
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Role>> {
    let mut conn = pool.acquire().await?;
    let rows = sqlx::query_as::<_, RoleRow>("SELECT id, name, status FROM role ORDER BY id")
        .fetch_all(&mut *conn)
        .await?;

    let mut roles = Vec::with_capacity(rows.len());
    for row in rows {
        roles.push(load_permissions(&mut *conn, row).await?);
    }
    Ok(roles)
}

/// Role with its permission set
pub async fn find_with_permissions(pool: &SqlitePool, id: i64) -> RepoResult<Option<Role>> {
    let mut conn = pool.acquire().await?;
    let row = sqlx::query_as::<_, RoleRow>("SELECT id, name, status FROM role WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    match row {
        Some(row) => Ok(Some(load_permissions(&mut *conn, row).await?)),
        None => Ok(None),
    }
}

pub async fn find_by_name(pool: &SqlitePool, name: &str) -> RepoResult<Option<Role>> {
    let id: Option<i64> = sqlx::query_scalar("SELECT id FROM role WHERE name = ? LIMIT 1")
        .bind(name)
        .fetch_optional(pool)
        .await?;

    match id {
        Some(id) => find_with_permissions(pool, id).await,
        None => Ok(None),
    }
}

/// Replace the permission set of a role in one transaction
pub async fn replace_permissions(
    pool: &SqlitePool,
    role_id: i64,
    permission_ids: &[i64],
) -> RepoResult<Role> {
    let mut ids = permission_ids.to_vec();
    ids.sort_unstable();
    ids.dedup();

    let mut tx = pool.begin().await?;

    let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM role WHERE id = ?")
        .bind(role_id)
        .fetch_optional(&mut *tx)
        .await?;
    if exists.is_none() {
        return Err(RepoError::NotFound(format!("Role {role_id} not found")));
    }

    let found = permission::count_existing(&mut *tx, &ids).await?;
    if found != ids.len() as i64 {
        return Err(RepoError::Validation(
            "permissionIds contains unknown permission".into(),
        ));
    }

    sqlx::query("DELETE FROM role_permission WHERE role_id = ?")
        .bind(role_id)
        .execute(&mut *tx)
        .await?;

    for permission_id in &ids {
        sqlx::query("INSERT INTO role_permission (role_id, permission_id) VALUES (?, ?)")
            .bind(role_id)
            .bind(permission_id)
            .execute(&mut *tx)
            .await?;
    }

    sqlx::query("UPDATE role SET updated_at = ? WHERE id = ?")
        .bind(shared::util::now_millis())
        .bind(role_id)
        .execute(&mut *tx)
        .await?;

    let row = sqlx::query_as::<_, RoleRow>("SELECT id, name, status FROM role WHERE id = ?")
        .bind(role_id)
        .fetch_one(&mut *tx)
        .await?;
    let role = load_permissions(&mut *tx, row).await?;

    tx.commit().await?;
    Ok(role)
}

/// Role lookups needed by the permission enforcer
#[async_trait]
pub trait RoleDirectory: Send + Sync {
    async fn find_with_permissions(&self, role_id: i64) -> RepoResult<Option<Role>>;
}

/// SQLite-backed [`RoleDirectory`]
#[derive(Clone, Debug)]
pub struct RoleRepository {
    pool: SqlitePool,
}

impl RoleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleDirectory for RoleRepository {
    async fn find_with_permissions(&self, role_id: i64) -> RepoResult<Option<Role>> {
        find_with_permissions(&self.pool, role_id).await
    }
}
