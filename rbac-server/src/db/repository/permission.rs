//! Permission Repository

use super::{RepoError, RepoResult, parse_column};
use shared::models::Permission;
use sqlx::{SqliteConnection, SqlitePool};

#[derive(sqlx::FromRow)]
pub(crate) struct PermissionRow {
    id: i64,
    name: String,
    scope: String,
    status: String,
}

impl TryFrom<PermissionRow> for Permission {
    type Error = RepoError;

    fn try_from(row: PermissionRow) -> RepoResult<Self> {
        Ok(Self {
            id: row.id,
            name: parse_column(&row.name, "permission.name")?,
            scope: parse_column(&row.scope, "permission.scope")?,
            status: parse_column(&row.status, "permission.status")?,
        })
    }
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Permission>> {
    let rows = sqlx::query_as::<_, PermissionRow>(
        "SELECT id, name, scope, status FROM permission ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    rows.into_iter().map(Permission::try_from).collect()
}

/// Permission set of one role
pub async fn find_for_role(conn: &mut SqliteConnection, role_id: i64) -> RepoResult<Vec<Permission>> {
    let rows = sqlx::query_as::<_, PermissionRow>(
        "SELECT p.id, p.name, p.scope, p.status FROM permission p \
         JOIN role_permission rp ON rp.permission_id = p.id \
         WHERE rp.role_id = ? ORDER BY p.id",
    )
    .bind(role_id)
    .fetch_all(conn)
    .await?;
    rows.into_iter().map(Permission::try_from).collect()
}

/// Count how many of `ids` exist
pub async fn count_existing(conn: &mut SqliteConnection, ids: &[i64]) -> RepoResult<i64> {
    if ids.is_empty() {
        return Ok(0);
    }
    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!("SELECT COUNT(*) FROM permission WHERE id IN ({placeholders})");
    let mut query = sqlx::query_scalar::<_, i64>(&sql);
    for id in ids {
        query = query.bind(*id);
    }
    Ok(query.fetch_one(conn).await?)
}
