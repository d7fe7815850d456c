//! 初始管理员账号
//!
//! 启动时若配置了 `ADMIN_PASSWORD` 且该用户不存在，则以 ADMIN 角色创建。

use shared::error::AppError;
use sqlx::SqlitePool;

use crate::auth::PasswordHasher;
use crate::db::repository::{role, user};

/// Create the admin account if it does not exist yet
///
/// Returns `true` when a user was created. An existing account is left
/// untouched, including its password.
pub async fn ensure_admin(
    pool: &SqlitePool,
    hasher: &dyn PasswordHasher,
    name: &str,
    password: &str,
) -> Result<bool, AppError> {
    if user::find_by_name(pool, name).await?.is_some() {
        tracing::debug!(name = %name, "Admin account already present");
        return Ok(false);
    }

    let admin_role = role::find_by_name(pool, "ADMIN")
        .await?
        .ok_or_else(|| AppError::internal("ADMIN role missing from seed data"))?;

    let password_hash = hasher
        .hash(password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;

    user::create(
        pool,
        user::NewUser {
            name: name.to_string(),
            display_name: "Administrator".to_string(),
            password_hash,
            role_id: admin_role.id,
        },
    )
    .await?;

    tracing::info!(name = %name, "Bootstrap admin account created");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Argon2Hasher;
    use crate::db::DbService;

    #[tokio::test]
    async fn test_ensure_admin_idempotent() {
        let db = DbService::in_memory().await.unwrap();
        let hasher = Argon2Hasher;

        assert!(ensure_admin(&db.pool, &hasher, "admin", "pw-1").await.unwrap());
        assert!(!ensure_admin(&db.pool, &hasher, "admin", "pw-2").await.unwrap());

        let admin = user::find_by_name(&db.pool, "admin").await.unwrap().unwrap();
        assert_eq!(admin.role_name, "ADMIN");
        assert!(hasher.verify("pw-1", &admin.password_hash));
    }
}
