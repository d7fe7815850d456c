//! 认证与授权中间件
//!
//! 两个中间件都只挂在受保护的路由上 (`route_layer`)：
//! - [`require_auth`] 解析 Bearer 令牌并注入 [`CurrentUser`]
//! - [`enforce_route_access`] 按 [`ROUTE_ACCESS`](super::permissions::ROUTE_ACCESS) 表检查权限

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use shared::error::AppError;

use crate::auth::permissions::{self, Access};
use crate::auth::{CurrentUser, JwtService, TokenError};
use crate::core::ServerState;
use crate::security_log;

/// 认证中间件
///
/// 从 `Authorization: Bearer <token>` 头提取并验证 JWT，成功后将
/// [`CurrentUser`] 注入请求扩展。
///
/// | 情况 | 结果 |
/// |------|------|
/// | 无 Authorization 头 / 非 Bearer 格式 | 以未认证身份继续 |
/// | 令牌过期 | 401 TokenExpired |
/// | 格式错误 / 签名错误 | 401 TokenInvalid |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(JwtService::extract_from_header)
        .map(str::to_owned);

    let Some(token) = token else {
        return Ok(next.run(req).await);
    };

    match state.jwt_service.verify(&token) {
        Ok(claims) => {
            req.extensions_mut().insert(CurrentUser::from(claims));
            Ok(next.run(req).await)
        }
        Err(TokenError::Expired(claims)) => {
            security_log!(
                "WARN",
                "token_expired",
                username = claims.sub.clone(),
                uri = req.uri().to_string()
            );
            Err(AppError::token_expired())
        }
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = e.to_string(),
                uri = req.uri().to_string()
            );
            Err(AppError::invalid_token())
        }
    }
}

/// 路由权限守卫
///
/// 无身份 → 401；路由不在表中 → 403；`Authenticated` → 放行；
/// `Permission` → [`PermissionEnforcer::authorize`](crate::auth::PermissionEnforcer::authorize)。
pub async fn enforce_route_access(
    State(state): State<ServerState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(user) = req.extensions().get::<CurrentUser>().cloned() else {
        security_log!("WARN", "auth_missing", uri = req.uri().to_string());
        return Err(AppError::unauthorized());
    };

    let access = req
        .extensions()
        .get::<MatchedPath>()
        .and_then(|path| permissions::lookup(req.method(), path.as_str()));

    match access {
        Some(Access::Authenticated) => {}
        Some(Access::Permission(name, scope)) => {
            state.enforcer.authorize(&user, name, scope).await?;
        }
        None => {
            security_log!(
                "ERROR",
                "route_unmapped",
                method = req.method().to_string(),
                uri = req.uri().to_string()
            );
            return Err(AppError::forbidden());
        }
    }

    Ok(next.run(req).await)
}
