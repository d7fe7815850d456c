//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 登录、刷新、登出、当前身份
//! - [`profile`] - 当前用户资料和改密
//! - [`users`] - 用户管理
//! - [`roles`] - 角色和角色权限
//! - [`permissions`] - 权限列表
//!
//! 受保护路由统一挂两个 `route_layer`：先 [`require_auth`] 再
//! [`enforce_route_access`]。公共路由不经过它们。

pub mod auth;
pub mod health;
pub mod permissions;
pub mod profile;
pub mod roles;
pub mod users;

use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::auth::{enforce_route_access, require_auth};
use crate::core::ServerState;

/// Build the full application router
pub fn build_app(state: ServerState) -> Router {
    let public = Router::new()
        .merge(auth::router())
        .merge(health::router());

    // Layers added later run first: require_auth → enforce_route_access → handler
    let protected = Router::new()
        .merge(auth::protected_router())
        .merge(profile::router())
        .merge(users::router())
        .merge(roles::router())
        .merge(permissions::router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            enforce_route_access,
        ))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(middleware::from_fn(log_request))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let status = response.status();

    tracing::info!(target: "http_access", "{} {} {}", method, uri, status);

    response
}
