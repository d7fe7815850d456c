//! 集成测试公共工具
//!
//! 内存数据库 + 完整路由，通过 `oneshot` 直接驱动，不监听端口。

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use rbac_server::auth::{Argon2Hasher, IdentityClaims, JwtConfig, PasswordHasher};
use rbac_server::db::repository::user;
use rbac_server::{Config, ServerState};
use serde_json::Value;
use tower::ServiceExt;

pub const SECRET: &str = "integration-test-secret-0123456789-abcdef";

pub const ADMIN_ROLE: i64 = 1;
pub const USER_ROLE: i64 = 2;

pub struct TestApp {
    pub app: Router,
    pub state: ServerState,
}

/// `admin` (ADMIN role) and `alice` (USER role) are created up front
pub async fn spawn_app() -> TestApp {
    let config = Config::with_jwt(JwtConfig::with_secret(SECRET));
    let state = ServerState::initialize(&config).await.unwrap();

    create_user(&state, "admin", "admin-pass", ADMIN_ROLE).await;
    create_user(&state, "alice", "wonderland", USER_ROLE).await;

    let app = rbac_server::api::build_app(state.clone());
    TestApp { app, state }
}

pub async fn create_user(state: &ServerState, name: &str, password: &str, role_id: i64) -> i64 {
    user::create(
        state.pool(),
        user::NewUser {
            name: name.into(),
            display_name: name.to_uppercase(),
            password_hash: Argon2Hasher.hash(password).unwrap(),
            role_id,
        },
    )
    .await
    .unwrap()
    .id
}

impl TestApp {
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        bearer: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = bearer {
            builder = builder.header(http::header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.dispatch(request).await
    }

    /// Sends `body` verbatim, for payloads that are not JSON at all
    pub async fn send_raw(
        &self,
        method: &str,
        uri: &str,
        content_type: Option<&str>,
        body: &'static str,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(content_type) = content_type {
            builder = builder.header(http::header::CONTENT_TYPE, content_type);
        }
        self.dispatch(builder.body(Body::from(body)).unwrap()).await
    }

    async fn dispatch(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn login(&self, name: &str, password: &str) -> Value {
        let (status, body) = self
            .send(
                "POST",
                "/auth/login",
                None,
                Some(serde_json::json!({ "name": name, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login {name}: {body}");
        body
    }

    pub async fn access_token(&self, name: &str, password: &str) -> String {
        self.login(name, password).await["token"]
            .as_str()
            .unwrap()
            .to_string()
    }

    /// Signed with the server secret but already past `exp`
    pub fn expired_token(&self, name: &str, role_id: i64) -> String {
        self.state
            .jwt_service
            .issue(
                name,
                &IdentityClaims {
                    name: name.to_uppercase(),
                    role_id,
                },
                chrono::Duration::seconds(-60),
            )
            .unwrap()
    }
}
