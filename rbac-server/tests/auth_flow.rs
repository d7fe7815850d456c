//! 登录 / 刷新 / 登出 端到端测试

mod common;

use common::{USER_ROLE, spawn_app};
use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn login_succeeds_with_correct_password() {
    let t = spawn_app().await;
    let body = t.login("alice", "wonderland").await;

    assert!(body["token"].as_str().is_some_and(|s| !s.is_empty()));
    assert_eq!(body["refreshToken"].as_str().map(str::len), Some(43));
    assert_eq!(body["user"]["name"], "alice");
    assert_eq!(body["user"]["roleId"], USER_ROLE);
    assert_eq!(body["user"]["roleName"], "USER");
}

#[tokio::test]
async fn login_with_wrong_password_is_401() {
    let t = spawn_app().await;
    let (status, body) = t
        .send(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "name": "alice", "password": "queen-of-hearts" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1002);
    assert_eq!(body["message"], "Invalid credentials");
}

#[tokio::test]
async fn login_with_unknown_user_looks_like_wrong_password() {
    let t = spawn_app().await;
    let (status, body) = t
        .send(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "name": "mallory", "password": "wonderland" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid credentials");
}

#[tokio::test]
async fn login_with_null_name_is_422() {
    let t = spawn_app().await;
    let (status, body) = t
        .send(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "name": null, "password": "wonderland" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 2);
    assert_eq!(body["message"], "name is required");
}

#[tokio::test]
async fn login_with_nothing_reports_both_fields() {
    let t = spawn_app().await;
    let (status, body) = t
        .send("POST", "/auth/login", None, Some(json!({ "password": "  " })))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "name is required, password is required");
}

#[tokio::test]
async fn login_with_wrong_field_types_is_422_json() {
    let t = spawn_app().await;
    let (status, body) = t
        .send("POST", "/auth/login", None, Some(json!({ "name": 5, "password": "x" })))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 2);
    assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));

    let (status, body) = t
        .send_raw("POST", "/auth/login", Some("application/json"), "[1, 2")
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 2);
}

#[tokio::test]
async fn refresh_with_unknown_token_is_401() {
    let t = spawn_app().await;
    let (status, body) = t
        .send(
            "POST",
            "/auth/refresh",
            None,
            Some(json!({ "refreshToken": "does-not-exist" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1005);
    assert_eq!(body["message"], "Invalid refresh token");
}

#[tokio::test]
async fn refresh_with_missing_or_null_token_is_401() {
    let t = spawn_app().await;
    for payload in [json!({}), json!({ "refreshToken": null }), json!({ "refreshToken": "" })] {
        let (status, body) = t.send("POST", "/auth/refresh", None, Some(payload)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid refresh token");
    }
}

#[tokio::test]
async fn refresh_without_json_body_is_401() {
    let t = spawn_app().await;

    let (status, body) = t.send("POST", "/auth/refresh", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1005);
    assert_eq!(body["message"], "Invalid refresh token");

    let (status, body) = t
        .send_raw("POST", "/auth/refresh", Some("text/plain"), "refreshToken=abc")
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1005);

    let (status, body) = t
        .send_raw("POST", "/auth/refresh", Some("application/json"), "{not json")
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid refresh token");
}

#[tokio::test]
async fn refresh_rotates_and_consumes_old_value() {
    let t = spawn_app().await;
    let login = t.login("alice", "wonderland").await;
    let first = login["refreshToken"].as_str().unwrap().to_string();

    let (status, rotated) = t
        .send("POST", "/auth/refresh", None, Some(json!({ "refreshToken": first })))
        .await;
    assert_eq!(status, StatusCode::OK);
    let second = rotated["refreshToken"].as_str().unwrap().to_string();
    assert_ne!(first, second);
    assert_eq!(rotated["user"]["name"], "alice");

    // Replay of the consumed value
    let (status, _) = t
        .send("POST", "/auth/refresh", None, Some(json!({ "refreshToken": first })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // New access token works on a protected route
    let token = rotated["token"].as_str().unwrap();
    let (status, me) = t.send("GET", "/auth/me", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["name"], "alice");
}

#[tokio::test]
async fn second_login_invalidates_first_refresh_token() {
    let t = spawn_app().await;
    let first = t.login("alice", "wonderland").await["refreshToken"].clone();
    let second = t.login("alice", "wonderland").await["refreshToken"].clone();

    let (status, _) = t
        .send("POST", "/auth/refresh", None, Some(json!({ "refreshToken": first })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = t
        .send("POST", "/auth/refresh", None, Some(json!({ "refreshToken": second })))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn logout_with_refresh_token_revokes_it() {
    let t = spawn_app().await;
    let refresh = t.login("alice", "wonderland").await["refreshToken"].clone();

    let (status, body) = t
        .send("POST", "/auth/logout", None, Some(json!({ "refreshToken": refresh })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 0);

    let (status, _) = t
        .send("POST", "/auth/refresh", None, Some(json!({ "refreshToken": refresh })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_with_expired_bearer_only() {
    let t = spawn_app().await;
    let refresh = t.login("alice", "wonderland").await["refreshToken"].clone();
    let expired = t.expired_token("alice", USER_ROLE);

    let (status, _) = t.send("POST", "/auth/logout", Some(&expired), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = t
        .send("POST", "/auth/refresh", None, Some(json!({ "refreshToken": refresh })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_without_anything_is_ok() {
    let t = spawn_app().await;
    let (status, _) = t.send("POST", "/auth/logout", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn health_is_public() {
    let t = spawn_app().await;
    let (status, body) = t.send("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}
