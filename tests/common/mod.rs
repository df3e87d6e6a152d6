use std::net::SocketAddr;

use axum::{
    Router,
    body::Body,
    extract::connect_info::MockConnectInfo,
    http::{Request, StatusCode, header},
};
use serde_json::Value;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use rol_backend::{AppState, MIGRATOR, config::Config, router::create_router};

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test-secret".to_string(),
        jwt_expiration_secs: 12 * 3600,
        refresh_expiration_secs: 168 * 3600,
        sweep_interval_secs: 3600,
        server_host: "127.0.0.1".to_string(),
        server_port: 3000,
        api_base_uri: "/api".to_string(),
    }
}

/// 内存数据库上的完整应用, 对应原生产环境的路由与中间件
pub async fn test_app() -> (Router, SqlitePool) {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("connect in-memory sqlite");
    MIGRATOR.run(&pool).await.expect("run migrations");

    let state = AppState {
        pool: pool.clone(),
        config: test_config(),
    };
    let app = create_router(state)
        .layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 3000))));

    (app, pool)
}

pub async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

/// 注册 testuser 并用邮箱登录, 返回 (user_id, access_token)
pub async fn user_and_token(app: &Router) -> (i64, String) {
    let (status, body) = request(
        app,
        "POST",
        "/api/signup",
        None,
        Some(serde_json::json!({
            "username": "testuser",
            "email": "test@example.com",
            "password": "testpass"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let user_id = body["user_id"].as_i64().unwrap();

    let (status, body) = request(
        app,
        "POST",
        "/api/login",
        None,
        Some(serde_json::json!({
            "login_name": "test@example.com",
            "password": "testpass"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["access_token"].as_str().unwrap().to_string();

    (user_id, token)
}

/// 注册并登录另一个用户, 用于越权场景
#[allow(dead_code)]
pub async fn other_user_token(app: &Router) -> String {
    let (status, _) = request(
        app,
        "POST",
        "/api/signup",
        None,
        Some(serde_json::json!({
            "username": "otheruser",
            "email": "other@example.com",
            "password": "otherpass"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = request(
        app,
        "POST",
        "/api/login",
        None,
        Some(serde_json::json!({
            "login_name": "otheruser",
            "password": "otherpass"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["access_token"].as_str().unwrap().to_string()
}

/// 创建一个带基础属性的角色, 返回 character_id
#[allow(dead_code)]
pub async fn create_character(app: &Router, token: &str) -> i64 {
    let (status, body) = request(
        app,
        "POST",
        "/api/character",
        Some(token),
        Some(serde_json::json!({
            "name": "Carlos",
            "race": "Humano",
            "goal": "Ser leyenda",
            "background": "Heroico",
            "stats": {"FUE": 3, "AGI": 1, "MEN": 0, "CAR": 2}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["character_id"].as_i64().unwrap()
}
