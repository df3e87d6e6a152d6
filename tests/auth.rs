use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::{request, test_app, user_and_token};

#[tokio::test]
async fn signup_and_login() {
    let (app, _pool) = test_app().await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/signup",
        None,
        Some(json!({
            "username": "newuser",
            "email": "new@example.com",
            "password": "pass123"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["user_id"].as_i64().is_some());

    // 用户名或邮箱都可以作为登录标识
    for login_name in ["newuser", "new@example.com"] {
        let (status, body) = request(
            &app,
            "POST",
            "/api/login",
            None,
            Some(json!({"login_name": login_name, "password": "pass123"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["access_token"].as_str().is_some());
        assert!(body["refresh_token"].as_str().is_some());
    }
}

#[tokio::test]
async fn login_wrong_password_is_rejected() {
    let (app, _pool) = test_app().await;
    user_and_token(&app).await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/login",
        None,
        Some(json!({"login_name": "testuser", "password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].as_str().is_some());

    // 不存在的用户与密码错误返回完全一致
    let (status, _) = request(
        &app,
        "POST",
        "/api/login",
        None,
        Some(json!({"login_name": "ghost", "password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn signup_rejects_duplicates_and_missing_fields() {
    let (app, _pool) = test_app().await;
    user_and_token(&app).await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/signup",
        None,
        Some(json!({
            "username": "testuser",
            "email": "other@example.com",
            "password": "pw"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().is_some());

    let (status, _) = request(
        &app,
        "POST",
        "/api/signup",
        None,
        Some(json!({
            "username": "otheruser",
            "email": "test@example.com",
            "password": "pw"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = request(
        &app,
        "POST",
        "/api/signup",
        None,
        Some(json!({"username": "incomplete"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("email"));
}

#[tokio::test]
async fn userinfo_returns_authenticated_user() {
    let (app, _pool) = test_app().await;
    let (user_id, token) = user_and_token(&app).await;

    let (status, body) = request(&app, "GET", "/api/userinfo", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"].as_i64().unwrap(), user_id);
    assert_eq!(body["username"], "testuser");
    assert_eq!(body["email"], "test@example.com");
    assert!(body["created_at"].as_str().is_some());
}

#[tokio::test]
async fn protected_routes_require_valid_token() {
    let (app, _pool) = test_app().await;

    let (status, _) = request(&app, "GET", "/api/userinfo", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = request(&app, "GET", "/api/userinfo", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_creates_one_ledger_row_per_token() {
    let (app, pool) = test_app().await;
    let (user_id, _token) = user_and_token(&app).await;

    let rows: Vec<(String, i64, bool)> =
        sqlx::query_as("SELECT jti, user_id, revoked FROM tokens")
            .fetch_all(&pool)
            .await
            .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].1, user_id);
    assert!(!rows[0].2);
}

#[tokio::test]
async fn sequential_logins_get_distinct_jtis() {
    let (app, pool) = test_app().await;
    user_and_token(&app).await;

    let first_jti: String = sqlx::query_scalar("SELECT jti FROM tokens")
        .fetch_one(&pool)
        .await
        .unwrap();

    let (status, body) = request(
        &app,
        "POST",
        "/api/login",
        None,
        Some(json!({"login_name": "testuser", "password": "testpass"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let second_token = body["access_token"].as_str().unwrap().to_string();

    let jtis: Vec<String> = sqlx::query_scalar("SELECT jti FROM tokens ORDER BY rowid")
        .fetch_all(&pool)
        .await
        .unwrap();
    assert_eq!(jtis.len(), 2);
    assert_ne!(jtis[0], jtis[1]);

    // 吊销第一个令牌不影响第二个
    rol_backend::routes::auth::model::TokenRecord::mark_revoked(&pool, &first_jti)
        .await
        .unwrap();
    let (status, _) = request(&app, "GET", "/api/userinfo", Some(&second_token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn no_expire_login_issues_permanent_token() {
    let (app, pool) = test_app().await;
    user_and_token(&app).await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/login",
        None,
        Some(json!({
            "login_name": "testuser",
            "password": "testpass",
            "no_expire": true
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    // 永久令牌不配发刷新令牌
    assert!(body["refresh_token"].is_null());
    let token = body["access_token"].as_str().unwrap();

    let (permanent, has_expiry): (bool, bool) = sqlx::query_as(
        "SELECT permanent, expires_at IS NOT NULL FROM tokens ORDER BY rowid DESC LIMIT 1",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert!(permanent);
    assert!(!has_expiry);

    let (status, _) = request(&app, "GET", "/api/userinfo", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn refresh_issues_new_access_token() {
    let (app, _pool) = test_app().await;
    user_and_token(&app).await;

    let (_, body) = request(
        &app,
        "POST",
        "/api/login",
        None,
        Some(json!({"login_name": "testuser", "password": "testpass"})),
    )
    .await;
    let access_token = body["access_token"].as_str().unwrap().to_string();
    let refresh_token = body["refresh_token"].as_str().unwrap().to_string();

    let (status, body) = request(&app, "POST", "/api/refresh", Some(&refresh_token), None).await;
    assert_eq!(status, StatusCode::OK);
    let new_access = body["access_token"].as_str().unwrap().to_string();
    assert_ne!(new_access, access_token);

    let (status, _) = request(&app, "GET", "/api/userinfo", Some(&new_access), None).await;
    assert_eq!(status, StatusCode::OK);

    // 访问令牌不能当刷新令牌用
    let (status, _) = request(&app, "POST", "/api/refresh", Some(&access_token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn revoke_tokens_revokes_everything_and_counts() {
    let (app, _pool) = test_app().await;
    user_and_token(&app).await;

    // 两个普通令牌 + 一个永久令牌
    let mut tokens = Vec::new();
    for extra in [json!({}), json!({}), json!({"no_expire": true})] {
        let mut payload = json!({"login_name": "testuser", "password": "testpass"});
        payload
            .as_object_mut()
            .unwrap()
            .extend(extra.as_object().unwrap().clone());
        let (status, body) = request(&app, "POST", "/api/login", None, Some(payload)).await;
        assert_eq!(status, StatusCode::OK);
        tokens.push(body["access_token"].as_str().unwrap().to_string());
    }
    // user_and_token 自身也登录了一次, 共 3 个非永久 + 1 个永久
    let (status, body) = request(
        &app,
        "POST",
        "/api/revoke_tokens",
        None,
        Some(json!({"user": "testuser", "password": "testpass"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["revoked_total"].as_i64().unwrap(), 4);
    assert_eq!(body["revoked_persistent"].as_i64().unwrap(), 1);
    assert_eq!(body["revoked_temporal"].as_i64().unwrap(), 3);

    for token in &tokens {
        let (status, _) = request(&app, "GET", "/api/userinfo", Some(token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    // 全局登出后重新登录得到的新令牌仍然可用
    let (status, body) = request(
        &app,
        "POST",
        "/api/login",
        None,
        Some(json!({"login_name": "testuser", "password": "testpass"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let fresh = body["access_token"].as_str().unwrap();
    let (status, _) = request(&app, "GET", "/api/userinfo", Some(fresh), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn revoke_tokens_invalidates_refresh_tokens_too() {
    let (app, _pool) = test_app().await;
    user_and_token(&app).await;

    let (_, body) = request(
        &app,
        "POST",
        "/api/login",
        None,
        Some(json!({"login_name": "testuser", "password": "testpass"})),
    )
    .await;
    let refresh_token = body["refresh_token"].as_str().unwrap().to_string();

    let (status, _) = request(
        &app,
        "POST",
        "/api/revoke_tokens",
        None,
        Some(json!({"user": "testuser", "password": "testpass"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // 刷新令牌没有账本行, 全局登出只能靠 last_logout 拦截它
    let (status, _) = request(&app, "POST", "/api/refresh", Some(&refresh_token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn revoke_tokens_requires_credentials() {
    let (app, _pool) = test_app().await;
    user_and_token(&app).await;

    let (status, _) = request(
        &app,
        "POST",
        "/api/revoke_tokens",
        None,
        Some(json!({"user": "testuser", "password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
