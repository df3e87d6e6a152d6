use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;

use rol_backend::routes::auth::model::TokenRecord;

mod common;
use common::{request, test_app, user_and_token};

async fn login(app: &axum::Router, no_expire: bool) -> String {
    let (status, body) = request(
        app,
        "POST",
        "/api/login",
        None,
        Some(json!({
            "login_name": "testuser",
            "password": "testpass",
            "no_expire": no_expire
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["access_token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn expired_token_is_lazily_revoked() {
    let (app, pool) = test_app().await;
    let (_, token) = user_and_token(&app).await;

    sqlx::query("UPDATE tokens SET expires_at = ?")
        .bind(Utc::now() - Duration::hours(1))
        .execute(&pool)
        .await
        .unwrap();

    let (status, _) = request(&app, "GET", "/api/userinfo", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // 过期检查的副作用: 账本行被标记吊销
    let revoked: bool = sqlx::query_scalar("SELECT revoked FROM tokens")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!(revoked);

    // 再次使用仍然是 401, 无进一步副作用
    let (status, _) = request(&app, "GET", "/api/userinfo", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn revoked_token_is_rejected() {
    let (app, pool) = test_app().await;
    let (_, token) = user_and_token(&app).await;

    let jti: String = sqlx::query_scalar("SELECT jti FROM tokens")
        .fetch_one(&pool)
        .await
        .unwrap();
    TokenRecord::mark_revoked(&pool, &jti).await.unwrap();

    let (status, _) = request(&app, "GET", "/api/userinfo", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_without_ledger_row_is_rejected() {
    let (app, pool) = test_app().await;
    let (_, token) = user_and_token(&app).await;

    sqlx::query("DELETE FROM tokens").execute(&pool).await.unwrap();

    let (status, _) = request(&app, "GET", "/api/userinfo", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_of_deleted_user_is_rejected() {
    let (app, pool) = test_app().await;
    let (user_id, token) = user_and_token(&app).await;

    sqlx::query("DELETE FROM tokens WHERE user_id = ?")
        .bind(user_id)
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(user_id)
        .execute(&pool)
        .await
        .unwrap();

    let (status, _) = request(&app, "GET", "/api/userinfo", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn sweep_revokes_only_naturally_expired_tokens() {
    let (app, pool) = test_app().await;
    user_and_token(&app).await;

    // 三个普通令牌和一个永久令牌
    login(&app, false).await;
    login(&app, false).await;
    login(&app, true).await;

    // 把前两个普通令牌改成已过期
    let jtis: Vec<String> =
        sqlx::query_scalar("SELECT jti FROM tokens WHERE permanent = 0 ORDER BY rowid LIMIT 2")
            .fetch_all(&pool)
            .await
            .unwrap();
    for jti in &jtis {
        sqlx::query("UPDATE tokens SET expires_at = ? WHERE jti = ?")
            .bind(Utc::now() - Duration::minutes(5))
            .bind(jti)
            .execute(&pool)
            .await
            .unwrap();
    }

    let swept = TokenRecord::sweep_expired(&pool).await.unwrap();
    assert_eq!(swept, 2);

    // 幂等: 第二次清扫没有可改的行
    let swept = TokenRecord::sweep_expired(&pool).await.unwrap();
    assert_eq!(swept, 0);

    // 永久令牌与未过期令牌不受影响
    let untouched: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM tokens WHERE revoked = 0")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(untouched, 2);
    let permanent_revoked: bool =
        sqlx::query_scalar("SELECT revoked FROM tokens WHERE permanent = 1")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(!permanent_revoked);
}

#[tokio::test]
async fn tokens_issued_before_global_logout_stay_dead() {
    let (app, pool) = test_app().await;
    let (_, token) = user_and_token(&app).await;

    let (status, _) = request(
        &app,
        "POST",
        "/api/revoke_tokens",
        None,
        Some(json!({"user": "testuser", "password": "testpass"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // 即使账本行被改回未吊销, last_logout 这道闸仍然拦住旧令牌
    sqlx::query("UPDATE tokens SET revoked = 0")
        .execute(&pool)
        .await
        .unwrap();
    let (status, _) = request(&app, "GET", "/api/userinfo", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn ledger_rows_survive_revocation() {
    let (app, pool) = test_app().await;
    user_and_token(&app).await;
    login(&app, false).await;

    let (status, _) = request(
        &app,
        "POST",
        "/api/revoke_tokens",
        None,
        Some(json!({"user": "testuser", "password": "testpass"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // 吊销只翻转标志, 历史行全部保留
    let (total, revoked): (i64, i64) =
        sqlx::query_as("SELECT COUNT(*), SUM(revoked) FROM tokens")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(total, 2);
    assert_eq!(revoked, 2);
}
