use std::net::SocketAddr;

use axum::{
    Extension,
    extract::{ConnectInfo, Json, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use chrono::Utc;

use crate::{
    AppState,
    error::AppError,
    utils::{
        Claims, TokenKind, bearer_token, generate_access_token, generate_refresh_token, present,
        require_fields, verify_refresh_token,
    },
};

use super::model::{
    LoginRequest, LoginResponse, RefreshResponse, RevokeTokensRequest, RevokeTokensResponse,
    SignupRequest, SignupResponse, TokenRecord, User, UserInfoResponse,
};

#[axum::debug_handler]
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_fields(&[
        ("username", present(&req.username)),
        ("email", present(&req.email)),
        ("password", present(&req.password)),
    ])?;

    let user_id = User::register(
        &state.pool,
        &req.username.unwrap_or_default(),
        &req.email.unwrap_or_default(),
        &req.password.unwrap_or_default(),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "注册成功".to_string(),
            user_id,
        }),
    ))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_fields(&[
        ("login_name", present(&req.login_name)),
        ("password", present(&req.password)),
    ])?;
    let login_name = req.login_name.unwrap_or_default();
    let password = req.password.unwrap_or_default();

    // 不区分"用户不存在"和"密码错误", 避免泄露账号是否存在
    let user = match User::find_by_login(&state.pool, &login_name).await? {
        Some(user) => user,
        None => {
            tracing::warn!("Login failed: user '{}' not found", login_name);
            return Err(AppError::InvalidCredentials);
        }
    };
    if !user.verify_login(&password)? {
        tracing::warn!("Login failed: wrong password for '{}'", login_name);
        return Err(AppError::InvalidCredentials);
    }

    User::touch_last_login(&state.pool, user.id).await?;

    let (access_token, claims) = generate_access_token(
        user.id,
        Some(addr.ip().to_string()),
        req.no_expire,
        &state.config,
    )?;

    // 账本行与签发同一事务, 写入失败则视为未签发
    let mut tx = state.pool.begin().await?;
    TokenRecord::insert(&mut *tx, &claims, req.no_expire).await?;
    tx.commit().await?;

    // 永久令牌不配发刷新令牌
    let refresh_token = if req.no_expire {
        None
    } else {
        Some(generate_refresh_token(user.id, &state.config)?)
    };

    Ok(Json(LoginResponse {
        message: "登录成功".to_string(),
        access_token,
        refresh_token,
    }))
}

/// 用刷新令牌换取新的访问令牌, 不重新校验密码
#[axum::debug_handler]
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<RefreshResponse>, AppError> {
    let token = bearer_token(&headers).ok_or(AppError::InvalidToken)?;
    let claims = verify_refresh_token(token, &state.config)?;
    if claims.kind != TokenKind::Refresh {
        return Err(AppError::InvalidToken);
    }

    let user = User::find_by_id(&state.pool, claims.sub)
        .await?
        .ok_or(AppError::InvalidToken)?;
    // 全局登出同样使刷新令牌失效
    if claims.issued_at <= user.last_logout {
        return Err(AppError::InvalidToken);
    }

    let (access_token, new_claims) =
        generate_access_token(user.id, claims.ip.clone(), false, &state.config)?;

    let mut tx = state.pool.begin().await?;
    TokenRecord::insert(&mut *tx, &new_claims, false).await?;
    tx.commit().await?;

    Ok(Json(RefreshResponse {
        message: "令牌已刷新".to_string(),
        access_token,
    }))
}

/// 全局登出: 重新校验凭证后吊销该用户的全部令牌
#[axum::debug_handler]
pub async fn revoke_tokens(
    State(state): State<AppState>,
    Json(req): Json<RevokeTokensRequest>,
) -> Result<Json<RevokeTokensResponse>, AppError> {
    require_fields(&[
        ("user", present(&req.user)),
        ("password", present(&req.password)),
    ])?;

    let user = User::find_by_login(&state.pool, &req.user.unwrap_or_default())
        .await?
        .ok_or(AppError::InvalidCredentials)?;
    if !user.verify_login(&req.password.unwrap_or_default())? {
        return Err(AppError::InvalidCredentials);
    }

    // 单事务: 要么全部吊销, 要么一个不动
    let mut tx = state.pool.begin().await?;
    let counts = TokenRecord::revoke_all_for_user(&mut tx, user.id).await?;
    User::stamp_last_logout(&mut *tx, user.id, Utc::now()).await?;
    tx.commit().await?;

    tracing::info!(
        "Revoked {} tokens for user {} ({} permanent, {} expiring)",
        counts.total,
        user.id,
        counts.persistent,
        counts.temporal
    );

    Ok(Json(RevokeTokensResponse {
        message: "令牌已全部吊销".to_string(),
        revoked_total: counts.total,
        revoked_persistent: counts.persistent,
        revoked_temporal: counts.temporal,
    }))
}

#[axum::debug_handler]
pub async fn userinfo(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
) -> Result<Json<UserInfoResponse>, AppError> {
    let user = User::find_by_id(&state.pool, claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("用户不存在".to_string()))?;

    Ok(Json(UserInfoResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        created_at: user.created_at,
    }))
}
