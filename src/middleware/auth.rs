use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use crate::{
    AppState,
    error::AppError,
    routes::auth::model::{TokenRecord, User},
    utils::{TokenKind, bearer_token, verify_access_token},
};

/// 令牌有效性门禁, 所有受保护路由在进入 handler 前经过这里.
/// 除惰性过期标记外不做任何写入, 每次请求只按 jti 查一行账本
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers()).ok_or(AppError::InvalidToken)?;

    let claims = verify_access_token(token, &state.config)?;
    if claims.kind != TokenKind::Access {
        return Err(AppError::InvalidToken);
    }

    // 用户已不存在则直接拒绝
    let user = User::find_by_id(&state.pool, claims.sub)
        .await?
        .ok_or(AppError::InvalidToken)?;

    let record = TokenRecord::find_by_jti(&state.pool, &claims.jti)
        .await?
        .ok_or(AppError::InvalidToken)?;
    if record.revoked {
        return Err(AppError::InvalidToken);
    }
    if !record.permanent {
        match record.expires_at {
            Some(expires_at) if expires_at <= Utc::now() => {
                // 惰性回收: 先标记吊销再拒绝
                TokenRecord::mark_revoked(&state.pool, &claims.jti).await?;
                return Err(AppError::InvalidToken);
            }
            None => return Err(AppError::InvalidToken),
            _ => {}
        }
    }

    // 早于最近一次全局登出签发的令牌一律拒绝
    if claims.issued_at <= user.last_logout {
        return Err(AppError::InvalidToken);
    }

    // IP 变化只告警不拦截
    if let Some(token_ip) = &claims.ip {
        if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
            let current_ip = addr.ip().to_string();
            if *token_ip != current_ip {
                tracing::warn!(
                    "IP change detected for user {}: token {}, current {}",
                    user.id,
                    token_ip,
                    current_ip
                );
            }
        }
    }

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}
