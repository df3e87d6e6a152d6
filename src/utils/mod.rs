use axum::http::{HeaderMap, header};
use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppError;

pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    hash(password.as_bytes(), DEFAULT_COST)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password.as_bytes(), hash)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,       // 用户ID
    pub jti: String,    // 令牌唯一标识, 与账本行对应
    pub iat: i64,       // 签发时间(秒)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>, // 永久令牌不带过期时间
    pub issued_at: DateTime<Utc>, // 全精度签发时刻, 用于与 last_logout 比较
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>, // 签发时的客户端IP, 仅用于告警
    pub kind: TokenKind,
}

impl Claims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

/// 生成访问令牌; permanent 为 true 时不带 exp 声明
pub fn generate_access_token(
    user_id: i64,
    ip: Option<String>,
    permanent: bool,
    config: &Config,
) -> Result<(String, Claims), jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let exp = if permanent {
        None
    } else {
        Some((now + Duration::seconds(config.jwt_expiration().as_secs() as i64)).timestamp())
    };

    let claims = Claims {
        sub: user_id,
        jti: Uuid::new_v4().to_string(),
        iat: now.timestamp(),
        exp,
        issued_at: now,
        ip,
        kind: TokenKind::Access,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )?;

    Ok((token, claims))
}

/// 生成刷新令牌; 总是带过期时间, 不写入账本
pub fn generate_refresh_token(
    user_id: i64,
    config: &Config,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        jti: Uuid::new_v4().to_string(),
        iat: now.timestamp(),
        exp: Some(
            (now + Duration::seconds(config.refresh_expiration().as_secs() as i64)).timestamp(),
        ),
        issued_at: now,
        ip: None,
        kind: TokenKind::Refresh,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
}

/// 校验访问令牌签名. 不在这里校验 exp, 过期以账本为准(惰性回收)
pub fn verify_access_token(
    token: &str,
    config: &Config,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )?;

    Ok(token_data.claims)
}

/// 校验刷新令牌, 刷新令牌没有账本行, exp 在这里强制校验
pub fn verify_refresh_token(
    token: &str,
    config: &Config,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// 必填字段检查, 缺失或为空都算缺少
pub fn require_fields(fields: &[(&str, bool)]) -> Result<(), AppError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "缺少以下字段: {}",
            missing.join(", ")
        )))
    }
}

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

pub fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}
