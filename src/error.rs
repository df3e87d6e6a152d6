use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug)]
pub enum AppError {
    Validation(String),
    DuplicateIdentity(String),
    InvalidCredentials,
    InvalidToken,
    NotFound(String),
    Forbidden,
    Internal,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::DuplicateIdentity(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "凭证无效".to_string()),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "令牌无效".to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "未授权访问".to_string()),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "内部服务器错误".to_string(),
            ),
        };

        let body = Json(ErrorResponse { error });

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => AppError::NotFound("资源不存在".to_string()),
            e => {
                tracing::error!("Database error: {:?}", e);
                AppError::Internal
            }
        }
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(e: bcrypt::BcryptError) -> Self {
        tracing::error!("Bcrypt error: {:?}", e);
        AppError::Internal
    }
}

// 解码/签名错误一律按无效令牌处理, 不区分过期与畸形
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(_: jsonwebtoken::errors::Error) -> Self {
        AppError::InvalidToken
    }
}
