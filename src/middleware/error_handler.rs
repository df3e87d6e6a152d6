use axum::{
    body::{Body, to_bytes},
    http::Request,
    middleware::Next,
    response::Response,
};

// 5xx 响应体只读这么多字节用于日志
const LOG_BODY_LIMIT: usize = 4096;

/// 把 5xx 响应连同请求方法和路径记入日志, 响应体原样放回
pub async fn log_errors(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;
    if !response.status().is_server_error() {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = to_bytes(body, LOG_BODY_LIMIT).await.unwrap_or_default();
    tracing::error!(
        "Server error on {} {}: status {}, body {}",
        method,
        path,
        parts.status,
        String::from_utf8_lossy(&bytes)
    );

    // 响应体被消费过, 长度头需要重算
    parts.headers.remove(axum::http::header::CONTENT_LENGTH);
    Response::from_parts(parts, Body::from(bytes))
}
