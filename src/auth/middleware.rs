//! 会话中间件
//! 从 Authorization 头解析会话并附加到请求扩展

use super::{jwt::JwtService, session::Session};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::convert::Infallible;
use std::sync::Arc;

// 在 handler 中直接提取 Session；未经过中间件时视为匿名会话
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<Session>()
            .cloned()
            .unwrap_or_else(Session::anonymous))
    }
}

/// 从 Authorization 头提取 Bearer 令牌
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

/// 会话中间件：总是放行，由 handler 决定是否需要身份或权限
pub async fn session_middleware(
    State(jwt_service): State<Arc<JwtService>>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = extract_token(req.headers());
    let session = Session::from_bearer(&jwt_service, token.as_deref());

    if let Some(user) = session.user() {
        tracing::debug!(
            id_usuario = user.id_usuario,
            id_empresa = user.id_empresa,
            "Session attached"
        );
    }

    req.extensions_mut().insert(session);

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_token_valid() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Bearer test_token_123".parse().unwrap());

        assert_eq!(extract_token(&headers).as_deref(), Some("test_token_123"));
    }

    #[test]
    fn test_extract_token_missing() {
        let headers = HeaderMap::new();
        assert!(extract_token(&headers).is_none());
    }

    #[test]
    fn test_extract_token_invalid_format() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "InvalidFormat".parse().unwrap());
        assert!(extract_token(&headers).is_none());

        headers.insert("authorization", "Bearer    ".parse().unwrap());
        assert!(extract_token(&headers).is_none());
    }
}
