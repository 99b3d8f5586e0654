//! 路由注册
//! 创建所有 API 路由并应用中间件

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
};

use crate::{config::ServerConfig, handlers, middleware::AppState};

/// 创建应用路由
pub fn create_router(state: Arc<AppState>) -> Router {
    // 公开端点（健康检查、指标）
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/metrics", get(handlers::metrics::metrics_export));

    // API 路由：会话中间件总是附加 Session，身份与权限由 handler 检查
    let api_routes = Router::new()
        .route("/api/v1/sessao", get(handlers::session::get_session))
        .route(
            "/api/v1/sessao/permissoes/{caminho}",
            get(handlers::session::check_permission),
        )
        .route("/api/v1/sessao/menu", get(handlers::session::get_menu))
        .route(
            "/api/v1/historico",
            get(handlers::audit::list_audit_records).post(handlers::audit::record_action),
        )
        .route(
            "/api/v1/validacoes/cpf",
            post(handlers::validation::validate_cpf),
        )
        .route(
            "/api/v1/validacoes/email",
            post(handlers::validation::validate_email_address),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.jwt_service.clone(),
            crate::auth::middleware::session_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(RequestBodyLimitLayer::new(state.config.server.max_body_bytes))
        .layer(cors_layer(&state.config.server))
        .layer(axum::middleware::from_fn(crate::middleware::request_tracking_middleware))
        .with_state(state)
}

/// 前端跨域配置；未配置来源时允许任意来源
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    match &config.cors_allowed_origins {
        Some(origins) if !origins.is_empty() => base.allow_origin(AllowOrigin::list(
            origins
                .iter()
                .filter_map(|origin| origin.parse::<HeaderValue>().ok()),
        )),
        _ => base.allow_origin(Any),
    }
}
