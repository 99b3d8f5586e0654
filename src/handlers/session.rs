//! 会话与权限查询的 HTTP 处理器

use crate::{auth::Session, error::AppError, middleware::AppState};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// 当前会话信息
pub async fn get_session(session: Session) -> Result<impl IntoResponse, AppError> {
    let user = session.require_user()?;

    Ok(Json(json!({
        "usuario": user,
        "permissoes": session.grant(),
    })))
}

/// 检查单个权限；匿名会话始终返回 false
pub async fn check_permission(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(caminho): Path<String>,
) -> impl IntoResponse {
    let permitido = state.permission_service.check_permission(&session, &caminho);

    Json(json!({
        "caminho": caminho,
        "permitido": permitido,
    }))
}

/// 当前会话可见的导航菜单
pub async fn get_menu(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> impl IntoResponse {
    let itens = state.permission_service.visible_menu(&session);

    Json(json!({ "itens": itens }))
}
