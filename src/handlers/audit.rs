//! 审计历史的 HTTP 处理器

use crate::{
    auth::Session,
    error::AppError,
    middleware::AppState,
    models::{audit::*, permission::caps},
    services::audit_service::{AuditAction, DEFAULT_PAGE_SIZE},
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

#[derive(Debug, Deserialize)]
pub struct AuditRecordQuery {
    pub id_filial: Option<i64>,
    pub id_usuario: Option<i64>,
    pub acao: Option<String>,
    pub inicio: Option<DateTime<Utc>>,
    pub fim: Option<DateTime<Utc>>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_SIZE
}

/// 查询本企业的审计历史
pub async fn list_audit_records(
    State(state): State<Arc<AppState>>,
    session: Session,
    Query(query): Query<AuditRecordQuery>,
) -> Result<impl IntoResponse, AppError> {
    state
        .permission_service
        .require_permission(&session, caps::HISTORICO_USUARIO)?;
    let user = session.require_user()?;

    let filters = AuditRecordFilters {
        id_empresa: user.id_empresa,
        id_filial: query.id_filial,
        id_usuario: query.id_usuario,
        acao: query.acao,
        inicio: query.inicio,
        fim: query.fim,
    };

    let records = state
        .audit_service
        .query_records(&filters, query.limit, query.offset)
        .await?;
    let total = state.audit_service.count_records(&filters).await?;

    Ok(Json(json!({
        "registros": records,
        "quantidade": records.len(),
        "total": total
    })))
}

/// 记录一次管理操作
///
/// 记录归属于会话用户及其所在分店，时间由服务端决定
pub async fn record_action(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(req): Json<RecordActionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = session.require_user()?;
    req.validate().map_err(|e| AppError::validation(&e))?;

    if let Some(id_filial) = req.id_filial {
        if user.id_filial != Some(id_filial) {
            tracing::warn!(
                id_usuario = user.id_usuario,
                id_empresa = user.id_empresa,
                id_filial,
                "Audit record rejected for a branch outside the session"
            );
            return Err(AppError::Forbidden);
        }
    }

    let record = match (&req.descricao, &req.entidade, &req.antes, &req.depois) {
        (Some(descricao), _, _, _) => {
            state
                .audit_service
                .record_for(user, &req.acao, descricao)
                .await?
        }
        (None, Some(entidade), Some(antes), Some(depois)) => {
            if req.acao != AuditAction::Edicao.as_str() {
                return Err(AppError::BadRequest(format!(
                    "acao deve ser {} quando antes e depois são informados",
                    AuditAction::Edicao.as_str()
                )));
            }
            state
                .audit_service
                .record_edit(user, entidade, antes, depois)
                .await?
        }
        _ => {
            return Err(AppError::BadRequest(
                "Informe descricao ou entidade, antes e depois".to_string(),
            ))
        }
    };

    Ok((StatusCode::CREATED, Json(record)))
}
