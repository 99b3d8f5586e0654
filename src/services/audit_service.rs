//! 审计日志服务
//!
//! 记录失败策略：持久化错误记录 error 日志后原样向调用方传播，不重试、不吞掉。
//! 由调用方（业务 handler）决定业务操作本身是否仍视为成功。

use crate::{
    auth::SessionUser,
    error::AppError,
    models::audit::*,
    repository::audit_repo::{AuditRepository, AuditStore},
};
use chrono::{DateTime, Utc};
use serde_json::{Map, Number, Value};
use sqlx::PgPool;
use std::sync::Arc;

/// 不参与比较、也不会出现在描述中的字段
pub const IGNORED_FIELDS: [&str; 5] = ["id", "criado_em", "atualizado_em", "senha", "password"];

/// 缺失或为 null 的值的显示文本
pub const UNDEFINED_PLACEHOLDER: &str = "não definido";

/// 默认分页大小
pub const DEFAULT_PAGE_SIZE: i64 = 50;
/// 最大分页大小
pub const MAX_PAGE_SIZE: i64 = 500;

/// 约定的审计操作类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    Cadastro,
    Edicao,
    Ativacao,
    Inativacao,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Cadastro => "CADASTRO",
            AuditAction::Edicao => "EDICAO",
            AuditAction::Ativacao => "ATIVACAO",
            AuditAction::Inativacao => "INATIVACAO",
        }
    }
}

/// Compute the changed attributes between two snapshots, in `after` key order
pub fn diff_snapshots(before: &Map<String, Value>, after: &Map<String, Value>) -> Vec<FieldChange> {
    after
        .iter()
        .filter(|(key, _)| !IGNORED_FIELDS.contains(&key.as_str()))
        .filter(|(key, new_value)| values_differ(before.get(key.as_str()), Some(*new_value)))
        .map(|(key, new_value)| FieldChange {
            campo: key.clone(),
            antes: before.get(key.as_str()).cloned(),
            depois: Some(new_value.clone()),
        })
        .collect()
}

/// Human-readable description of an edit
pub fn build_change_description(
    before: &Map<String, Value>,
    after: &Map<String, Value>,
    entity_label: &str,
) -> String {
    let changes = diff_snapshots(before, after);

    if changes.is_empty() {
        return format!("Edição de {} sem alterações efetivas", entity_label);
    }

    let lines: Vec<String> = changes
        .iter()
        .map(|change| {
            format!(
                "Campo \"{}\": \"{}\" -> \"{}\"",
                change.campo,
                display_value(change.antes.as_ref()),
                display_value(change.depois.as_ref())
            )
        })
        .collect();

    format!("Edição de {}. Alterações: {}", entity_label, lines.join(" | "))
}

// 缺失与显式 null 视为不同；数字按数值比较（1 与 1.0 相等）
fn values_differ(old: Option<&Value>, new: Option<&Value>) -> bool {
    match (old, new) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => numbers_differ(a, b),
        (a, b) => a != b,
    }
}

// 整数精确比较，只有任一侧为浮点数时才按 f64 比较
fn numbers_differ(a: &Number, b: &Number) -> bool {
    if a.is_f64() || b.is_f64() {
        return match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x != y,
            _ => a != b,
        };
    }

    match (a.as_i64(), b.as_i64()) {
        (Some(x), Some(y)) => x != y,
        _ => a.as_u64() != b.as_u64(),
    }
}

fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => UNDEFINED_PLACEHOLDER.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

pub struct AuditService {
    store: Arc<dyn AuditStore>,
}

impl AuditService {
    pub fn new(db: PgPool) -> Self {
        Self::with_store(Arc::new(AuditRepository::new(db)))
    }

    pub fn with_store(store: Arc<dyn AuditStore>) -> Self {
        Self { store }
    }

    /// 记录一条审计记录；未提供时间时使用当前时间
    pub async fn record_action(
        &self,
        id_usuario: i64,
        id_empresa: i64,
        id_filial: Option<i64>,
        acao: &str,
        descricao: &str,
        data_hora: Option<DateTime<Utc>>,
    ) -> Result<AuditRecord, AppError> {
        let record = NewAuditRecord {
            id_usuario,
            id_empresa,
            id_filial,
            acao: acao.to_string(),
            descricao: descricao.to_string(),
            data_hora: data_hora.unwrap_or_else(Utc::now),
        };

        match self.store.insert(record).await {
            Ok(saved) => {
                tracing::info!(
                    id = saved.id,
                    id_usuario,
                    id_empresa,
                    acao = %saved.acao,
                    "Audit record stored"
                );
                Ok(saved)
            }
            Err(e) => {
                tracing::error!(
                    id_usuario,
                    id_empresa,
                    acao = %acao,
                    error = %e,
                    "Failed to store audit record"
                );
                Err(e)
            }
        }
    }

    /// 以会话用户的身份记录，时间为当前时间
    pub async fn record_for(
        &self,
        actor: &SessionUser,
        acao: &str,
        descricao: &str,
    ) -> Result<AuditRecord, AppError> {
        self.record_action(
            actor.id_usuario,
            actor.id_empresa,
            actor.id_filial,
            acao,
            descricao,
            None,
        )
        .await
    }

    /// 计算编辑差异并以 EDICAO 记录
    pub async fn record_edit(
        &self,
        actor: &SessionUser,
        entity_label: &str,
        before: &Map<String, Value>,
        after: &Map<String, Value>,
    ) -> Result<AuditRecord, AppError> {
        let descricao = build_change_description(before, after, entity_label);
        self.record_for(actor, AuditAction::Edicao.as_str(), &descricao)
            .await
    }

    /// 查询审计记录
    pub async fn query_records(
        &self,
        filters: &AuditRecordFilters,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AuditRecord>, AppError> {
        let limit = limit.clamp(1, MAX_PAGE_SIZE);
        let offset = offset.max(0);
        self.store.query(filters, limit, offset).await
    }

    /// 查询审计记录数量
    pub async fn count_records(&self, filters: &AuditRecordFilters) -> Result<i64, AppError> {
        self.store.count(filters).await
    }
}
