//! Audit domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

/// Persisted audit record (table `historico_usuario`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuditRecord {
    pub id: i64,
    pub id_usuario: i64,
    pub id_empresa: i64,
    pub id_filial: Option<i64>,
    pub acao: String,
    pub descricao: String,
    pub data_hora: DateTime<Utc>,
}

/// Audit record before the store assigns an id
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewAuditRecord {
    pub id_usuario: i64,
    pub id_empresa: i64,
    pub id_filial: Option<i64>,
    pub acao: String,
    pub descricao: String,
    pub data_hora: DateTime<Utc>,
}

impl NewAuditRecord {
    pub fn into_record(self, id: i64) -> AuditRecord {
        AuditRecord {
            id,
            id_usuario: self.id_usuario,
            id_empresa: self.id_empresa,
            id_filial: self.id_filial,
            acao: self.acao,
            descricao: self.descricao,
            data_hora: self.data_hora,
        }
    }
}

/// Audit listing filters. `id_empresa` is always taken from the session.
#[derive(Debug, Clone, Default)]
pub struct AuditRecordFilters {
    pub id_empresa: i64,
    pub id_filial: Option<i64>,
    pub id_usuario: Option<i64>,
    pub acao: Option<String>,
    pub inicio: Option<DateTime<Utc>>,
    pub fim: Option<DateTime<Utc>>,
}

/// Request body for recording an administrative action.
///
/// Either `descricao` is given verbatim, or `entidade` + `antes` + `depois`
/// are given and the description is computed from the diff.
#[derive(Debug, Deserialize, Validate)]
pub struct RecordActionRequest {
    #[validate(length(min = 1, max = 255))]
    pub acao: String,
    #[validate(length(min = 1))]
    pub descricao: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub entidade: Option<String>,
    pub antes: Option<Map<String, Value>>,
    pub depois: Option<Map<String, Value>>,
    /// Must match the session's branch when given
    pub id_filial: Option<i64>,
}

/// One changed attribute between two snapshots
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldChange {
    pub campo: String,
    pub antes: Option<Value>,
    pub depois: Option<Value>,
}
