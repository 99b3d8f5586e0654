//! Audit repository (审计数据访问)

use crate::{error::AppError, models::audit::*};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

/// 审计记录存储（仅追加）
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// 插入一条审计记录，返回带存储 ID 的记录
    async fn insert(&self, record: NewAuditRecord) -> Result<AuditRecord, AppError>;

    /// 按条件查询审计记录（按时间倒序）
    async fn query(
        &self,
        filters: &AuditRecordFilters,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AuditRecord>, AppError>;

    /// 统计审计记录数量
    async fn count(&self, filters: &AuditRecordFilters) -> Result<i64, AppError>;
}

pub struct AuditRepository {
    db: PgPool,
}

impl AuditRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filters: &AuditRecordFilters) {
        builder.push(" WHERE id_empresa = ");
        builder.push_bind(filters.id_empresa);

        if let Some(id_filial) = filters.id_filial {
            builder.push(" AND id_filial = ");
            builder.push_bind(id_filial);
        }
        if let Some(id_usuario) = filters.id_usuario {
            builder.push(" AND id_usuario = ");
            builder.push_bind(id_usuario);
        }
        if let Some(acao) = &filters.acao {
            builder.push(" AND acao = ");
            builder.push_bind(acao.clone());
        }
        if let Some(inicio) = filters.inicio {
            builder.push(" AND data_hora >= ");
            builder.push_bind(inicio);
        }
        if let Some(fim) = filters.fim {
            builder.push(" AND data_hora <= ");
            builder.push_bind(fim);
        }
    }
}

#[async_trait]
impl AuditStore for AuditRepository {
    async fn insert(&self, record: NewAuditRecord) -> Result<AuditRecord, AppError> {
        let inserted = sqlx::query_as::<_, AuditRecord>(
            r#"
            INSERT INTO historico_usuario (id_usuario, id_empresa, id_filial, acao, descricao, data_hora)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(record.id_usuario)
        .bind(record.id_empresa)
        .bind(record.id_filial)
        .bind(&record.acao)
        .bind(&record.descricao)
        .bind(record.data_hora)
        .fetch_one(&self.db)
        .await?;

        Ok(inserted)
    }

    async fn query(
        &self,
        filters: &AuditRecordFilters,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AuditRecord>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM historico_usuario");
        Self::push_filters(&mut builder, filters);

        builder.push(" ORDER BY data_hora DESC, id DESC LIMIT ");
        builder.push_bind(limit);
        builder.push(" OFFSET ");
        builder.push_bind(offset);

        let records = builder
            .build_query_as::<AuditRecord>()
            .fetch_all(&self.db)
            .await?;

        Ok(records)
    }

    async fn count(&self, filters: &AuditRecordFilters) -> Result<i64, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM historico_usuario");
        Self::push_filters(&mut builder, filters);

        let count: i64 = builder.build().fetch_one(&self.db).await?.get(0);
        Ok(count)
    }
}
