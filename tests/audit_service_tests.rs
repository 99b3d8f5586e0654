//! 审计服务测试
//!
//! 使用内存存储验证记录、时间默认值、失败传播与查询

use chrono::{Duration, TimeZone, Utc};
use gym_connect::{
    error::AppError,
    models::audit::AuditRecordFilters,
    services::{audit_service::AuditAction, AuditService},
};
use serde_json::json;
use std::sync::Arc;

mod common;
use common::{test_user, FailingAuditStore, InMemoryAuditStore};

#[tokio::test]
async fn test_record_action_defaults_timestamp_to_now() {
    let store = Arc::new(InMemoryAuditStore::default());
    let service = AuditService::with_store(store.clone());

    let before = Utc::now();
    let record = service
        .record_action(42, 7, Some(3), "CADASTRO", "Cadastro de aluno João", None)
        .await
        .unwrap();
    let after = Utc::now();

    assert_eq!(record.id, 1);
    assert!(record.data_hora >= before && record.data_hora <= after);
    assert_eq!(store.records(), vec![record]);
}

#[tokio::test]
async fn test_record_action_keeps_given_timestamp() {
    let store = Arc::new(InMemoryAuditStore::default());
    let service = AuditService::with_store(store);

    let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    let record = service
        .record_action(42, 7, None, "INATIVACAO", "Inativação de filial Centro", Some(at))
        .await
        .unwrap();

    assert_eq!(record.data_hora, at);
    assert_eq!(record.id_filial, None);
    assert_eq!(record.acao, "INATIVACAO");
}

#[tokio::test]
async fn test_store_failure_propagates() {
    let service = AuditService::with_store(Arc::new(FailingAuditStore));

    let result = service
        .record_action(1, 1, None, "CADASTRO", "Cadastro de plano", None)
        .await;

    assert!(matches!(result, Err(AppError::Database(_))));
}

#[tokio::test]
async fn test_record_edit_uses_session_identity() {
    let store = Arc::new(InMemoryAuditStore::default());
    let service = AuditService::with_store(store.clone());

    let before = json!({"nome": "Ana"}).as_object().cloned().unwrap();
    let after = json!({"nome": "Beatriz"}).as_object().cloned().unwrap();

    let record = service
        .record_edit(&test_user(), "usuário", &before, &after)
        .await
        .unwrap();

    assert_eq!(record.acao, AuditAction::Edicao.as_str());
    assert_eq!(record.id_usuario, 42);
    assert_eq!(record.id_empresa, 7);
    assert_eq!(record.id_filial, Some(3));
    assert_eq!(
        record.descricao,
        r#"Edição de usuário. Alterações: Campo "nome": "Ana" -> "Beatriz""#
    );
}

#[tokio::test]
async fn test_query_is_scoped_and_newest_first() {
    let store = Arc::new(InMemoryAuditStore::default());
    let service = AuditService::with_store(store);

    let base = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
    for (i, empresa) in [7, 7, 8, 7].into_iter().enumerate() {
        service
            .record_action(
                42,
                empresa,
                Some(3),
                "CADASTRO",
                &format!("registro {}", i),
                Some(base + Duration::minutes(i as i64)),
            )
            .await
            .unwrap();
    }

    let filters = AuditRecordFilters {
        id_empresa: 7,
        ..Default::default()
    };

    let records = service.query_records(&filters, 50, 0).await.unwrap();
    let descriptions: Vec<&str> = records.iter().map(|r| r.descricao.as_str()).collect();
    assert_eq!(descriptions, vec!["registro 3", "registro 1", "registro 0"]);
    assert_eq!(service.count_records(&filters).await.unwrap(), 3);

    // limit 被限制在 1..=500
    let records = service.query_records(&filters, 0, 0).await.unwrap();
    assert_eq!(records.len(), 1);
}
