//! 审计仓库测试（需要 TEST_DATABASE_URL 指向可用的 Postgres）

use chrono::{Duration, TimeZone, Utc};
use gym_connect::models::audit::{AuditRecordFilters, NewAuditRecord};
use gym_connect::repository::{AuditRepository, AuditStore};
use serial_test::serial;

mod common;
use common::{create_test_config, setup_test_db};

fn new_record(id_empresa: i64, acao: &str, minutes: i64) -> NewAuditRecord {
    NewAuditRecord {
        id_usuario: 42,
        id_empresa,
        id_filial: Some(3),
        acao: acao.to_string(),
        descricao: format!("{} em {}", acao, minutes),
        data_hora: Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap() + Duration::minutes(minutes),
    }
}

#[tokio::test]
#[serial]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_insert_returns_stored_row() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;
    let repo = AuditRepository::new(pool);

    let saved = repo.insert(new_record(7, "CADASTRO", 0)).await.unwrap();

    assert!(saved.id > 0);
    assert_eq!(saved.id_empresa, 7);
    assert_eq!(saved.id_filial, Some(3));
    assert_eq!(saved.acao, "CADASTRO");
}

#[tokio::test]
#[serial]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_query_filters_and_orders() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;
    let repo = AuditRepository::new(pool);

    repo.insert(new_record(7, "CADASTRO", 0)).await.unwrap();
    repo.insert(new_record(7, "EDICAO", 1)).await.unwrap();
    repo.insert(new_record(8, "EDICAO", 2)).await.unwrap();
    repo.insert(new_record(7, "EDICAO", 3)).await.unwrap();

    let filters = AuditRecordFilters {
        id_empresa: 7,
        acao: Some("EDICAO".to_string()),
        ..Default::default()
    };

    let records = repo.query(&filters, 50, 0).await.unwrap();
    let descriptions: Vec<&str> = records.iter().map(|r| r.descricao.as_str()).collect();
    assert_eq!(descriptions, vec!["EDICAO em 3", "EDICAO em 1"]);
    assert_eq!(repo.count(&filters).await.unwrap(), 2);

    let page = repo.query(&filters, 1, 1).await.unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].descricao, "EDICAO em 1");
}
