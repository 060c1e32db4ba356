//! Integration tests for HttpService + BlockingHttpService against the stub backend.
//!
//! Each test spawns an in-process axum server on 127.0.0.1:0 with an in-memory
//! list, then exercises the HTTP client layer through the full request/response cycle.

use automail_core::file::SelectedFile;
use automail_core::Category;
use automail_service::{
    BlockingHttpService, DocumentService, HttpService, ServiceError, UploadPayload,
};
use automail_testkit::{sample_upload, spawn_stub_server, spawn_stub_server_on_thread};

fn txt_payload(name: &str, body: &str) -> UploadPayload {
    UploadPayload::new(name, "text/plain", body.as_bytes().to_vec())
}

// ---- Async HttpService tests ----

#[tokio::test]
async fn upload_returns_classification() {
    let server = spawn_stub_server().await;
    server.classify_as("Improdutivo", "Obrigado pela mensagem!");
    let svc = HttpService::from_base_url(&server.base_url).unwrap();

    let result = svc
        .upload(&txt_payload("feliz-natal.txt", "Feliz natal a toda a equipe"))
        .await
        .unwrap();

    assert_eq!(result.filename, "feliz-natal.txt");
    assert_eq!(result.texto_extraido, "Feliz natal a toda a equipe");
    assert_eq!(result.category(), Category::Improdutivo);
    assert_eq!(result.resposta_automatica, "Obrigado pela mensagem!");
    assert!(result.created_at.is_none());
    assert_eq!(server.upload_requests(), 1);
}

#[tokio::test]
async fn upload_error_body_is_surfaced() {
    let server = spawn_stub_server().await;
    server.fail_uploads(500, "Erro ao processar com Itzam");
    let svc = HttpService::from_base_url(&server.base_url).unwrap();

    let err = svc.upload(&txt_payload("a.txt", "x")).await.unwrap_err();
    match err {
        ServiceError::Internal(msg) => assert_eq!(msg, "Erro ao processar com Itzam"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn upload_from_selected_file() {
    let server = spawn_stub_server().await;
    let svc = HttpService::from_base_url(&server.base_url).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pedido.txt");
    std::fs::write(&path, "Preciso do status do chamado 4521").unwrap();

    let selected = SelectedFile::from_path(&path).unwrap();
    let payload = UploadPayload::from_selected(&selected).unwrap();
    assert_eq!(payload.mime_type, "text/plain");

    let result = svc.upload(&payload).await.unwrap();
    assert_eq!(result.filename, "pedido.txt");
    assert_eq!(result.texto_extraido, "Preciso do status do chamado 4521");
}

#[tokio::test]
async fn list_get_and_delete() {
    let server = spawn_stub_server().await;
    server.seed(vec![
        sample_upload("u1", "Produtivo"),
        sample_upload("u2", "Improdutivo"),
    ]);
    let svc = HttpService::from_base_url(&server.base_url).unwrap();

    let all = svc.list_uploads().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].created_at.as_deref(), Some("2025-09-14 18:05:09"));

    let one = svc.get_upload("u2").await.unwrap();
    assert_eq!(one.category(), Category::Improdutivo);

    svc.delete_upload("u1").await.unwrap();
    let remaining = svc.list_uploads().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, "u2");
}

#[tokio::test]
async fn missing_upload_is_not_found() {
    let server = spawn_stub_server().await;
    let svc = HttpService::from_base_url(&server.base_url).unwrap();

    match svc.get_upload("nope").await.unwrap_err() {
        ServiceError::NotFound(msg) => assert_eq!(msg, "Upload não encontrado"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(matches!(
        svc.delete_upload("nope").await,
        Err(ServiceError::NotFound(_))
    ));
}

#[tokio::test]
async fn delete_uploads_reports_each_id() {
    let server = spawn_stub_server().await;
    server.seed(vec![
        sample_upload("a", "Produtivo"),
        sample_upload("b", "Produtivo"),
        sample_upload("c", "Improdutivo"),
    ]);
    server.fail_delete("b");
    let svc = HttpService::from_base_url(&server.base_url).unwrap();

    let ids: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
    let report = svc.delete_uploads(&ids).await;

    let mut deleted = report.deleted.clone();
    deleted.sort();
    assert_eq!(deleted, vec!["a", "c"]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, "b");
    assert_eq!(server.delete_requests(), 3);
    assert_eq!(server.uploads().len(), 1);
}

#[tokio::test]
async fn empty_batch_makes_no_requests() {
    let server = spawn_stub_server().await;
    let svc = HttpService::from_base_url(&server.base_url).unwrap();

    let report = svc.delete_uploads(&[]).await;
    assert_eq!(report.requested(), 0);
    assert_eq!(server.delete_requests(), 0);
}

#[tokio::test]
async fn unreachable_backend_is_internal_error() {
    // Port 9 (discard) is essentially never listening on loopback.
    let svc = HttpService::from_base_url("http://127.0.0.1:9").unwrap();
    assert!(matches!(
        svc.list_uploads().await,
        Err(ServiceError::Internal(_))
    ));
}

#[test]
fn bad_base_url_is_rejected() {
    assert!(matches!(
        HttpService::from_base_url("ftp://example.com"),
        Err(ServiceError::InvalidInput(_))
    ));
}

// ---- BlockingHttpService tests ----

#[test]
fn blocking_round_trip() {
    let server = spawn_stub_server_on_thread();
    let svc = BlockingHttpService::new(&server.base_url).unwrap();

    let result = svc.upload(&txt_payload("oi.txt", "oi")).unwrap();
    let listed = svc.list_uploads().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, result.id);

    let report = svc.delete_uploads(&[result.id.clone()]);
    assert!(report.is_complete());
    assert!(svc.list_uploads().unwrap().is_empty());
}
