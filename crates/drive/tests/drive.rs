//! Drive client tests against a mock Drive API.

use registro_drive::{DriveClient, DriveError, StaticToken};
use std::sync::Arc;
use wiremock::matchers::{body_bytes, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FILE_ID: &str = "1AbCdEf";
const XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

fn client(server: &MockServer) -> DriveClient {
    DriveClient::new(Arc::new(StaticToken::new("test-token")))
        .unwrap()
        .with_base_url(server.uri())
}

#[tokio::test]
async fn test_download_returns_content() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/drive/v3/files/{FILE_ID}")))
        .and(query_param("alt", "media"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PK\x03\x04data".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let content = client(&server).download(FILE_ID).await.unwrap();
    assert_eq!(content.as_deref(), Some(&b"PK\x03\x04data"[..]));
}

#[tokio::test]
async fn test_download_not_found_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/drive/v3/files/{FILE_ID}")))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error": {"code": 404, "message": "File not found: 1AbCdEf."}
        })))
        .mount(&server)
        .await;

    let content = client(&server).download(FILE_ID).await.unwrap();
    assert!(content.is_none());
}

#[tokio::test]
async fn test_unusual_file_id_stays_in_its_path_segment() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files/x%2F..%2F..%2Fabout%3Falt=json"))
        .and(query_param("alt", "media"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ok".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let content = client(&server)
        .download("x/../../about?alt=json")
        .await
        .unwrap();
    assert_eq!(content.as_deref(), Some(&b"ok"[..]));
}

#[tokio::test]
async fn test_download_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/drive/v3/files/{FILE_ID}")))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client(&server).download(FILE_ID).await.unwrap_err();
    match err {
        DriveError::Status { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Internal Server Error");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_download_forbidden_keeps_google_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/drive/v3/files/{FILE_ID}")))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "error": {"code": 403, "message": "The caller does not have permission"}
        })))
        .mount(&server)
        .await;

    let err = client(&server).download(FILE_ID).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "HTTP 403 - The caller does not have permission"
    );
    assert!(!err.is_not_found());
}

#[tokio::test]
async fn test_upload_overwrites_media() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path(format!("/upload/drive/v3/files/{FILE_ID}")))
        .and(query_param("uploadType", "media"))
        .and(header("authorization", "Bearer test-token"))
        .and(header("content-type", XLSX))
        .and(body_bytes(b"workbook".to_vec()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": FILE_ID
        })))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .upload(FILE_ID, b"workbook".to_vec(), XLSX)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_upload_missing_file_is_error() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path(format!("/upload/drive/v3/files/{FILE_ID}")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client(&server)
        .upload(FILE_ID, b"workbook".to_vec(), XLSX)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}
