//! Integration tests for file operations.

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use crate::helpers::{MultipartPart, TestApp, str_of};

#[tokio::test]
async fn test_upload_records_metadata() {
    let app = TestApp::new().await;

    let response = app.upload("Quarterly Report.txt", b"hello", None).await;
    assert_eq!(response.status, StatusCode::OK);

    let file = &response.body;
    assert_eq!(str_of(file, "originalName"), "Quarterly Report.txt");
    assert_eq!(str_of(file, "mimeType"), "text/plain");
    assert_eq!(file["size"], 5);
    assert_eq!(str_of(file, "folderId"), "root");

    let key = str_of(file, "name");
    assert!(key.ends_with("-Quarterly_Report.txt"));
    assert_eq!(str_of(file, "path"), format!("/files/{key}"));
    assert!(app.blobs.exists(key).await.unwrap());
}

#[tokio::test]
async fn test_list_files_newest_first_and_filtered() {
    let app = TestApp::new().await;
    let folder = app.folder_ok("Docs", None).await;
    let folder_id = str_of(&folder, "id");

    let older = app.upload_ok("old.txt", Some(folder_id)).await;
    let newer = app.upload_ok("new.txt", Some(folder_id)).await;
    let loose = app.upload_ok("loose.txt", None).await;

    let response = app
        .request("GET", &format!("/api/files?folderId={folder_id}"), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let ids: Vec<&str> = response
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|f| str_of(f, "id"))
        .collect();
    assert_eq!(ids, [str_of(&newer, "id"), str_of(&older, "id")]);

    let root = app.request("GET", "/api/files?folderId=root", None).await;
    let root = root.body.as_array().unwrap().clone();
    assert_eq!(root.len(), 1);
    assert_eq!(root[0]["id"], loose["id"]);

    let all = app.request("GET", "/api/files", None).await;
    assert_eq!(all.body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_list_files_with_unknown_folder_is_empty() {
    let app = TestApp::new().await;
    app.upload_ok("a.txt", None).await;

    let response = app.request("GET", "/api/files?folderId=not-a-uuid", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!([]));

    let response = app
        .request("GET", &format!("/api/files?folderId={}", Uuid::new_v4()), None)
        .await;
    assert_eq!(response.body, json!([]));
}

#[tokio::test]
async fn test_upload_without_file_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .multipart(vec![MultipartPart::Text("folderId", "root".to_string())])
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");
    assert!(response.body["message"].is_string());
}

#[tokio::test]
async fn test_upload_too_large_is_rejected() {
    let app = TestApp::with_max_upload(8).await;

    let response = app.upload("big.bin", &[0u8; 16], None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app.upload("huge.bin", &vec![0u8; 256 * 1024], None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let listed = app.request("GET", "/api/files", None).await;
    assert_eq!(listed.body, json!([]));
}

#[tokio::test]
async fn test_upload_into_missing_folder() {
    let app = TestApp::new().await;

    let missing = Uuid::new_v4().to_string();
    let response = app.upload("a.txt", b"x", Some(&missing)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error_code(), "NOT_FOUND");
}

#[tokio::test]
async fn test_get_file_not_found() {
    let app = TestApp::new().await;

    let response = app
        .request("GET", &format!("/api/files/{}", Uuid::new_v4()), None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "File not found");

    let response = app.request("GET", "/api/files/not-a-uuid", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_move_and_rename_file() {
    let app = TestApp::new().await;
    let folder = app.folder_ok("Docs", None).await;
    let file = app.upload_ok("draft.txt", None).await;
    let path = format!("/api/files/{}", str_of(&file, "id"));

    let response = app
        .request(
            "PUT",
            &path,
            Some(json!({ "folderId": folder["id"], "name": "final.txt" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["folderId"], folder["id"]);
    assert_eq!(response.body["originalName"], "final.txt");
    assert_eq!(response.body["name"], file["name"]);

    let response = app
        .request("PUT", &path, Some(json!({ "folderId": null })))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["folderId"], "root");
    assert_eq!(response.body["originalName"], "final.txt");
}

#[tokio::test]
async fn test_update_file_errors() {
    let app = TestApp::new().await;
    let file = app.upload_ok("a.txt", None).await;
    let path = format!("/api/files/{}", str_of(&file, "id"));

    let response = app.request("PUT", &path, Some(json!({}))).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request("PUT", &path, Some(json!({ "folderId": Uuid::new_v4() })))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .request(
            "PUT",
            &format!("/api/files/{}", Uuid::new_v4()),
            Some(json!({ "name": "b.txt" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .request("PUT", &path, Some(json!({ "folderId": "garbage" })))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_file_removes_payload_and_record() {
    let app = TestApp::new().await;
    let file = app.upload_ok("a.txt", None).await;
    let key = str_of(&file, "name").to_string();
    let path = format!("/api/files/{}", str_of(&file, "id"));

    let response = app.request("DELETE", &path, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["message"].is_string());

    assert_eq!(app.request("GET", &path, None).await.status, StatusCode::NOT_FOUND);
    assert!(!app.blobs.exists(&key).await.unwrap());

    let response = app.request("DELETE", &path, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_download_link() {
    let app = TestApp::new().await;
    let file = app.upload_ok("a.txt", None).await;

    let response = app
        .request(
            "GET",
            &format!("/api/files/{}/download", str_of(&file, "id")),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(str_of(&response.body, "url").contains(str_of(&file, "name")));
    assert!(response.body["expiresAt"].is_string());

    let response = app
        .request("GET", &format!("/api/files/{}/download", Uuid::new_v4()), None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_copy_file() {
    let app = TestApp::new().await;
    let folder = app.folder_ok("Backup", None).await;
    let file = app.upload_ok("notes.txt", None).await;

    let response = app
        .request(
            "POST",
            &format!("/api/files/{}/copy", str_of(&file, "id")),
            Some(json!({ "folderId": folder["id"] })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let copy = &response.body;
    assert_ne!(copy["id"], file["id"]);
    assert_ne!(copy["name"], file["name"]);
    assert_eq!(copy["originalName"], "notes.txt");
    assert_eq!(copy["folderId"], folder["id"]);
    assert_eq!(copy["size"], file["size"]);
    assert!(app.blobs.exists(str_of(copy, "name")).await.unwrap());
    assert!(app.blobs.exists(str_of(&file, "name")).await.unwrap());

    let all = app.request("GET", "/api/files", None).await;
    assert_eq!(all.body.as_array().unwrap().len(), 2);
}
