//! Download links served by this process for the local provider.

use axum::http::{StatusCode, header};

use crate::helpers::{TestApp, str_of};

const PUBLIC_URL: &str = "http://localhost:8080";

#[tokio::test]
async fn test_local_download_link_round_trip() {
    let root = tempfile::tempdir().unwrap();
    let app = TestApp::local(root.path()).await;

    let upload = app.upload("notes.pdf", b"local payload", None).await;
    assert_eq!(upload.status, StatusCode::OK, "{:?}", upload.body);
    let file = upload.body;

    let link = app
        .request(
            "GET",
            &format!("/api/files/{}/download", str_of(&file, "id")),
            None,
        )
        .await;
    assert_eq!(link.status, StatusCode::OK);
    let url = str_of(&link.body, "url");
    let path = url.strip_prefix(PUBLIC_URL).expect("link on the public url");
    assert!(path.starts_with("/api/blobs/"));

    let (status, headers, body) = app.get_raw(path).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], b"local payload");
    assert_eq!(headers[header::CONTENT_TYPE], "text/plain");
}

#[tokio::test]
async fn test_tampered_token_is_not_found() {
    let root = tempfile::tempdir().unwrap();
    let app = TestApp::local(root.path()).await;
    let file = app.upload_ok("a.txt", None).await;

    let link = app
        .request(
            "GET",
            &format!("/api/files/{}/download", str_of(&file, "id")),
            None,
        )
        .await;
    let url = str_of(&link.body, "url");
    let path = url.strip_prefix(PUBLIC_URL).unwrap();

    let (status, _, _) = app.get_raw(&format!("{path}x")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let response = app.request("GET", "/api/blobs/not-a-token", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error_code(), "NOT_FOUND");
}

#[tokio::test]
async fn test_link_dies_with_the_file() {
    let root = tempfile::tempdir().unwrap();
    let app = TestApp::local(root.path()).await;
    let file = app.upload_ok("a.txt", None).await;

    let link = app
        .request(
            "GET",
            &format!("/api/files/{}/download", str_of(&file, "id")),
            None,
        )
        .await;
    let path = str_of(&link.body, "url")
        .strip_prefix(PUBLIC_URL)
        .unwrap()
        .to_string();

    let response = app
        .request("DELETE", &format!("/api/files/{}", str_of(&file, "id")), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let (status, _, _) = app.get_raw(&path).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
