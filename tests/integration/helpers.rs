//! Shared test helpers for integration tests.

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use bytes::Bytes;
use serde_json::Value;
use tower::ServiceExt;

use filedock_api::{AppState, build_router};
use filedock_core::config::AppConfig;
use filedock_database::repositories::{MemoryFileRepository, MemoryFolderRepository};
use filedock_storage::BlobStore;

const BOUNDARY: &str = "filedock-test-boundary";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// The object store the app writes to
    pub blobs: BlobStore,
}

impl TestApp {
    /// Memory repositories and memory object store, 1 MiB upload limit.
    pub async fn new() -> Self {
        Self::with_max_upload(1024 * 1024).await
    }

    pub async fn with_max_upload(max_upload: u64) -> Self {
        let config = AppConfig::from_toml(&format!(
            r#"
            [database]
            url = "postgres://unused@localhost/filedock"

            [storage]
            provider = "memory"
            max_upload_size_bytes = {max_upload}
            "#
        ))
        .expect("test config");
        Self::build(config).await
    }

    /// Memory repositories over the local filesystem provider rooted at `root`.
    pub async fn local(root: &std::path::Path) -> Self {
        let config = AppConfig::from_toml(&format!(
            r#"
            [database]
            url = "postgres://unused@localhost/filedock"

            [storage]
            provider = "local"

            [storage.local]
            root_path = "{}"
            signing_secret = "integration-test-signing-secret"
            public_url = "http://localhost:8080"
            "#,
            root.display()
        ))
        .expect("test config");
        Self::build(config).await
    }

    async fn build(config: AppConfig) -> Self {
        let blobs = filedock_storage::connect(&config.storage)
            .await
            .expect("object store");
        let state = AppState::new(
            config,
            std::sync::Arc::new(MemoryFileRepository::new()),
            std::sync::Arc::new(MemoryFolderRepository::new()),
            blobs.clone(),
            None,
        );

        Self {
            router: build_router(state),
            blobs,
        }
    }

    /// Make a JSON request to the test app
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let req = Request::builder().method(method).uri(path);
        let req = match body {
            Some(body) => req
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => req.body(Body::empty()),
        }
        .expect("Failed to build request");

        self.send(req).await
    }

    /// Upload `contents` as `name`, optionally into `folder_id`.
    pub async fn upload(&self, name: &str, contents: &[u8], folder_id: Option<&str>) -> TestResponse {
        let mut parts = Vec::new();
        if let Some(folder_id) = folder_id {
            parts.push(MultipartPart::Text("folderId", folder_id.to_string()));
        }
        parts.push(MultipartPart::File {
            name: name.to_string(),
            mime: "text/plain",
            data: contents.to_vec(),
        });
        self.multipart(parts).await
    }

    /// Upload and return the created record, asserting success.
    pub async fn upload_ok(&self, name: &str, folder_id: Option<&str>) -> Value {
        let response = self
            .upload(name, format!("contents of {name}").as_bytes(), folder_id)
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        response.body
    }

    /// Create a folder and return the record, asserting success.
    pub async fn folder_ok(&self, name: &str, parent_id: Option<&str>) -> Value {
        let response = self
            .request(
                "POST",
                "/api/folders",
                Some(serde_json::json!({ "name": name, "parentId": parent_id })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        response.body
    }

    pub async fn multipart(&self, parts: Vec<MultipartPart>) -> TestResponse {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                MultipartPart::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n")
                            .as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
                MultipartPart::File { name, mime, data } => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"file\"; filename=\"{name}\"\r\nContent-Type: {mime}\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(&data);
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        let req = Request::builder()
            .method("POST")
            .uri("/api/files")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("Failed to build request");
        self.send(req).await
    }

    /// GET returning the raw body, for non-JSON responses.
    pub async fn get_raw(&self, path: &str) -> (StatusCode, HeaderMap, Bytes) {
        let req = Request::builder()
            .uri(path)
            .body(Body::empty())
            .expect("Failed to build request");
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        (status, headers, body)
    }

    async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// One part of a hand-built multipart body.
pub enum MultipartPart {
    Text(&'static str, String),
    File {
        name: String,
        mime: &'static str,
        data: Vec<u8>,
    },
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `error` code of an error body.
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}

/// String field of a JSON record.
pub fn str_of<'a>(value: &'a Value, field: &str) -> &'a str {
    value[field]
        .as_str()
        .unwrap_or_else(|| panic!("missing string field {field} in {value}"))
}
