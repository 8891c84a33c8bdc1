//! Integration tests for folder operations and their cascades.

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use crate::helpers::{TestApp, str_of};

async fn folder_path(app: &TestApp, id: &str) -> String {
    let response = app.request("GET", &format!("/api/folders/{id}"), None).await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    str_of(&response.body, "path").to_string()
}

#[tokio::test]
async fn test_create_nested_folders() {
    let app = TestApp::new().await;

    let docs = app.folder_ok("Docs", None).await;
    assert_eq!(docs["path"], "Docs");
    assert_eq!(docs["parentId"], serde_json::Value::Null);

    let reports = app.folder_ok("Reports", Some(str_of(&docs, "id"))).await;
    assert_eq!(reports["path"], "Docs/Reports");
    assert_eq!(reports["parentId"], docs["id"]);

    let listed = app.request("GET", "/api/folders", None).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_create_folder_errors() {
    let app = TestApp::new().await;
    app.folder_ok("Docs", None).await;

    let response = app
        .request("POST", "/api/folders", Some(json!({ "name": "Docs" })))
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.error_code(), "CONFLICT");

    let response = app
        .request(
            "POST",
            "/api/folders",
            Some(json!({ "name": "Orphan", "parentId": Uuid::new_v4() })),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .request("POST", "/api/folders", Some(json!({ "name": "" })))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request("POST", "/api/folders", Some(json!({ "name": "a/b" })))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app.request("POST", "/api/folders", Some(json!({}))).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_folder_not_found() {
    let app = TestApp::new().await;

    let response = app
        .request("GET", &format!("/api/folders/{}", Uuid::new_v4()), None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "Folder not found");

    let response = app.request("GET", "/api/folders/xyz", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rename_cascades_to_descendants_only() {
    let app = TestApp::new().await;
    let docs = app.folder_ok("Docs", None).await;
    let reports = app.folder_ok("Reports", Some(str_of(&docs, "id"))).await;
    let year = app.folder_ok("2024", Some(str_of(&reports, "id"))).await;
    let lookalike = app.folder_ok("Docsx", None).await;
    let lookalike_child = app.folder_ok("Inner", Some(str_of(&lookalike, "id"))).await;

    let response = app
        .request(
            "PUT",
            &format!("/api/folders/{}", str_of(&docs, "id")),
            Some(json!({ "name": "Archive" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["name"], "Archive");
    assert_eq!(response.body["path"], "Archive");

    assert_eq!(folder_path(&app, str_of(&reports, "id")).await, "Archive/Reports");
    assert_eq!(folder_path(&app, str_of(&year, "id")).await, "Archive/Reports/2024");
    assert_eq!(folder_path(&app, str_of(&lookalike, "id")).await, "Docsx");
    assert_eq!(folder_path(&app, str_of(&lookalike_child, "id")).await, "Docsx/Inner");
}

#[tokio::test]
async fn test_rename_changes_last_segment_only() {
    let app = TestApp::new().await;
    let outer = app.folder_ok("a", None).await;
    let inner = app.folder_ok("a", Some(str_of(&outer, "id"))).await;

    let response = app
        .request(
            "PUT",
            &format!("/api/folders/{}", str_of(&inner, "id")),
            Some(json!({ "name": "b" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["path"], "a/b");
    assert_eq!(folder_path(&app, str_of(&outer, "id")).await, "a");
}

#[tokio::test]
async fn test_rename_into_taken_path_conflicts() {
    let app = TestApp::new().await;
    let docs = app.folder_ok("Docs", None).await;
    app.folder_ok("Music", None).await;

    let response = app
        .request(
            "PUT",
            &format!("/api/folders/{}", str_of(&docs, "id")),
            Some(json!({ "name": "Music" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(folder_path(&app, str_of(&docs, "id")).await, "Docs");
}

#[tokio::test]
async fn test_move_folder_with_subtree() {
    let app = TestApp::new().await;
    let docs = app.folder_ok("Docs", None).await;
    let reports = app.folder_ok("Reports", Some(str_of(&docs, "id"))).await;
    let year = app.folder_ok("2024", Some(str_of(&reports, "id"))).await;
    let archive = app.folder_ok("Archive", None).await;

    let response = app
        .request(
            "PUT",
            &format!("/api/folders/{}/move", str_of(&reports, "id")),
            Some(json!({ "parentId": archive["id"] })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["path"], "Archive/Reports");
    assert_eq!(response.body["parentId"], archive["id"]);
    assert_eq!(folder_path(&app, str_of(&year, "id")).await, "Archive/Reports/2024");

    let response = app
        .request(
            "PUT",
            &format!("/api/folders/{}/move", str_of(&reports, "id")),
            Some(json!({ "parentId": null })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["path"], "Reports");
    assert_eq!(folder_path(&app, str_of(&year, "id")).await, "Reports/2024");
}

#[tokio::test]
async fn test_move_folder_errors() {
    let app = TestApp::new().await;
    let docs = app.folder_ok("Docs", None).await;
    let reports = app.folder_ok("Reports", Some(str_of(&docs, "id"))).await;
    let move_docs = format!("/api/folders/{}/move", str_of(&docs, "id"));

    let response = app
        .request("PUT", &move_docs, Some(json!({ "parentId": reports["id"] })))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request("PUT", &move_docs, Some(json!({ "parentId": docs["id"] })))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request("PUT", &move_docs, Some(json!({ "parentId": Uuid::new_v4() })))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let move_reports = format!("/api/folders/{}/move", str_of(&reports, "id"));
    let response = app.request("PUT", &move_reports, Some(json!({}))).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");
    assert_eq!(folder_path(&app, str_of(&reports, "id")).await, "Docs/Reports");

    app.folder_ok("Reports", None).await;
    let response = app
        .request(
            "PUT",
            &format!("/api/folders/{}/move", str_of(&reports, "id")),
            Some(json!({ "parentId": null })),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_delete_folder_cascades() {
    let app = TestApp::new().await;
    let docs = app.folder_ok("Docs", None).await;
    let reports = app.folder_ok("Reports", Some(str_of(&docs, "id"))).await;
    let year = app.folder_ok("2024", Some(str_of(&reports, "id"))).await;
    let keep = app.folder_ok("Docsx", None).await;

    let top = app.upload_ok("top.txt", Some(str_of(&docs, "id"))).await;
    let mid = app.upload_ok("mid.txt", Some(str_of(&reports, "id"))).await;
    let deep = app.upload_ok("deep.txt", Some(str_of(&year, "id"))).await;
    let kept = app.upload_ok("kept.txt", Some(str_of(&keep, "id"))).await;
    let loose = app.upload_ok("loose.txt", None).await;

    let response = app
        .request("DELETE", &format!("/api/folders/{}", str_of(&docs, "id")), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["message"].is_string());
    assert_eq!(response.body["foldersDeleted"], 3);
    assert_eq!(response.body["filesDeleted"], 3);

    for file in [&top, &mid, &deep] {
        assert!(!app.blobs.exists(str_of(file, "name")).await.unwrap());
        let response = app
            .request("GET", &format!("/api/files/{}", str_of(file, "id")), None)
            .await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }
    for folder in [&docs, &reports, &year] {
        let response = app
            .request("GET", &format!("/api/folders/{}", str_of(folder, "id")), None)
            .await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }

    let remaining = app.request("GET", "/api/files", None).await;
    let ids: Vec<&serde_json::Value> = remaining
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|f| &f["id"])
        .collect();
    assert_eq!(ids, [&loose["id"], &kept["id"]]);

    let folders = app.request("GET", "/api/folders", None).await;
    assert_eq!(folders.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_missing_folder() {
    let app = TestApp::new().await;
    let response = app
        .request("DELETE", &format!("/api/folders/{}", Uuid::new_v4()), None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_folder_tree() {
    let app = TestApp::new().await;
    let music = app.folder_ok("Music", None).await;
    let docs = app.folder_ok("Docs", None).await;
    app.folder_ok("Reports", Some(str_of(&docs, "id"))).await;
    app.upload_ok("a.txt", Some(str_of(&docs, "id"))).await;
    app.upload_ok("b.txt", None).await;

    let response = app.request("GET", "/api/folders/tree", None).await;
    assert_eq!(response.status, StatusCode::OK);

    let tree = &response.body;
    assert_eq!(tree["totalFolders"], 3);
    assert_eq!(tree["rootFileCount"], 1);

    let roots = tree["roots"].as_array().unwrap();
    assert_eq!(roots.len(), 2);
    assert_eq!(roots[0]["id"], docs["id"]);
    assert_eq!(roots[0]["fileCount"], 1);
    assert_eq!(roots[0]["children"][0]["path"], "Docs/Reports");
    assert_eq!(roots[1]["id"], music["id"]);
    assert_eq!(roots[1]["children"], json!([]));
}
