//! Import commit API integration tests.
//!
//! Run with: `cargo test -p clinio-api --test import_commit_test`

mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use helpers::{api_path, auth, fixtures, setup_test_app, TestApp};

async fn preview_export_zip(app: &TestApp) -> serde_json::Value {
    let part = Part::bytes(fixtures::chirotouch_export_zip())
        .file_name("ChiroTouch_Export.zip")
        .mime_type("application/zip");
    let response = app
        .client()
        .post(&api_path("/import-export/upload"))
        .add_header("Authorization", auth::service_bearer())
        .multipart(MultipartForm::new().add_part("importFile", part))
        .await;
    assert_eq!(response.status_code(), 200);
    response.json()
}

#[tokio::test]
async fn test_commit_consumes_previewed_export() {
    let app = setup_test_app();
    let preview = preview_export_zip(&app).await;

    let extract_path = preview["extractPath"].as_str().unwrap().to_string();
    let upload_id = preview["uploadId"].as_str().unwrap().to_string();
    assert!(std::path::Path::new(&extract_path).is_dir());

    let response = app
        .client()
        .post(&api_path("/import-export/commit"))
        .add_header("Authorization", auth::service_bearer())
        .json(&serde_json::json!({
            "uploadId": upload_id,
            "extractPath": extract_path,
        }))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["uploadId"], upload_id.as_str());
    assert_eq!(body["result"]["patientsCreated"], 0);
    assert_eq!(body["result"]["skipped"], 0);

    // The scratch tree is gone once the committer has consumed it.
    assert!(!std::path::Path::new(&extract_path).exists());
}

#[tokio::test]
async fn test_commit_rejects_extract_path_outside_uploads_root() {
    let app = setup_test_app();

    let outside = tempfile::tempdir().unwrap();
    let decoy = outside.path().join("extract-decoy");
    std::fs::create_dir(&decoy).unwrap();

    let response = app
        .client()
        .post(&api_path("/import-export/commit"))
        .add_header("Authorization", auth::service_bearer())
        .json(&serde_json::json!({
            "uploadId": "abc123",
            "extractPath": decoy.display().to_string(),
        }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "ARCHIVE_PATH_TRAVERSAL");
    // The decoy tree is left alone.
    assert!(decoy.is_dir());
}

#[tokio::test]
async fn test_commit_rejects_missing_extract_path() {
    let app = setup_test_app();

    let missing = app.uploads_root.join("extract-never-was");
    let response = app
        .client()
        .post(&api_path("/import-export/commit"))
        .add_header("Authorization", auth::service_bearer())
        .json(&serde_json::json!({
            "uploadId": "abc123",
            "extractPath": missing.display().to_string(),
        }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Extract path does not exist");
}

#[tokio::test]
async fn test_commit_rejects_tree_that_no_longer_looks_like_an_export() {
    let app = setup_test_app();

    // Hand-build a kept tree holding only documents; the commit-time
    // re-classification must refuse it.
    let extract = app.uploads_root.join("extract-manual");
    std::fs::create_dir_all(extract.join("02_ScannedDocs")).unwrap();
    std::fs::write(extract.join("02_ScannedDocs/xray.pdf"), b"%PDF-1.4").unwrap();

    let response = app
        .client()
        .post(&api_path("/import-export/commit"))
        .add_header("Authorization", auth::service_bearer())
        .json(&serde_json::json!({
            "uploadId": "abc123",
            "extractPath": extract.display().to_string(),
        }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(
        body["message"],
        "Invalid ChiroTouch export structure. Expected 00_Tables or 01_LedgerHistory folder."
    );
    assert!(!extract.exists());
}

#[tokio::test]
async fn test_commit_rejects_malformed_body() {
    let app = setup_test_app();

    let response = app
        .client()
        .post(&api_path("/import-export/commit"))
        .add_header("Authorization", auth::service_bearer())
        .text("{not json")
        .await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_commit_requires_authentication() {
    let app = setup_test_app();

    let response = app
        .client()
        .post(&api_path("/import-export/commit"))
        .json(&serde_json::json!({
            "uploadId": "abc123",
            "extractPath": "/tmp/extract-x",
        }))
        .await;

    assert_eq!(response.status_code(), 401);
}
