//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p clinio-api --test import_upload_test` or
//! `cargo test -p clinio-api`. Every test gets its own uploads root.

pub mod auth;
pub mod fixtures;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum_test::TestServer;
use clinio_api::constants;
use clinio_api::setup::routes;
use clinio_api::state::AppState;
use clinio_core::config::{BaseConfig, ImportServiceConfig};
use clinio_core::Config;
use clinio_ingest::NullCommitter;
use tempfile::TempDir;

/// API path prefix for tests (e.g. `/api/v0`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Test application: server plus the uploads root imports spool into.
pub struct TestApp {
    pub server: TestServer,
    pub uploads_root: PathBuf,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Files currently sitting directly under the uploads root.
    pub fn uploads_root_entries(&self) -> Vec<String> {
        std::fs::read_dir(&self.uploads_root)
            .expect("Failed to read uploads root")
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect()
    }
}

/// Setup test app with an isolated uploads root.
pub fn setup_test_app() -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let uploads_root = temp_dir.path().join("uploads");
    std::fs::create_dir_all(&uploads_root).expect("Failed to create uploads root");

    let config = create_test_config(&uploads_root);
    let state = Arc::new(AppState::from_config(&config, Arc::new(NullCommitter)));

    let app = routes::setup_routes(&config, state).expect("Failed to setup routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        uploads_root,
        _temp_dir: temp_dir,
    }
}

fn create_test_config(uploads_root: &Path) -> Config {
    let base = BaseConfig {
        server_port: 4000,
        cors_origins: vec!["*".to_string()],
        jwt_secret: auth::TEST_JWT_SECRET.to_string(),
        jwt_expiry_hours: 24,
        environment: "test".to_string(),
    };
    Config(Box::new(ImportServiceConfig {
        base,
        service_api_key: Some(auth::TEST_SERVICE_API_KEY.to_string()),
        uploads_root: uploads_root.display().to_string(),
        // Small enough that the oversize test stays cheap.
        max_import_size_bytes: 8 * 1024 * 1024,
        import_allowed_extensions: vec![
            "csv".to_string(),
            "xlsx".to_string(),
            "xls".to_string(),
            "zip".to_string(),
        ],
        max_concurrent_imports: 4,
        scratch_ttl_hours: 24,
        scratch_sweep_interval_secs: 0,
    }))
}
