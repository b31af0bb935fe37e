//! Application state and sub-state extractors.
//!
//! AppState is split so handlers can extract only what they need via Axum's
//! `FromRef` instead of dragging the whole state through every signature.

use clinio_core::Config;
use clinio_ingest::ImportCommitter;
use std::path::PathBuf;
use std::sync::Arc;

// ----- Sub-state types -----

/// Limits, allowlist, and scratch location for the import pipeline.
#[derive(Clone)]
pub struct ImportConfig {
    pub uploads_root: PathBuf,
    pub max_import_size_bytes: usize,
    pub allowed_extensions: Vec<String>,
}

// ----- AppState -----

/// Main application state: import configuration plus the commit collaborator.
#[derive(Clone)]
pub struct AppState {
    pub imports: ImportConfig,
    pub committer: Arc<dyn ImportCommitter>,
}

impl AppState {
    /// Build state from configuration with the given commit collaborator.
    pub fn from_config(config: &Config, committer: Arc<dyn ImportCommitter>) -> Self {
        AppState {
            imports: ImportConfig {
                uploads_root: config.uploads_root().to_path_buf(),
                max_import_size_bytes: config.max_import_size_bytes(),
                allowed_extensions: config.import_allowed_extensions().to_vec(),
            },
            committer,
        }
    }
}

// ----- FromRef for sub-state extraction -----

impl axum::extract::FromRef<Arc<AppState>> for ImportConfig {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.imports.clone()
    }
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
