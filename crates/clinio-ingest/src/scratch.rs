//! Scratch directory lifecycle
//!
//! Each ZIP upload extracts into its own directory under the uploads root,
//! named `extract-<uploadId>`. The [`ScratchDir`] guard removes the tree on
//! drop unless [`ScratchDir::keep`] hands ownership off (the success path,
//! where the tree survives for a later commit). [`sweep_stale`] reaps trees
//! and spooled archives that were handed off but never committed.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use uuid::Uuid;

/// Time-prefixed unique id for one upload request. Namespaces the scratch
/// directory so concurrent requests never collide.
pub fn new_upload_id() -> String {
    format!("{}-{}", chrono::Utc::now().timestamp_millis(), Uuid::new_v4())
}

/// Request-scoped extraction directory with cleanup-on-drop.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
    keep: bool,
}

impl ScratchDir {
    /// Create `<uploads_root>/extract-<upload_id>`, creating the uploads
    /// root itself if needed.
    pub fn create(uploads_root: &Path, upload_id: &str) -> io::Result<Self> {
        let path = uploads_root.join(format!("extract-{}", upload_id));
        fs::create_dir_all(&path)?;
        Ok(ScratchDir { path, keep: false })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Hand the tree off to the caller. Drop no longer removes it; the
    /// commit step (or the stale sweeper) becomes responsible for it.
    pub fn keep(mut self) -> PathBuf {
        self.keep = true;
        self.path.clone()
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if self.keep {
            return;
        }
        if let Err(err) = fs::remove_dir_all(&self.path) {
            if err.kind() != io::ErrorKind::NotFound {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "failed to remove scratch directory"
                );
            }
        }
    }
}

/// Remove extraction trees and spooled uploads older than `ttl`.
///
/// Only entries named `extract-*` or `upload-*` are touched; anything else
/// under the uploads root is left alone. Returns the number of entries
/// removed.
pub fn sweep_stale(uploads_root: &Path, ttl: Duration) -> io::Result<usize> {
    let entries = match fs::read_dir(uploads_root) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(err) => return Err(err),
    };

    let now = SystemTime::now();
    let mut removed = 0;

    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if !name.starts_with("extract-") && !name.starts_with("upload-") {
            continue;
        }

        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        let Ok(modified) = metadata.modified() else {
            continue;
        };
        let stale = now
            .duration_since(modified)
            .map_or(false, |age| age >= ttl);
        if !stale {
            continue;
        }

        let path = entry.path();
        let result = if metadata.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        match result {
            Ok(()) => {
                removed += 1;
                tracing::info!(path = %path.display(), "removed stale scratch entry");
            }
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to remove stale scratch entry"
                );
            }
        }
    }

    Ok(removed)
}
