//! Entry materializer
//!
//! Drains a [`ZipEntrySource`] into a destination directory, yielding the
//! list of files written. Every entry path is validated before any
//! filesystem touch: absolute paths and parent-directory components are
//! rejected so a crafted archive cannot write outside the extraction root.

use std::fs;
use std::io::{self, Read, Seek};
use std::path::{Component, Path, PathBuf};

use clinio_core::models::MaterializedFile;

use crate::archive::ZipEntrySource;
use crate::error::{ImportError, ImportResult};

/// Resolve an entry name against `root`, rejecting any name that would
/// escape it.
fn entry_destination(root: &Path, name: &str) -> ImportResult<PathBuf> {
    let relative = Path::new(name);
    if relative.is_absolute() {
        return Err(ImportError::PathTraversal(name.to_string()));
    }

    let mut destination = root.to_path_buf();
    for component in relative.components() {
        match component {
            Component::Normal(part) => destination.push(part),
            Component::CurDir => {}
            // ParentDir, RootDir and Prefix all escape the root
            _ => return Err(ImportError::PathTraversal(name.to_string())),
        }
    }
    Ok(destination)
}

/// Materialize every entry of `source` under `dest_root`.
///
/// Directory entries become directories (idempotent); file entries are
/// streamed to disk one at a time and recorded with their written size.
/// The caller owns cleanup of `dest_root` on failure.
pub fn materialize<R: Read + Seek>(
    source: &mut ZipEntrySource<R>,
    dest_root: &Path,
) -> ImportResult<Vec<MaterializedFile>> {
    let mut files = Vec::new();

    while let Some(entry) = source.next_entry() {
        let mut entry = entry?;
        let name = entry.name().to_string();
        let destination = entry_destination(dest_root, &name)?;

        if entry.is_dir() {
            fs::create_dir_all(&destination)?;
            continue;
        }

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut output = fs::File::create(&destination)?;
        let size_bytes = io::copy(&mut entry, &mut output)?;

        tracing::debug!(
            entry = %name,
            size_bytes,
            "materialized archive entry"
        );

        files.push(MaterializedFile {
            relative_path: name,
            absolute_path: destination,
            size_bytes,
        });
    }

    tracing::info!(
        files = files.len(),
        dest = %dest_root.display(),
        "archive materialized"
    );

    Ok(files)
}
