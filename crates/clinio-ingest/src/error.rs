//! Import pipeline error types

use clinio_core::AppError;

/// Client-facing message for archives that are not ChiroTouch exports.
pub const UNRECOGNIZED_EXPORT_MESSAGE: &str =
    "Invalid ChiroTouch export structure. Expected 00_Tables or 01_LedgerHistory folder.";

pub type ImportResult<T> = Result<T, ImportError>;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// The archive's central directory cannot be located or is inconsistent.
    #[error("Cannot read archive: {0}")]
    ArchiveCorrupt(String),

    /// A single entry's content stream could not be opened. Structural:
    /// aborts the whole import rather than skipping the entry.
    #[error("Cannot open archive entry {name}")]
    EntryRead {
        name: String,
        #[source]
        source: zip::result::ZipError,
    },

    /// An entry's path would resolve outside the extraction root.
    #[error("Archive entry escapes extraction root: {0}")]
    PathTraversal(String),

    /// A materialized tabular file could not be parsed. Tolerated per file
    /// during aggregation; fatal only on the single-file upload path.
    #[error("Cannot parse {path}: {reason}")]
    Parse { path: String, reason: String },

    /// The extracted tree has neither a tables nor a ledger-history bucket.
    #[error("Archive is not a recognized ChiroTouch export")]
    UnrecognizedStructure,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<ImportError> for AppError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::ArchiveCorrupt(msg) => AppError::ArchiveCorrupt(msg),
            ImportError::EntryRead { name, source } => {
                AppError::ArchiveCorrupt(format!("cannot open entry {}: {}", name, source))
            }
            ImportError::PathTraversal(name) => AppError::PathTraversal(name),
            ImportError::Parse { path, reason } => {
                AppError::InvalidInput(format!("Cannot parse {}: {}", path, reason))
            }
            ImportError::UnrecognizedStructure => {
                AppError::UnrecognizedExport(UNRECOGNIZED_EXPORT_MESSAGE.to_string())
            }
            ImportError::Io(e) => AppError::Internal(format!("IO error: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinio_core::ErrorMetadata;

    #[test]
    fn test_unrecognized_maps_to_chirotouch_message() {
        let app: AppError = ImportError::UnrecognizedStructure.into();
        assert_eq!(app.http_status_code(), 400);
        assert!(app
            .client_message()
            .starts_with("Invalid ChiroTouch export structure"));
    }

    #[test]
    fn test_traversal_maps_to_400() {
        let app: AppError = ImportError::PathTraversal("../../evil.txt".to_string()).into();
        assert_eq!(app.http_status_code(), 400);
        assert_eq!(app.error_code(), "ARCHIVE_PATH_TRAVERSAL");
    }

    #[test]
    fn test_io_maps_to_internal() {
        let io = std::io::Error::other("disk full");
        let app: AppError = ImportError::Io(io).into();
        assert_eq!(app.http_status_code(), 500);
        assert_eq!(app.client_message(), "Internal server error");
    }
}
