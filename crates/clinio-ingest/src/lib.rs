//! Clinio Ingest Library
//!
//! Streaming ChiroTouch export ingest: archive reading, scratch-tree
//! materialization, taxonomy classification, and bounded preview aggregation.
//! Everything here is synchronous blocking I/O; callers on an async runtime
//! are expected to run the pipeline inside `spawn_blocking`.

pub mod archive;
pub mod commit;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod preview;
pub mod scratch;
pub mod tabular;
pub mod taxonomy;

// Re-export commonly used types
pub use archive::{ArchiveEntryInfo, ZipEntrySource};
pub use commit::{ImportCommitter, NullCommitter};
pub use error::{ImportError, ImportResult, UNRECOGNIZED_EXPORT_MESSAGE};
pub use extract::materialize;
pub use pipeline::{classify_extracted, preview_export, ArchivePreview};
pub use preview::{aggregate_tables, build_preview_report, summarize_documents};
pub use scratch::{new_upload_id, sweep_stale, ScratchDir};
pub use tabular::{parse_csv, parse_excel, ParsedTable};
pub use taxonomy::classify;
