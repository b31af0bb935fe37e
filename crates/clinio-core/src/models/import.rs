use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

/// Maximum rows kept in a per-entity preview sample.
pub const SAMPLE_ROW_CAP: usize = 5;
/// Maximum files listed in a document inventory section.
pub const DOCUMENT_LISTING_CAP: usize = 10;
/// Maximum rows returned in the single-file tabular preview.
pub const TABULAR_PREVIEW_CAP: usize = 10;

/// A parsed tabular record: field name to string value, in source column order.
///
/// `serde_json::Map` preserves insertion order (the `preserve_order` feature),
/// so serialized rows keep the column order of the source file.
pub type Row = serde_json::Map<String, JsonValue>;

/// ChiroTouch export bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ExportBucket {
    Tables,
    LedgerHistory,
    Statements,
    ScannedDocs,
    ChartNotes,
}

impl ExportBucket {
    pub const ALL: [ExportBucket; 5] = [
        ExportBucket::Tables,
        ExportBucket::LedgerHistory,
        ExportBucket::Statements,
        ExportBucket::ScannedDocs,
        ExportBucket::ChartNotes,
    ];

    /// Top-level folder prefix of this bucket in a ChiroTouch export.
    /// Matched case-insensitively against entry paths.
    pub fn path_prefix(&self) -> &'static str {
        match self {
            ExportBucket::Tables => "00_Tables/",
            ExportBucket::LedgerHistory => "01_LedgerHistory/",
            ExportBucket::Statements => "01_Statements/",
            ExportBucket::ScannedDocs => "02_ScannedDocs/",
            ExportBucket::ChartNotes => "03_ChartNotes/",
        }
    }
}

impl std::fmt::Display for ExportBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ExportBucket::Tables => "tables",
            ExportBucket::LedgerHistory => "ledgerHistory",
            ExportBucket::Statements => "statements",
            ExportBucket::ScannedDocs => "scannedDocs",
            ExportBucket::ChartNotes => "chartNotes",
        };
        write!(f, "{}", name)
    }
}

/// A file extracted from an uploaded archive into the request's scratch tree.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaterializedFile {
    /// Path relative to the extraction root, always forward-slash separated.
    pub relative_path: String,
    /// On-disk location; server internal, never serialized.
    #[serde(skip)]
    pub absolute_path: PathBuf,
    pub size_bytes: u64,
}

impl MaterializedFile {
    /// Final path segment of the relative path.
    pub fn base_name(&self) -> &str {
        self.relative_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.relative_path)
    }
}

/// Per-bucket file listings of a classified export.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaxonomyBuckets {
    pub tables: Vec<MaterializedFile>,
    pub ledger_history: Vec<MaterializedFile>,
    pub statements: Vec<MaterializedFile>,
    pub scanned_docs: Vec<MaterializedFile>,
    pub chart_notes: Vec<MaterializedFile>,
}

impl TaxonomyBuckets {
    pub fn bucket(&self, bucket: ExportBucket) -> &[MaterializedFile] {
        match bucket {
            ExportBucket::Tables => &self.tables,
            ExportBucket::LedgerHistory => &self.ledger_history,
            ExportBucket::Statements => &self.statements,
            ExportBucket::ScannedDocs => &self.scanned_docs,
            ExportBucket::ChartNotes => &self.chart_notes,
        }
    }

    pub fn bucket_mut(&mut self, bucket: ExportBucket) -> &mut Vec<MaterializedFile> {
        match bucket {
            ExportBucket::Tables => &mut self.tables,
            ExportBucket::LedgerHistory => &mut self.ledger_history,
            ExportBucket::Statements => &mut self.statements,
            ExportBucket::ScannedDocs => &mut self.scanned_docs,
            ExportBucket::ChartNotes => &mut self.chart_notes,
        }
    }

    pub fn total_files(&self) -> usize {
        ExportBucket::ALL
            .iter()
            .map(|b| self.bucket(*b).len())
            .sum()
    }
}

/// Classified structure of an uploaded export archive.
///
/// Invariant: `is_recognized_export` is true iff the `tables` or
/// `ledger_history` bucket is non-empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Taxonomy {
    pub is_recognized_export: bool,
    pub buckets: TaxonomyBuckets,
}

impl Taxonomy {
    pub fn from_buckets(buckets: TaxonomyBuckets) -> Self {
        let is_recognized_export =
            !buckets.tables.is_empty() || !buckets.ledger_history.is_empty();
        Taxonomy {
            is_recognized_export,
            buckets,
        }
    }
}

/// Bounded preview of one tabular entity (patients, appointments, ledger).
/// `count` covers every parsed row; `sample` holds at most [`SAMPLE_ROW_CAP`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PreviewSection {
    pub count: u64,
    #[schema(value_type = Vec<Object>)]
    pub sample: Vec<Row>,
}

/// One file in a document inventory listing. `file_name` is the base name
/// only, not the bucket-relative path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentFile {
    pub file_name: String,
    pub size_bytes: u64,
}

/// Count plus a bounded listing for a document bucket (chart notes, scanned
/// docs). `files` holds at most [`DOCUMENT_LISTING_CAP`] entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInventorySection {
    pub count: u64,
    pub files: Vec<DocumentFile>,
}

/// Flat totals across every previewed section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub total_patients: u64,
    pub total_appointments: u64,
    pub total_ledger_rows: u64,
    pub total_chart_notes: u64,
    pub total_scanned_docs: u64,
}

/// The `preview` object of an [`ImportPreview`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PreviewReport {
    pub patients: PreviewSection,
    pub appointments: PreviewSection,
    pub ledger: PreviewSection,
    pub chart_notes: DocumentInventorySection,
    pub scanned_docs: DocumentInventorySection,
    pub summary: ImportSummary,
}

/// Response body of a successful ZIP import preview.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportPreview {
    pub success: bool,
    pub is_chirotouch: bool,
    pub structure: Taxonomy,
    pub preview: PreviewReport,
    pub upload_id: String,
    /// Scratch location of the extracted tree, for the follow-on commit step.
    pub extract_path: String,
}

/// Response body of the CSV/Excel single-file preview path.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TabularPreview {
    pub success: bool,
    pub total_rows: u64,
    /// First rows, at most [`TABULAR_PREVIEW_CAP`].
    #[schema(value_type = Vec<Object>)]
    pub preview: Vec<Row>,
    /// Field names of the first row.
    pub columns: Vec<String>,
    pub upload_id: String,
    #[schema(value_type = Vec<Object>)]
    pub data: Vec<Row>,
}

/// Result returned by the commit collaborator after consuming an extracted
/// export tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportCommitResult {
    pub patients_created: u64,
    pub appointments_created: u64,
    pub ledger_rows_created: u64,
    pub skipped: u64,
}
