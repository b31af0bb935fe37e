//! Preview aggregation
//!
//! Folds the classified buckets of an export into the bounded preview
//! payload: summed row counts with small samples for the tabular entities,
//! count-plus-listing for the document buckets. A file that fails to parse
//! is logged and skipped; the batch always completes with whatever parsed.

use clinio_core::models::{
    DocumentFile, DocumentInventorySection, ExportBucket, ImportSummary, MaterializedFile,
    PreviewReport, PreviewSection, Taxonomy, DOCUMENT_LISTING_CAP, SAMPLE_ROW_CAP,
};

use crate::tabular::parse_csv;

/// A bucket file whose parse failed and contributed zero rows.
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub relative_path: String,
    pub reason: String,
}

/// Aggregated tabular sections plus per-file parse failures.
#[derive(Debug, Default)]
pub struct TableAggregates {
    pub patients: PreviewSection,
    pub appointments: PreviewSection,
    pub ledger: PreviewSection,
    pub skipped: Vec<SkippedFile>,
}

fn is_delimited_text(file: &MaterializedFile) -> bool {
    file.base_name()
        .rsplit('.')
        .next()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// Sum row counts and accumulate the first [`SAMPLE_ROW_CAP`] rows across
/// the selected files, in file-iteration order.
fn collect_entity(
    files: &[MaterializedFile],
    name_filter: Option<&str>,
    skipped: &mut Vec<SkippedFile>,
) -> PreviewSection {
    let mut section = PreviewSection::default();

    for file in files {
        if !is_delimited_text(file) {
            continue;
        }
        if let Some(needle) = name_filter {
            if !file.base_name().to_ascii_lowercase().contains(needle) {
                continue;
            }
        }

        match parse_csv(&file.absolute_path) {
            Ok(table) => {
                section.count += table.rows.len() as u64;
                for row in table.rows {
                    if section.sample.len() >= SAMPLE_ROW_CAP {
                        break;
                    }
                    section.sample.push(row);
                }
            }
            Err(err) => {
                tracing::warn!(
                    file = %file.relative_path,
                    error = %err,
                    "skipping unparseable table file"
                );
                skipped.push(SkippedFile {
                    relative_path: file.relative_path.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }

    section
}

/// Build the patients / appointments / ledger sections from a taxonomy.
///
/// Patients and appointments come from `tables` files whose name contains
/// the entity keyword; ledger covers every delimited file in
/// `ledgerHistory`. Parse failures never abort the aggregation.
pub fn aggregate_tables(taxonomy: &Taxonomy) -> TableAggregates {
    let mut skipped = Vec::new();
    let tables = taxonomy.buckets.bucket(ExportBucket::Tables);
    let ledger_files = taxonomy.buckets.bucket(ExportBucket::LedgerHistory);

    let patients = collect_entity(tables, Some("patient"), &mut skipped);
    let appointments = collect_entity(tables, Some("appointment"), &mut skipped);
    let ledger = collect_entity(ledger_files, None, &mut skipped);

    if !skipped.is_empty() {
        tracing::warn!(
            skipped = skipped.len(),
            "preview aggregation completed with skipped files"
        );
    }

    TableAggregates {
        patients,
        appointments,
        ledger,
        skipped,
    }
}

/// Count a document bucket and list its first [`DOCUMENT_LISTING_CAP`] files
/// by base name and size. No parsing.
pub fn summarize_documents(files: &[MaterializedFile]) -> DocumentInventorySection {
    DocumentInventorySection {
        count: files.len() as u64,
        files: files
            .iter()
            .take(DOCUMENT_LISTING_CAP)
            .map(|file| DocumentFile {
                file_name: file.base_name().to_string(),
                size_bytes: file.size_bytes,
            })
            .collect(),
    }
}

/// Assemble the full preview report for a classified export.
pub fn build_preview_report(taxonomy: &Taxonomy) -> PreviewReport {
    let aggregates = aggregate_tables(taxonomy);
    let chart_notes = summarize_documents(taxonomy.buckets.bucket(ExportBucket::ChartNotes));
    let scanned_docs = summarize_documents(taxonomy.buckets.bucket(ExportBucket::ScannedDocs));

    let summary = ImportSummary {
        total_patients: aggregates.patients.count,
        total_appointments: aggregates.appointments.count,
        total_ledger_rows: aggregates.ledger.count,
        total_chart_notes: chart_notes.count,
        total_scanned_docs: scanned_docs.count,
    };

    PreviewReport {
        patients: aggregates.patients,
        appointments: aggregates.appointments,
        ledger: aggregates.ledger,
        chart_notes,
        scanned_docs,
        summary,
    }
}
