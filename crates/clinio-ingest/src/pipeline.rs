//! Import pipeline composition
//!
//! One blocking entry point per pipeline: `preview_export` runs
//! reader → materializer → classifier → aggregation for an uploaded
//! archive, and `classify_extracted` rebuilds a taxonomy from an
//! already-extracted tree for the commit step.

use std::fs;
use std::path::Path;
use std::time::Instant;

use clinio_core::models::{MaterializedFile, PreviewReport, Taxonomy};

use crate::archive::ZipEntrySource;
use crate::error::{ImportError, ImportResult};
use crate::extract::materialize;
use crate::preview::build_preview_report;
use crate::taxonomy::classify;

/// Outcome of a successful export preview.
#[derive(Debug)]
pub struct ArchivePreview {
    pub taxonomy: Taxonomy,
    pub report: PreviewReport,
}

/// Stream an uploaded archive into `extract_root`, classify it, and build
/// the bounded preview.
///
/// Fails with [`ImportError::UnrecognizedStructure`] before any aggregation
/// when the export lacks both a tables and a ledger-history bucket. The
/// caller owns cleanup of `extract_root` on every error.
pub fn preview_export(archive_path: &Path, extract_root: &Path) -> ImportResult<ArchivePreview> {
    let start = Instant::now();

    let mut source = ZipEntrySource::open_path(archive_path)?;
    let entries = source.len();
    let files = materialize(&mut source, extract_root)?;
    let taxonomy = classify(files);

    if !taxonomy.is_recognized_export {
        return Err(ImportError::UnrecognizedStructure);
    }

    let report = build_preview_report(&taxonomy);

    tracing::info!(
        entries,
        classified = taxonomy.buckets.total_files(),
        patients = report.summary.total_patients,
        ledger_rows = report.summary.total_ledger_rows,
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "export preview built"
    );

    Ok(ArchivePreview { taxonomy, report })
}

fn collect_files(
    root: &Path,
    dir: &Path,
    out: &mut Vec<MaterializedFile>,
) -> ImportResult<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let metadata = entry.metadata()?;

        if metadata.is_dir() {
            collect_files(root, &path, out)?;
            continue;
        }

        let Ok(relative) = path.strip_prefix(root) else {
            continue;
        };
        let Some(relative) = relative.to_str() else {
            continue;
        };
        out.push(MaterializedFile {
            relative_path: relative.replace(std::path::MAIN_SEPARATOR, "/"),
            absolute_path: path,
            size_bytes: metadata.len(),
        });
    }
    Ok(())
}

/// Rebuild the taxonomy of an already-extracted tree from disk.
///
/// Used by the commit step, which receives only the extraction root. Files
/// are visited in sorted relative-path order so repeated calls classify
/// identically.
pub fn classify_extracted(extract_root: &Path) -> ImportResult<Taxonomy> {
    let mut files = Vec::new();
    collect_files(extract_root, extract_root, &mut files)?;
    files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    Ok(classify(files))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::tempdir;
    use zip::write::FileOptions;
    use zip::ZipWriter;

    fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
        let mut buffer = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
            let options = FileOptions::default();
            for (name, content) in entries {
                zip.start_file(*name, options).unwrap();
                zip.write_all(content).unwrap();
            }
            zip.finish().unwrap();
        }
        std::fs::write(path, buffer).unwrap();
    }

    #[test]
    fn test_preview_export_end_to_end() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("upload-test.zip");
        let extract = dir.path().join("extract-test");
        write_zip(
            &archive,
            &[
                (
                    "00_Tables/patients.csv",
                    b"firstName,lastName\nJane,Doe\nJohn,Smith\n".as_slice(),
                ),
                ("01_LedgerHistory/jan.csv", b"date,amount\n2023-01-01,100\n"),
                ("03_ChartNotes/note.pdf", b"%PDF-fake"),
            ],
        );

        let preview = preview_export(&archive, &extract).unwrap();

        assert!(preview.taxonomy.is_recognized_export);
        assert_eq!(preview.report.patients.count, 2);
        assert_eq!(preview.report.patients.sample.len(), 2);
        assert_eq!(preview.report.ledger.count, 1);
        assert_eq!(preview.report.chart_notes.count, 1);
        assert_eq!(preview.report.summary.total_patients, 2);
        // Extracted tree is left in place for the commit step
        assert!(extract.join("00_Tables/patients.csv").exists());
    }

    #[test]
    fn test_preview_export_unrecognized_structure() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("upload-docs.zip");
        let extract = dir.path().join("extract-docs");
        write_zip(&archive, &[("02_ScannedDocs/scan.pdf", b"%PDF-fake")]);

        let err = preview_export(&archive, &extract).unwrap_err();
        assert!(matches!(err, ImportError::UnrecognizedStructure));
    }

    #[test]
    fn test_preview_export_corrupt_archive() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("upload-bad.zip");
        std::fs::write(&archive, b"definitely not a zip").unwrap();

        let err = preview_export(&archive, dir.path().join("extract-bad").as_path()).unwrap_err();
        assert!(matches!(err, ImportError::ArchiveCorrupt(_)));
    }

    #[test]
    fn test_classify_extracted_matches_preview_taxonomy() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("upload-roundtrip.zip");
        let extract = dir.path().join("extract-roundtrip");
        write_zip(
            &archive,
            &[
                ("00_Tables/patients.csv", b"n\n1\n".as_slice()),
                ("00_Tables/appointments.csv", b"n\n1\n"),
                ("02_ScannedDocs/scan.tif", b"II*"),
            ],
        );

        let preview = preview_export(&archive, &extract).unwrap();
        let reclassified = classify_extracted(&extract).unwrap();

        assert!(reclassified.is_recognized_export);
        assert_eq!(
            reclassified.buckets.total_files(),
            preview.taxonomy.buckets.total_files()
        );
        let mut expected: Vec<String> = preview
            .taxonomy
            .buckets
            .tables
            .iter()
            .map(|f| f.relative_path.clone())
            .collect();
        expected.sort();
        let actual: Vec<String> = reclassified
            .buckets
            .tables
            .iter()
            .map(|f| f.relative_path.clone())
            .collect();
        assert_eq!(actual, expected);
    }
}
