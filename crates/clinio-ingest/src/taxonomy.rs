//! Taxonomy classifier
//!
//! Pure classification of materialized files into the fixed ChiroTouch
//! export buckets by case-insensitive path prefix. Files matching no bucket
//! are dropped from the taxonomy (they still exist on disk).

use clinio_core::models::{ExportBucket, MaterializedFile, Taxonomy, TaxonomyBuckets};

fn starts_with_ignore_ascii_case(path: &str, prefix: &str) -> bool {
    path.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn match_bucket(relative_path: &str) -> Option<ExportBucket> {
    ExportBucket::ALL
        .iter()
        .copied()
        .find(|bucket| starts_with_ignore_ascii_case(relative_path, bucket.path_prefix()))
}

/// Classify `files` into export buckets, preserving input order within each
/// bucket. Deterministic; no error conditions.
pub fn classify(files: Vec<MaterializedFile>) -> Taxonomy {
    let mut buckets = TaxonomyBuckets::default();
    for file in files {
        if let Some(bucket) = match_bucket(&file.relative_path) {
            buckets.bucket_mut(bucket).push(file);
        }
    }
    Taxonomy::from_buckets(buckets)
}
