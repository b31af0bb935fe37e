//! Commit collaborator seam
//!
//! Persisting parsed export data into the platform's stores is not this
//! service's job. The orchestrator hands a classified scratch tree to an
//! [`ImportCommitter`]; the platform supplies a real implementation, and
//! [`NullCommitter`] stands in until then.

use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;
use clinio_core::models::{ImportCommitResult, Taxonomy};
use uuid::Uuid;

/// Consumes an extracted, classified export tree on behalf of a clinic.
///
/// Implementations own durable persistence; the caller owns deletion of the
/// scratch tree once `commit` returns.
#[async_trait]
pub trait ImportCommitter: Send + Sync {
    async fn commit(
        &self,
        clinic_id: Uuid,
        user_id: Uuid,
        extract_path: &Path,
        taxonomy: &Taxonomy,
    ) -> Result<ImportCommitResult>;
}

/// Acknowledges commits without persisting anything.
pub struct NullCommitter;

#[async_trait]
impl ImportCommitter for NullCommitter {
    async fn commit(
        &self,
        clinic_id: Uuid,
        user_id: Uuid,
        extract_path: &Path,
        taxonomy: &Taxonomy,
    ) -> Result<ImportCommitResult> {
        tracing::info!(
            clinic_id = %clinic_id,
            user_id = %user_id,
            path = %extract_path.display(),
            files = taxonomy.buckets.total_files(),
            "acknowledged import commit without persistence"
        );
        Ok(ImportCommitResult::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinio_core::models::TaxonomyBuckets;

    #[tokio::test]
    async fn test_null_committer_returns_zero_counts() {
        let committer = NullCommitter;
        let taxonomy = Taxonomy::from_buckets(TaxonomyBuckets::default());
        let result = committer
            .commit(
                Uuid::new_v4(),
                Uuid::new_v4(),
                Path::new("/tmp/extract-x"),
                &taxonomy,
            )
            .await
            .unwrap();

        assert_eq!(result.patients_created, 0);
        assert_eq!(result.skipped, 0);
    }
}
