//! Background service startup

use std::time::Duration;

use clinio_core::Config;
use clinio_ingest::sweep_stale;

/// Start the periodic scratch sweeper.
///
/// Kept extract trees and orphaned spool files are reaped once they outlive
/// the TTL, covering previews whose commit never arrived and artifacts left
/// behind by a crash. A zero sweep interval disables the task.
pub fn spawn_scratch_sweeper(config: &Config) {
    let interval_secs = config.scratch_sweep_interval_secs();
    if interval_secs == 0 {
        tracing::info!("Scratch sweeper disabled");
        return;
    }

    let uploads_root = config.uploads_root().to_path_buf();
    let ttl = Duration::from_secs(config.scratch_ttl_hours() * 3600);

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
        loop {
            interval.tick().await;
            let root = uploads_root.clone();
            match tokio::task::spawn_blocking(move || sweep_stale(&root, ttl)).await {
                Ok(Ok(0)) => {}
                Ok(Ok(removed)) => {
                    tracing::info!(removed, "Scratch sweeper removed stale upload artifacts");
                }
                Ok(Err(err)) => {
                    tracing::warn!(error = %err, "Scratch sweep failed");
                }
                Err(err) => {
                    tracing::warn!(error = %err, "Scratch sweeper task failed");
                }
            }
        }
    });

    tracing::info!(
        interval_secs,
        ttl_hours = config.scratch_ttl_hours(),
        "Scratch sweeper enabled"
    );
}
