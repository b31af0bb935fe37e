//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from main.rs
//! for better organization and testability.

pub mod routes;
pub mod server;
pub mod services;

use std::sync::Arc;

use anyhow::{Context, Result};
use clinio_core::Config;
use clinio_ingest::NullCommitter;

use crate::state::AppState;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    // Initialize telemetry first
    crate::telemetry::init_telemetry();

    tracing::info!("Configuration loaded and validated successfully");

    // The platform wires its real committer here once persistence lands;
    // until then commits are acknowledged without writing anything.
    let state = Arc::new(AppState::from_config(&config, Arc::new(NullCommitter)));

    services::spawn_scratch_sweeper(&config);

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
