//! Data models for the application
//!
//! This module contains the data structures shared across the import
//! pipeline and the HTTP surface.

mod import;

// Re-export all models for convenient imports
pub use import::*;
