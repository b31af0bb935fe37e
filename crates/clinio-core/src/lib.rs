//! Clinio Core Library
//!
//! This crate provides core domain models, error types, and configuration
//! that are shared across all Clinio components.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{Config, ImportServiceConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
