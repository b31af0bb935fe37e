//! API constants
//!
//! Route constants shared by the router, handlers, and tests.

#![allow(dead_code)]

/// API base path prefix (version-independent)
pub const API_BASE: &str = "/api";

/// Current API version segment
pub const API_VERSION: &str = "v0";

/// Versioned prefix every protected route mounts under
pub const API_PREFIX: &str = "/api/v0";
