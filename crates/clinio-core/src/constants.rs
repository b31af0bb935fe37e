//! Shared constants.

use uuid::Uuid;

/// Clinic attributed to requests authenticated with the service API key.
/// Real clinic ids come from JWT claims.
pub const DEFAULT_CLINIC_ID: Uuid = Uuid::nil();

/// User attributed to requests authenticated with the service API key.
pub const DEFAULT_USER_ID: Uuid = Uuid::nil();
