//! Domain-level constants.
//!
//! These constants define hashing and token defaults.

// =============================================================================
// Password hashing
// =============================================================================

/// Default bcrypt work factor
pub const DEFAULT_HASH_COST: u32 = 10;

/// Lowest bcrypt cost the algorithm accepts
pub const MIN_HASH_COST: u32 = 4;

/// Highest bcrypt cost the algorithm accepts
pub const MAX_HASH_COST: u32 = 31;

/// Longest password bcrypt can hash without dropping bytes.
/// Its 72-byte input includes a terminating NUL.
pub const MAX_PASSWORD_BYTES: usize = 71;

// =============================================================================
// Tokens
// =============================================================================

/// Default JWT token expiration in hours
pub const DEFAULT_JWT_EXPIRATION_HOURS: i64 = 24;

/// Minimum JWT secret length in bytes
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Seconds per hour (for token expiration calculation)
pub const SECONDS_PER_HOUR: i64 = 3600;
