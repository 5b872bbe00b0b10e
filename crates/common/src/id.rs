//! ID generation utilities.

use ulid::Ulid;
use uuid::Uuid;

/// ID generator for records and access tokens.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new record ID (lowercase ULID, 26 chars).
    ///
    /// ULIDs sort by creation time, so "newest first" can fall back to ID order.
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }

    /// Generate an opaque bearer token.
    #[must_use]
    pub fn generate_token(&self) -> String {
        // No time component: tokens must not be guessable from creation time
        Uuid::new_v4().simple().to_string()
    }
}
