//! Opaque bearer token generation and hashing.
//!
//! Only the SHA-256 digest of a token is persisted; the plaintext is handed to
//! the client once and never stored.

use rand::Rng;

use crate::hashing::sha256_hex;

/// Scope for tokens presented on authenticated API requests.
pub const SCOPE_AUTHENTICATION: &str = "authentication";

/// Length of a generated token plaintext (alphanumeric characters).
pub const TOKEN_LENGTH: usize = 32;

/// Default token lifetime in hours.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// A freshly minted token.
pub struct GeneratedToken {
    /// Returned to the client exactly once.
    pub plaintext: String,
    /// SHA-256 hex digest stored in the `tokens` table.
    pub hash: String,
}

pub fn generate_token() -> GeneratedToken {
    let plaintext: String = rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect();
    let hash = hash_token(&plaintext);
    GeneratedToken { plaintext, hash }
}

/// SHA-256 hex digest of a token plaintext.
pub fn hash_token(plaintext: &str) -> String {
    sha256_hex(plaintext.as_bytes())
}
