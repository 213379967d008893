//! Token row and insert DTO.

use autobazaar_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A persisted token. `hash` is the SHA-256 hex digest of the plaintext.
#[derive(Debug, Clone, FromRow)]
pub struct Token {
    pub hash: String,
    pub user_id: DbId,
    pub expiry: Timestamp,
    pub scope: String,
}

#[derive(Debug)]
pub struct CreateToken {
    pub hash: String,
    pub user_id: DbId,
    pub expiry: Timestamp,
    pub scope: String,
}
