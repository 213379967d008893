//! Domain logic for the vehicle classifieds backend.
//!
//! Everything in this crate is free of I/O so the repository layer, the HTTP
//! layer and tests can share the same rules.

pub mod catalog;
pub mod error;
pub mod hashing;
pub mod identity;
pub mod listing;
pub mod reference;
pub mod tokens;
pub mod types;
pub mod validation;
