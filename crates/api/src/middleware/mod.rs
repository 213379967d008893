//! Request extractors and middleware.
//!
//! - [`auth::AuthUser`] -- Resolves the caller from an opaque bearer token.
//! - [`rate_limit::enforce`] -- Per-client request rate limiting.

pub mod auth;
pub mod rate_limit;
