//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that accept
//! `&PgPool` as the first argument. Every call is bounded by
//! [`crate::STORE_TIMEOUT`].

pub mod dealer_repo;
pub mod listing_repo;
pub mod reference_repo;
pub mod token_repo;
pub mod user_repo;

pub use dealer_repo::DealerRepo;
pub use listing_repo::ListingRepo;
pub use reference_repo::ReferenceRepo;
pub use token_repo::TokenRepo;
pub use user_repo::UserRepo;
