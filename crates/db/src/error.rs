//! Classification of `sqlx` errors into store-level outcomes.

use std::io;

/// SQLSTATE codes the schema and PostgreSQL raise that callers care about.
pub mod sqlstate {
    /// Raised by the listing insert trigger when the seller is at their limit.
    pub const LISTING_LIMIT_REACHED: &str = "GP001";
    /// Raised by the listing update trigger when the featured quota is used up.
    pub const FEATURED_LIMIT_REACHED: &str = "GP002";
    pub const FOREIGN_KEY_VIOLATION: &str = "23503";
    pub const UNIQUE_VIOLATION: &str = "23505";
    pub const QUERY_CANCELED: &str = "57014";
    pub const ADMIN_SHUTDOWN: &str = "57P01";
    pub const CANNOT_CONNECT_NOW: &str = "57P03";
}

/// Unique constraint names surfaced as field-level errors.
pub mod constraint {
    pub const USERS_EMAIL: &str = "uq_users_email";
    pub const USERS_PHONE: &str = "uq_users_phone";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    NotFound,
    ListingLimitReached,
    FeaturedLimitReached,
    DuplicateEmail,
    DuplicatePhone,
    /// A listing points at a reference row that does not exist.
    InvalidReference,
    /// The call ran past its deadline (client or server side).
    Timeout,
    /// The database could not be reached.
    Unavailable,
    Other,
}

impl StoreErrorKind {
    pub fn classify(err: &sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreErrorKind::NotFound,
            sqlx::Error::PoolTimedOut => StoreErrorKind::Timeout,
            sqlx::Error::Io(io_err) if io_err.kind() == io::ErrorKind::TimedOut => {
                StoreErrorKind::Timeout
            }
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => StoreErrorKind::Unavailable,
            sqlx::Error::Database(db_err) => {
                let code = db_err.code();
                match code.as_deref() {
                    Some(sqlstate::LISTING_LIMIT_REACHED) => StoreErrorKind::ListingLimitReached,
                    Some(sqlstate::FEATURED_LIMIT_REACHED) => StoreErrorKind::FeaturedLimitReached,
                    Some(sqlstate::QUERY_CANCELED) => StoreErrorKind::Timeout,
                    Some(sqlstate::ADMIN_SHUTDOWN) | Some(sqlstate::CANNOT_CONNECT_NOW) => {
                        StoreErrorKind::Unavailable
                    }
                    Some(c) if c.starts_with("08") => StoreErrorKind::Unavailable,
                    Some(sqlstate::FOREIGN_KEY_VIOLATION) => StoreErrorKind::InvalidReference,
                    Some(sqlstate::UNIQUE_VIOLATION) => match db_err.constraint() {
                        Some(constraint::USERS_EMAIL) => StoreErrorKind::DuplicateEmail,
                        Some(constraint::USERS_PHONE) => StoreErrorKind::DuplicatePhone,
                        _ => StoreErrorKind::Other,
                    },
                    _ => StoreErrorKind::Other,
                }
            }
            _ => StoreErrorKind::Other,
        }
    }
}

/// Column named by a foreign-key violation on `listings` or `users`.
///
/// Relies on PostgreSQL's default `<table>_<column>_fkey` constraint naming.
pub fn violated_reference(err: &sqlx::Error) -> Option<String> {
    let sqlx::Error::Database(db_err) = err else {
        return None;
    };
    if db_err.code().as_deref() != Some(sqlstate::FOREIGN_KEY_VIOLATION) {
        return None;
    }
    column_from_constraint(db_err.constraint()?)
}

fn column_from_constraint(name: &str) -> Option<String> {
    let rest = name.strip_suffix("_fkey")?;
    ["listings_", "users_"]
        .iter()
        .find_map(|table| rest.strip_prefix(table))
        .map(str::to_string)
}
