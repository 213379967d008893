//! User and dealer rows and DTOs.

use autobazaar_core::identity::Entitlements;
use autobazaar_core::reference::sentinel;
use autobazaar_core::types::{DbId, RefId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub email_verified: bool,
    pub phone: String,
    pub phone_verified: bool,
    pub password_hash: String,
    pub profile_pic: Option<String>,
    pub city: Option<RefId>,
    pub date_joined: Timestamp,
    pub listing_limit: i32,
    pub featured_limit: i32,
    pub version: i32,
}

impl User {
    pub fn to_response(&self, is_dealer: bool) -> UserResponse {
        UserResponse {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            email_verified: self.email_verified,
            phone: self.phone.clone(),
            phone_verified: self.phone_verified,
            profile_pic: self.profile_pic.clone(),
            city: self.city,
            date_joined: self.date_joined,
            listing_limit: self.listing_limit,
            featured_limit: self.featured_limit,
            version: self.version,
            is_dealer,
        }
    }
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub email_verified: bool,
    pub phone: String,
    pub phone_verified: bool,
    pub profile_pic: Option<String>,
    #[serde(with = "sentinel")]
    pub city: Option<RefId>,
    pub date_joined: Timestamp,
    pub listing_limit: i32,
    pub featured_limit: i32,
    pub version: i32,
    pub is_dealer: bool,
}

/// DTO for creating a new user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub city: Option<RefId>,
}

/// Profile fields a user may change about themselves.
#[derive(Debug, Clone)]
pub struct UpdateUser {
    pub name: String,
    pub city: Option<RefId>,
}

/// Dealer extension of a user.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Dealer {
    pub id: DbId,
    pub user_id: DbId,
    pub address: String,
    pub timings: String,
    pub version: i32,
}

#[derive(Debug, Clone)]
pub struct CreateDealer {
    pub address: String,
    pub timings: String,
}

#[derive(Debug, Clone)]
pub struct UpdateDealer {
    pub address: String,
    pub timings: String,
}

/// Quota counters as stored, before conversion to [`Entitlements`].
#[derive(Debug, Clone, Copy, FromRow)]
pub struct EntitlementRow {
    pub listing_limit: i32,
    pub listings_used: i64,
    pub featured_limit: i32,
    pub featured_used: i64,
}

impl From<EntitlementRow> for Entitlements {
    fn from(row: EntitlementRow) -> Self {
        Entitlements {
            listing_limit: i64::from(row.listing_limit),
            listings_used: row.listings_used,
            featured_limit: i64::from(row.featured_limit),
            featured_used: row.featured_used,
        }
    }
}
