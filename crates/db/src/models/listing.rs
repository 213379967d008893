//! Listing rows, projections and write DTOs.

use autobazaar_core::catalog::PageMetadata;
use autobazaar_core::listing::{GalleryImage, ListingAttributes};
use autobazaar_core::reference::sentinel;
use autobazaar_core::types::{DbId, RefId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// Catalog projection: flags, gallery and joined reference names.
///
/// Missing version or area names are empty strings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ListingSummary {
    pub id: DbId,
    pub updated_at: Timestamp,
    pub active: bool,
    pub featured: bool,
    pub gp_managed: bool,
    pub gp_certified: bool,
    pub gp_yard: bool,
    pub gallery: Json<Vec<GalleryImage>>,
    pub make: String,
    pub model: String,
    pub version: String,
    pub year: i32,
    pub price: i64,
    pub city: String,
    pub area: String,
    pub transmission: String,
    pub mileage: String,
    pub fuel_type: String,
}

/// One page of the catalog.
#[derive(Debug, Clone, Serialize)]
pub struct ListingPage {
    pub metadata: PageMetadata,
    pub listings: Vec<ListingSummary>,
}

/// Public seller fields shown on a listing detail page.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Seller {
    #[sqlx(rename = "seller_id")]
    pub id: DbId,
    #[sqlx(rename = "seller_name")]
    pub name: String,
    #[sqlx(rename = "seller_email")]
    pub email: String,
    #[sqlx(rename = "seller_email_verified")]
    pub email_verified: bool,
    #[sqlx(rename = "seller_phone")]
    pub phone: String,
    #[sqlx(rename = "seller_phone_verified")]
    pub phone_verified: bool,
    pub is_dealer: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timings: Option<String>,
    pub date_joined: Timestamp,
}

/// Listing detail with every reference resolved to its name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ListingDetail {
    pub id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub active: bool,
    pub featured: bool,
    pub gp_managed: bool,
    pub gp_certified: bool,
    pub gp_yard: bool,
    pub gallery: Json<Vec<GalleryImage>>,
    pub make: String,
    pub model: String,
    pub version: String,
    pub year: i32,
    pub price: i64,
    pub registration: String,
    pub city: String,
    pub area: String,
    pub mileage: String,
    pub transmission: String,
    pub fuel_type: String,
    pub engine_capacity: i32,
    pub body_type: String,
    pub color: String,
    pub details: String,
    #[sqlx(flatten)]
    pub seller: Seller,
}

/// Raw listing row as the owner edits it: reference ids, not names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ListingForUpdate {
    pub id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub active: bool,
    pub featured: bool,
    pub gp_managed: bool,
    pub gp_certified: bool,
    pub gp_yard: bool,
    pub gallery: Json<Vec<GalleryImage>>,
    pub make: RefId,
    pub model: RefId,
    #[serde(with = "sentinel")]
    pub version: Option<RefId>,
    pub year: i32,
    pub price: i64,
    pub registration: RefId,
    pub city: RefId,
    #[serde(with = "sentinel")]
    pub area: Option<RefId>,
    pub mileage: String,
    pub transmission: RefId,
    #[serde(rename = "fueltype")]
    pub fuel_type: RefId,
    pub engine_capacity: i32,
    pub body_type: RefId,
    pub color: RefId,
    pub details: String,
    pub seller: DbId,
    pub upversion: i32,
}

/// Identity and timestamps assigned by the store on insert.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CreatedListing {
    pub id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub upversion: i32,
}

/// DTO for an owner's edit of a listing.
///
/// `upversion` is the value the client last read; the write only applies if
/// it still matches.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateListing {
    #[serde(flatten)]
    pub attributes: ListingAttributes,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub featured: bool,
    pub upversion: i32,
}

/// Result of a version-guarded listing update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Applied; carries the new `upversion`.
    Updated(i32),
    /// The row exists but its `upversion` moved on.
    Conflict,
    NotFound,
}
