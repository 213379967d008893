//! Seller-editable listing attributes and their validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::reference::sentinel;
use crate::types::RefId;
use crate::validation::FieldErrors;

/// Earliest model year accepted for a listing.
pub const MIN_YEAR: i32 = 1900;

/// Latest model year accepted for a listing.
pub const MAX_YEAR: i32 = 2100;

pub const MAX_GALLERY_IMAGES: usize = 30;

/// One gallery entry. `order` is caller-supplied and stored as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryImage {
    pub url: String,
    pub order: i32,
}

/// Attributes a seller supplies when creating or editing a listing.
///
/// `version` and `area` follow the zero-means-unset convention on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ListingAttributes {
    #[serde(default)]
    pub gallery: Vec<GalleryImage>,
    #[validate(range(min = 1, message = "must be provided"))]
    pub make: RefId,
    #[validate(range(min = 1, message = "must be provided"))]
    pub model: RefId,
    #[serde(default, with = "sentinel")]
    #[validate(range(min = 1, message = "must be a positive integer"))]
    pub version: Option<RefId>,
    #[validate(range(min = 1900, max = 2100, message = "must be a valid year"))]
    pub year: i32,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub price: i64,
    #[validate(range(min = 1, message = "must be provided"))]
    pub registration: RefId,
    #[validate(range(min = 1, message = "must be provided"))]
    pub city: RefId,
    #[serde(default, with = "sentinel")]
    #[validate(range(min = 1, message = "must be a positive integer"))]
    pub area: Option<RefId>,
    #[serde(default)]
    #[validate(length(max = 100, message = "must not be more than 100 bytes long"))]
    pub mileage: String,
    #[validate(range(min = 1, message = "must be provided"))]
    pub transmission: RefId,
    #[serde(rename = "fueltype", alias = "fuel_type")]
    #[validate(range(min = 1, message = "must be provided"))]
    pub fuel_type: RefId,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub engine_capacity: i32,
    #[validate(range(min = 1, message = "must be provided"))]
    pub body_type: RefId,
    #[validate(range(min = 1, message = "must be provided"))]
    pub color: RefId,
    #[serde(default)]
    #[validate(length(max = 5000, message = "must not be more than 5000 bytes long"))]
    pub details: String,
}

impl ListingAttributes {
    /// Run field rules plus the gallery checks the derive cannot express.
    pub fn check(&self) -> Result<(), FieldErrors> {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => FieldErrors::from(e),
        };
        errors.check(
            self.gallery.len() <= MAX_GALLERY_IMAGES,
            "gallery",
            "must not contain more than 30 images",
        );
        errors.check(
            self.gallery.iter().all(|img| !img.url.trim().is_empty()),
            "gallery",
            "image url must be provided",
        );
        errors.into_result()
    }
}
