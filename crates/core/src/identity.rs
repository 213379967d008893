//! Login identifiers and per-user listing entitlements.

use serde::Serialize;

use crate::validation::{is_valid_email, is_valid_phone};

/// A login identifier, told apart by pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identifier<'a> {
    Email(&'a str),
    Phone(&'a str),
}

impl<'a> Identifier<'a> {
    /// Classify raw input as an email or a phone number.
    ///
    /// Returns `None` when it is neither.
    pub fn classify(input: &'a str) -> Option<Self> {
        if is_valid_email(input) {
            Some(Identifier::Email(input))
        } else if is_valid_phone(input) {
            Some(Identifier::Phone(input))
        } else {
            None
        }
    }
}

/// A seller's quotas together with their current usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Entitlements {
    pub listing_limit: i64,
    pub listings_used: i64,
    pub featured_limit: i64,
    pub featured_used: i64,
}

impl Entitlements {
    pub fn can_create_listing(&self) -> bool {
        self.listings_used < self.listing_limit
    }

    pub fn can_feature_listing(&self) -> bool {
        self.featured_used < self.featured_limit
    }

    pub fn listings_remaining(&self) -> i64 {
        (self.listing_limit - self.listings_used).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_email_and_phone() {
        assert_eq!(
            Identifier::classify("a@b.co"),
            Some(Identifier::Email("a@b.co"))
        );
        assert_eq!(
            Identifier::classify("3001234567"),
            Some(Identifier::Phone("3001234567"))
        );
        assert_eq!(Identifier::classify("not-an-identifier"), None);
    }

    #[test]
    fn quota_is_exhausted_at_the_limit() {
        let e = Entitlements {
            listing_limit: 2,
            listings_used: 2,
            featured_limit: 1,
            featured_used: 0,
        };
        assert!(!e.can_create_listing());
        assert!(e.can_feature_listing());
        assert_eq!(e.listings_remaining(), 0);
    }
}
