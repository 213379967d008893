//! Fixtures shared by the repository integration tests.
//!
//! Reference ids used here come from the seed migration.

#![allow(dead_code)]

use autobazaar_core::catalog::{ListingFilter, ListingQuery, PageRequest, Sort};
use autobazaar_core::listing::{GalleryImage, ListingAttributes};
use autobazaar_core::types::DbId;
use autobazaar_db::models::listing::CreatedListing;
use autobazaar_db::models::user::{CreateUser, User};
use autobazaar_db::repositories::{ListingRepo, UserRepo};
use sqlx::PgPool;

pub const MAKE_TOYOTA: i32 = 1;
pub const MAKE_HONDA: i32 = 2;
pub const MODEL_COROLLA: i32 = 1;
pub const MODEL_CIVIC: i32 = 3;
pub const VERSION_GLI: i32 = 1;
pub const CITY_LAHORE: i32 = 1;
pub const CITY_KARACHI: i32 = 2;
pub const AREA_DHA: i32 = 1;
pub const TRANSMISSION_MANUAL: i32 = 1;
pub const TRANSMISSION_AUTO: i32 = 2;

pub fn new_user(n: u32) -> CreateUser {
    CreateUser {
        name: format!("Seller {n}"),
        email: format!("seller{n}@example.com"),
        phone: format!("300{n:07}"),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2g".to_string(),
        city: Some(CITY_LAHORE),
    }
}

pub async fn seed_user(pool: &PgPool, n: u32) -> User {
    UserRepo::create(pool, &new_user(n)).await.unwrap()
}

pub async fn set_limits(pool: &PgPool, user_id: DbId, listing_limit: i32, featured_limit: i32) {
    sqlx::query("UPDATE users SET listing_limit = $2, featured_limit = $3 WHERE id = $1")
        .bind(user_id)
        .bind(listing_limit)
        .bind(featured_limit)
        .execute(pool)
        .await
        .unwrap();
}

pub fn attributes() -> ListingAttributes {
    ListingAttributes {
        gallery: vec![
            GalleryImage { url: "/gallery/a.webp".into(), order: 1 },
            GalleryImage { url: "/gallery/b.webp".into(), order: 2 },
        ],
        make: MAKE_TOYOTA,
        model: MODEL_COROLLA,
        version: Some(VERSION_GLI),
        year: 2018,
        price: 3_250_000,
        registration: 1,
        city: CITY_LAHORE,
        area: Some(AREA_DHA),
        mileage: "62000".into(),
        transmission: TRANSMISSION_MANUAL,
        fuel_type: 1,
        engine_capacity: 1300,
        body_type: 1,
        color: 1,
        details: "Family used".into(),
    }
}

pub async fn seed_listing(
    pool: &PgPool,
    seller: DbId,
    attrs: &ListingAttributes,
) -> CreatedListing {
    ListingRepo::create(pool, seller, attrs).await.unwrap()
}

/// Set catalog flags directly, the way an operator tool would.
pub async fn set_flags(pool: &PgPool, id: DbId, active: bool, featured: bool, gp_managed: bool) {
    sqlx::query("UPDATE listings SET active = $2, featured = $3, gp_managed = $4 WHERE id = $1")
        .bind(id)
        .bind(active)
        .bind(featured)
        .bind(gp_managed)
        .execute(pool)
        .await
        .unwrap();
}

pub fn query(filter: ListingFilter, page: i64, page_size: i64) -> ListingQuery {
    ListingQuery {
        filter,
        sort: Sort::default(),
        page: PageRequest::new(page, page_size).unwrap(),
    }
}
