//! HTTP-level tests for the catalog, home feed and the owner write path.

mod common;

use axum::http::StatusCode;
use common::{
    body_bytes, body_json, create_listing, get, get_auth, listing_payload, post_json_auth,
    put_json_auth, signed_in,
};
use serde_json::{json, Value};
use sqlx::PgPool;

/// Update payload built from the creation payload.
fn update_payload(upversion: i64, active: bool, featured: bool) -> Value {
    let mut body = listing_payload();
    body["price"] = json!(3_250_000);
    body["active"] = json!(active);
    body["featured"] = json!(featured);
    body["upversion"] = json!(upversion);
    body
}

// ---------------------------------------------------------------------------
// Create and read
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_then_get_by_id(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = signed_in(&app, 1).await;

    let id = create_listing(&app, &token, listing_payload()).await;

    let response = get(app, &format!("/api/v1/listings/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let listing = &body_json(response).await["data"]["listing"];
    assert_eq!(listing["id"], id);
    assert_eq!(listing["make"], "Toyota");
    assert_eq!(listing["transmission"], "Automatic");
    assert_eq!(listing["color"], "Black");
    assert_eq!(listing["gallery"][0]["url"], "/gallery/front.webp");
    assert_eq!(listing["seller"]["email"], "seller1@example.com");
    assert_eq!(listing["seller"]["is_dealer"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_requires_authentication(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = common::post_json(app, "/api/v1/listings", listing_payload()).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_validates_attributes(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = signed_in(&app, 1).await;

    let mut body = listing_payload();
    body["make"] = json!(0);
    body["year"] = json!(1800);
    let response = post_json_auth(app, "/api/v1/listings", &token, body).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["fields"]["make"], "must be provided");
    assert_eq!(json["fields"]["year"], "must be a valid year");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_reference_is_a_field_error(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = signed_in(&app, 1).await;

    let mut body = listing_payload();
    body["body_type"] = json!(999);
    let response = post_json_auth(app, "/api/v1/listings", &token, body).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["fields"]["body_type"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_listing_limit_is_enforced(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = signed_in(&app, 1).await;

    for _ in 0..5 {
        create_listing(&app, &token, listing_payload()).await;
    }
    let response = post_json_auth(app, "/api/v1/listings", &token, listing_payload()).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "ENTITLEMENT_DENIED");
    assert_eq!(json["fields"]["limit"], "You have reached your Listing Limit");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_and_malformed_ids(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app.clone(), "/api/v1/listings/987").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(app.clone(), "/api/v1/listings/0").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(app, "/api/v1/listings/abc").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_catalog_pages_and_filters(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = signed_in(&app, 1).await;

    create_listing(&app, &token, listing_payload()).await;
    create_listing(&app, &token, listing_payload()).await;
    let mut honda = listing_payload();
    honda["make"] = json!(2);
    honda["model"] = json!(3);
    honda["version"] = json!(0);
    create_listing(&app, &token, honda).await;

    let json = body_json(get(app.clone(), "/api/v1/listings?page_size=2").await).await;
    let data = &json["data"];
    assert_eq!(data["listings"].as_array().unwrap().len(), 2);
    assert_eq!(data["metadata"]["total_records"], 3);
    assert_eq!(data["metadata"]["last_page"], 2);

    let json = body_json(get(app, "/api/v1/listings?make=2&sort=-updated").await).await;
    let listings = json["data"]["listings"].as_array().unwrap();
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0]["make"], "Honda");
    assert_eq!(listings[0]["version"], "");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_catalog_rejects_bad_parameters(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app, "/api/v1/listings?page_size=500&make=0&sort=price&active=yes").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["fields"]["page_size"], "must be a maximum of 100");
    assert_eq!(json["fields"]["make"], "must be a positive integer");
    assert_eq!(json["fields"]["sort"], "invalid sort value");
    assert_eq!(json["fields"]["active"], "must be true or false");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_page_past_the_end_keeps_metadata(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = signed_in(&app, 1).await;
    for _ in 0..3 {
        create_listing(&app, &token, listing_payload()).await;
    }

    let json = body_json(get(app, "/api/v1/listings?page=5&page_size=2").await).await;
    let data = &json["data"];
    assert_eq!(data["listings"], json!([]));
    assert_eq!(data["metadata"]["current_page"], 5);
    assert_eq!(data["metadata"]["total_records"], 3);
    assert_eq!(data["metadata"]["last_page"], 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_empty_catalog_metadata(pool: PgPool) {
    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/api/v1/listings").await).await;

    assert_eq!(json["data"]["listings"], json!([]));
    assert_eq!(json["data"]["metadata"]["first_page"], 1);
    assert_eq!(json["data"]["metadata"]["last_page"], 0);
    assert_eq!(json["data"]["metadata"]["page_size"], 20);
}

// ---------------------------------------------------------------------------
// Owner edits
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_edit_form_is_owner_only(pool: PgPool) {
    let app = common::build_test_app(pool);
    let owner = signed_in(&app, 1).await;
    let other = signed_in(&app, 2).await;

    let mut body = listing_payload();
    body["area"] = json!(0);
    let id = create_listing(&app, &owner, body).await;
    let uri = format!("/api/v1/listings/{id}/edit");

    let response = get_auth(app.clone(), &uri, &other).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get_auth(app, &uri, &owner).await;
    assert_eq!(response.status(), StatusCode::OK);
    let listing = &body_json(response).await["data"]["listing"];
    assert_eq!(listing["upversion"], 1);
    assert_eq!(listing["make"], 1);
    assert_eq!(listing["version"], 1);
    assert_eq!(listing["area"], 0);
    assert_eq!(listing["fueltype"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_stale_update_is_an_edit_conflict(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = signed_in(&app, 1).await;
    let id = create_listing(&app, &token, listing_payload()).await;
    let uri = format!("/api/v1/listings/{id}");

    let response = put_json_auth(app.clone(), &uri, &token, update_payload(1, true, false)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let listing = &body_json(response).await["data"]["listing"];
    assert_eq!(listing["upversion"], 2);
    assert_eq!(listing["price"], 3_250_000);
    assert_eq!(listing["active"], true);

    let response = put_json_auth(app, &uri, &token, update_payload(1, true, false)).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "EDIT_CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_by_other_user_is_forbidden(pool: PgPool) {
    let app = common::build_test_app(pool);
    let owner = signed_in(&app, 1).await;
    let other = signed_in(&app, 2).await;
    let id = create_listing(&app, &owner, listing_payload()).await;

    let response = put_json_auth(
        app,
        &format!("/api/v1/listings/{id}"),
        &other,
        update_payload(1, true, false),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_featured_quota_is_enforced(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = signed_in(&app, 1).await;
    let first = create_listing(&app, &token, listing_payload()).await;
    let second = create_listing(&app, &token, listing_payload()).await;

    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/listings/{first}"),
        &token,
        update_payload(1, true, true),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = put_json_auth(
        app,
        &format!("/api/v1/listings/{second}"),
        &token,
        update_payload(1, true, true),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "ENTITLEMENT_DENIED");
    assert!(json["fields"]["featured"].is_string());
}

// ---------------------------------------------------------------------------
// Home feed
// ---------------------------------------------------------------------------

async fn publish(app: &axum::Router, token: &str) -> i64 {
    let id = create_listing(app, token, listing_payload()).await;
    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/listings/{id}"),
        token,
        update_payload(1, true, false),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    id
}

fn recent_ids(json: &Value) -> Vec<i64> {
    json["data"]["recent_listings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["id"].as_i64().unwrap())
        .collect()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_home_feed_is_cached(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = signed_in(&app, 1).await;
    let first = publish(&app, &token).await;

    let before = body_bytes(get(app.clone(), "/api/v1/listings/home").await).await;
    let json: Value = serde_json::from_slice(&before).unwrap();
    assert_eq!(recent_ids(&json), vec![first]);
    assert_eq!(json["data"]["featured_listings"], json!([]));
    assert_eq!(json["data"]["gp_managed_listings"], json!([]));

    // Touching the cached listing and publishing another must not show
    // through while the entry is fresh.
    publish(&app, &token).await;
    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/listings/{first}"),
        &token,
        update_payload(2, true, false),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let after = body_bytes(get(app, "/api/v1/listings/home").await).await;
    assert_eq!(before, after);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_home_feed_recomputes_after_expiry(pool: PgPool) {
    let mut config = common::test_config();
    config.home_feed_ttl_secs = 0;
    let app = common::build_test_app_with(pool, config);
    let token = signed_in(&app, 1).await;
    let first = publish(&app, &token).await;

    let json = body_json(get(app.clone(), "/api/v1/listings/home").await).await;
    assert_eq!(recent_ids(&json), vec![first]);

    let second = publish(&app, &token).await;
    let json = body_json(get(app, "/api/v1/listings/home").await).await;
    assert_eq!(recent_ids(&json), vec![second, first]);
}
