//! Repository for the `listings` table.
//!
//! Reads join reference names at query time; writes are single statements so
//! the entitlement triggers and the `upversion` guard see a consistent row.

use autobazaar_core::catalog::{ListingQuery, PageMetadata, PredicateValue};
use autobazaar_core::listing::ListingAttributes;
use autobazaar_core::types::DbId;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, Row};

use crate::models::listing::{
    CreatedListing, ListingDetail, ListingForUpdate, ListingPage, ListingSummary, UpdateListing,
    UpdateOutcome,
};
use crate::with_deadline;

/// Raw column list for owner edits.
const COLUMNS: &str = "id, created_at, updated_at, active, featured, \
    gp_managed, gp_certified, gp_yard, gallery, make, model, version, year, price, \
    registration, city, area, mileage, transmission, fuel_type, engine_capacity, body_type, \
    color, details, seller, upversion";

/// Catalog projection. Predicates reference the `l` and `t` aliases.
const CATALOG_SELECT: &str = "\
    SELECT l.id, l.updated_at, l.active, l.featured, \
           l.gp_managed, l.gp_certified, l.gp_yard, l.gallery, \
           COALESCE(m.name, '') AS make, \
           COALESCE(mo.name, '') AS model, \
           COALESCE(v.name, '') AS version, \
           l.year, l.price, \
           COALESCE(ci.name, '') AS city, \
           COALESCE(a.name, '') AS area, \
           COALESCE(t.name, '') AS transmission, \
           l.mileage, \
           COALESCE(f.name, '') AS fuel_type";

const CATALOG_FROM: &str = " \
    FROM listings l \
    LEFT JOIN data_makes m ON l.make = m.id \
    LEFT JOIN data_models mo ON l.model = mo.id \
    LEFT JOIN data_versions v ON l.version = v.id \
    LEFT JOIN cities ci ON l.city = ci.id \
    LEFT JOIN areas a ON l.area = a.id \
    LEFT JOIN data_transmissions t ON l.transmission = t.id \
    LEFT JOIN fuel_types f ON l.fuel_type = f.id";

/// Listing detail with names and public seller fields.
const DETAIL_SELECT: &str = "\
    SELECT l.id, l.created_at, l.updated_at, l.active, l.featured, \
           l.gp_managed, l.gp_certified, l.gp_yard, l.gallery, \
           COALESCE(m.name, '') AS make, \
           COALESCE(mo.name, '') AS model, \
           COALESCE(v.name, '') AS version, \
           l.year, l.price, \
           COALESCE(r.name, '') AS registration, \
           COALESCE(ci.name, '') AS city, \
           COALESCE(a.name, '') AS area, \
           l.mileage, \
           COALESCE(t.name, '') AS transmission, \
           COALESCE(f.name, '') AS fuel_type, \
           l.engine_capacity, \
           COALESCE(b.name, '') AS body_type, \
           COALESCE(col.name, '') AS color, \
           l.details, \
           u.id AS seller_id, u.name AS seller_name, \
           u.email AS seller_email, u.email_verified AS seller_email_verified, \
           u.phone AS seller_phone, u.phone_verified AS seller_phone_verified, \
           (d.id IS NOT NULL) AS is_dealer, d.address, d.timings, u.date_joined \
    FROM listings l \
    JOIN users u ON l.seller = u.id \
    LEFT JOIN dealers d ON d.user_id = u.id \
    LEFT JOIN data_makes m ON l.make = m.id \
    LEFT JOIN data_models mo ON l.model = mo.id \
    LEFT JOIN data_versions v ON l.version = v.id \
    LEFT JOIN registrations r ON l.registration = r.id \
    LEFT JOIN cities ci ON l.city = ci.id \
    LEFT JOIN areas a ON l.area = a.id \
    LEFT JOIN data_transmissions t ON l.transmission = t.id \
    LEFT JOIN fuel_types f ON l.fuel_type = f.id \
    LEFT JOIN data_body_types b ON l.body_type = b.id \
    LEFT JOIN data_colors col ON l.color = col.id";

/// Provides catalog reads and guarded writes for listings.
pub struct ListingRepo;

impl ListingRepo {
    /// Insert a listing owned by `seller`.
    ///
    /// Fails with SQLSTATE `GP001` when the seller is already at their
    /// listing limit.
    pub async fn create(
        pool: &PgPool,
        seller: DbId,
        input: &ListingAttributes,
    ) -> Result<CreatedListing, sqlx::Error> {
        let query = "INSERT INTO listings \
                (gallery, make, model, version, year, price, registration, city, area, \
                 mileage, transmission, fuel_type, engine_capacity, body_type, color, details, seller) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17) \
             RETURNING id, created_at, updated_at, upversion";
        with_deadline(
            sqlx::query_as::<_, CreatedListing>(query)
                .bind(Json(&input.gallery))
                .bind(input.make)
                .bind(input.model)
                .bind(input.version)
                .bind(input.year)
                .bind(input.price)
                .bind(input.registration)
                .bind(input.city)
                .bind(input.area)
                .bind(&input.mileage)
                .bind(input.transmission)
                .bind(input.fuel_type)
                .bind(input.engine_capacity)
                .bind(input.body_type)
                .bind(input.color)
                .bind(&input.details)
                .bind(seller)
                .fetch_one(pool),
        )
        .await
    }

    /// Find a listing with every reference resolved to its display name.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ListingDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE l.id = $1");
        with_deadline(
            sqlx::query_as::<_, ListingDetail>(&query)
                .bind(id)
                .fetch_optional(pool),
        )
        .await
    }

    /// Find the raw row an owner edits, including its current `upversion`.
    pub async fn find_for_update(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ListingForUpdate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM listings WHERE id = $1");
        with_deadline(
            sqlx::query_as::<_, ListingForUpdate>(&query)
                .bind(id)
                .fetch_optional(pool),
        )
        .await
    }

    /// Apply an owner's edit if `input.upversion` still matches the stored row.
    ///
    /// The compare-and-swap and the existence check run as one statement, so a
    /// miss is classified without a second round trip. Operator flags
    /// (`gp_*`) are never touched.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateListing,
    ) -> Result<UpdateOutcome, sqlx::Error> {
        let attrs = &input.attributes;
        let query = "\
            WITH upd AS ( \
                UPDATE listings SET \
                    active = $2, featured = $3, gallery = $4, \
                    make = $5, model = $6, version = $7, year = $8, price = $9, \
                    registration = $10, city = $11, area = $12, mileage = $13, \
                    transmission = $14, fuel_type = $15, engine_capacity = $16, \
                    body_type = $17, color = $18, details = $19, \
                    upversion = upversion + 1 \
                WHERE id = $1 AND upversion = $20 \
                RETURNING upversion \
            ) \
            SELECT (SELECT upversion FROM upd) AS new_version, \
                   EXISTS (SELECT 1 FROM listings WHERE id = $1) AS found";
        let (new_version, found): (Option<i32>, bool) = with_deadline(
            sqlx::query_as(query)
                .bind(id)
                .bind(input.active)
                .bind(input.featured)
                .bind(Json(&attrs.gallery))
                .bind(attrs.make)
                .bind(attrs.model)
                .bind(attrs.version)
                .bind(attrs.year)
                .bind(attrs.price)
                .bind(attrs.registration)
                .bind(attrs.city)
                .bind(attrs.area)
                .bind(&attrs.mileage)
                .bind(attrs.transmission)
                .bind(attrs.fuel_type)
                .bind(attrs.engine_capacity)
                .bind(attrs.body_type)
                .bind(attrs.color)
                .bind(&attrs.details)
                .bind(input.upversion)
                .fetch_one(pool),
        )
        .await?;

        Ok(match (new_version, found) {
            (Some(version), _) => UpdateOutcome::Updated(version),
            (None, true) => UpdateOutcome::Conflict,
            (None, false) => UpdateOutcome::NotFound,
        })
    }

    /// Run a catalog query: filters, safelisted sort with an `id` tie-breaker,
    /// and the filtered total from the same statement.
    ///
    /// The page is left-joined onto the count, so a page past the end still
    /// yields one row carrying the total with NULL listing columns.
    pub async fn list(pool: &PgPool, query: &ListingQuery) -> Result<ListingPage, sqlx::Error> {
        let mut builder = QueryBuilder::<Postgres>::new("WITH filtered AS (");
        builder.push(CATALOG_SELECT);
        builder.push(", ROW_NUMBER() OVER (ORDER BY ");
        builder.push(query.sort.column.sql());
        builder.push(" ");
        builder.push(query.sort.direction.sql());
        builder.push(", l.id DESC) AS row_pos");
        builder.push(CATALOG_FROM);

        for (i, predicate) in query.filter.predicates().into_iter().enumerate() {
            builder.push(if i == 0 { " WHERE " } else { " AND " });
            builder.push(predicate.column);
            builder.push(" ");
            builder.push(predicate.op.sql());
            builder.push(" ");
            match predicate.value {
                PredicateValue::Int(v) => builder.push_bind(v),
                PredicateValue::Bool(v) => builder.push_bind(v),
            };
        }

        builder.push("), paged AS (SELECT * FROM filtered ORDER BY row_pos LIMIT ");
        builder.push_bind(query.page.limit());
        builder.push(" OFFSET ");
        builder.push_bind(query.page.offset());
        builder.push(
            ") SELECT total.total_records, paged.* \
             FROM (SELECT COUNT(*) AS total_records FROM filtered) total \
             LEFT JOIN paged ON true \
             ORDER BY paged.row_pos",
        );

        let rows = with_deadline(builder.build().fetch_all(pool)).await?;

        let total_records: i64 = match rows.first() {
            Some(row) => row.try_get("total_records")?,
            None => 0,
        };
        let mut listings = Vec::with_capacity(rows.len());
        for row in &rows {
            let id: Option<DbId> = row.try_get("id")?;
            if id.is_some() {
                listings.push(ListingSummary::from_row(row)?);
            }
        }

        Ok(ListingPage {
            metadata: PageMetadata::calculate(total_records, query.page),
            listings,
        })
    }
}
