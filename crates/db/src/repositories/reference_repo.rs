//! Repository for the read-only reference tables.

use autobazaar_core::reference::ReferenceCategory;
use sqlx::PgPool;

use crate::models::reference::{
    Area, BodyType, City, Color, FuelType, Generation, Make, Model, ReferenceRows, Registration,
    Transmission, Version,
};
use crate::with_deadline;

/// Provides ordered listings of every reference category.
pub struct ReferenceRepo;

impl ReferenceRepo {
    /// Fetch all rows of one category.
    pub async fn list(
        pool: &PgPool,
        category: ReferenceCategory,
    ) -> Result<ReferenceRows, sqlx::Error> {
        let rows = match category {
            ReferenceCategory::Makes => ReferenceRows::Makes(Self::list_makes(pool).await?),
            ReferenceCategory::Models => ReferenceRows::Models(Self::list_models(pool).await?),
            ReferenceCategory::Generations => {
                ReferenceRows::Generations(Self::list_generations(pool).await?)
            }
            ReferenceCategory::Versions => {
                ReferenceRows::Versions(Self::list_versions(pool).await?)
            }
            ReferenceCategory::Colors => ReferenceRows::Colors(Self::list_colors(pool).await?),
            ReferenceCategory::Transmissions => {
                ReferenceRows::Transmissions(Self::list_transmissions(pool).await?)
            }
            ReferenceCategory::BodyTypes => {
                ReferenceRows::BodyTypes(Self::list_body_types(pool).await?)
            }
            ReferenceCategory::FuelTypes => {
                ReferenceRows::FuelTypes(Self::list_fuel_types(pool).await?)
            }
            ReferenceCategory::Cities => ReferenceRows::Cities(Self::list_cities(pool).await?),
            ReferenceCategory::Areas => ReferenceRows::Areas(Self::list_areas(pool).await?),
            ReferenceCategory::Registrations => {
                ReferenceRows::Registrations(Self::list_registrations(pool).await?)
            }
        };
        Ok(rows)
    }

    pub async fn list_makes(pool: &PgPool) -> Result<Vec<Make>, sqlx::Error> {
        with_deadline(
            sqlx::query_as::<_, Make>("SELECT id, name, name_ur FROM data_makes ORDER BY id")
                .fetch_all(pool),
        )
        .await
    }

    pub async fn list_models(pool: &PgPool) -> Result<Vec<Model>, sqlx::Error> {
        with_deadline(
            sqlx::query_as::<_, Model>(
                "SELECT id, name, name_ur, make_id FROM data_models ORDER BY id",
            )
            .fetch_all(pool),
        )
        .await
    }

    pub async fn list_generations(pool: &PgPool) -> Result<Vec<Generation>, sqlx::Error> {
        with_deadline(
            sqlx::query_as::<_, Generation>(
                "SELECT id, start_year, end_year, model_id FROM data_generations ORDER BY id",
            )
            .fetch_all(pool),
        )
        .await
    }

    /// Versions with their factory defaults; `0` where no details row exists.
    pub async fn list_versions(pool: &PgPool) -> Result<Vec<Version>, sqlx::Error> {
        with_deadline(
            sqlx::query_as::<_, Version>(
                "SELECT v.id, v.gen_id, v.model_id, v.name, v.name_ur, \
                        COALESCE(d.transmission, 0) AS transmission, \
                        COALESCE(d.fuel_type, 0) AS fuel_type, \
                        COALESCE(d.engine_capacity, 0) AS engine_capacity \
                 FROM data_versions v \
                 LEFT JOIN data_details d ON d.version_id = v.id \
                 ORDER BY v.id",
            )
            .fetch_all(pool),
        )
        .await
    }

    /// The global palette. Version-scoped colors are excluded.
    pub async fn list_colors(pool: &PgPool) -> Result<Vec<Color>, sqlx::Error> {
        with_deadline(
            sqlx::query_as::<_, Color>(
                "SELECT id, name, name_ur, hex_code FROM data_colors \
                 WHERE version_id IS NULL ORDER BY id",
            )
            .fetch_all(pool),
        )
        .await
    }

    pub async fn list_transmissions(pool: &PgPool) -> Result<Vec<Transmission>, sqlx::Error> {
        with_deadline(
            sqlx::query_as::<_, Transmission>(
                "SELECT id, name, is_auto FROM data_transmissions ORDER BY id",
            )
            .fetch_all(pool),
        )
        .await
    }

    pub async fn list_body_types(pool: &PgPool) -> Result<Vec<BodyType>, sqlx::Error> {
        with_deadline(
            sqlx::query_as::<_, BodyType>("SELECT id, name FROM data_body_types ORDER BY id")
                .fetch_all(pool),
        )
        .await
    }

    pub async fn list_fuel_types(pool: &PgPool) -> Result<Vec<FuelType>, sqlx::Error> {
        with_deadline(
            sqlx::query_as::<_, FuelType>("SELECT id, name FROM fuel_types ORDER BY id")
                .fetch_all(pool),
        )
        .await
    }

    pub async fn list_cities(pool: &PgPool) -> Result<Vec<City>, sqlx::Error> {
        with_deadline(
            sqlx::query_as::<_, City>("SELECT id, name, name_ur, popular FROM cities ORDER BY id")
                .fetch_all(pool),
        )
        .await
    }

    pub async fn list_areas(pool: &PgPool) -> Result<Vec<Area>, sqlx::Error> {
        with_deadline(
            sqlx::query_as::<_, Area>("SELECT id, name, name_ur, city FROM areas ORDER BY id")
                .fetch_all(pool),
        )
        .await
    }

    pub async fn list_registrations(pool: &PgPool) -> Result<Vec<Registration>, sqlx::Error> {
        with_deadline(
            sqlx::query_as::<_, Registration>(
                "SELECT id, name, name_ur, type FROM registrations ORDER BY id",
            )
            .fetch_all(pool),
        )
        .await
    }
}
