//! Repository for the `dealers` table.

use autobazaar_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::user::{CreateDealer, Dealer, UpdateDealer};
use crate::with_deadline;

const COLUMNS: &str = "id, user_id, address, timings, version";

/// Provides persistence for dealer profiles. A dealer row is always addressed
/// through its owning `user_id`.
pub struct DealerRepo;

impl DealerRepo {
    /// Find the dealer profile of a user, if they have one.
    pub async fn find_by_user(pool: &PgPool, user_id: DbId) -> Result<Option<Dealer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM dealers WHERE user_id = $1");
        with_deadline(
            sqlx::query_as::<_, Dealer>(&query)
                .bind(user_id)
                .fetch_optional(pool),
        )
        .await
    }

    pub(crate) async fn insert<'e>(
        executor: impl PgExecutor<'e>,
        user_id: DbId,
        input: &CreateDealer,
    ) -> Result<Dealer, sqlx::Error> {
        let query = format!(
            "INSERT INTO dealers (user_id, address, timings)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Dealer>(&query)
            .bind(user_id)
            .bind(&input.address)
            .bind(&input.timings)
            .fetch_one(executor)
            .await
    }

    pub(crate) async fn update_guarded<'e>(
        executor: impl PgExecutor<'e>,
        user_id: DbId,
        version: i32,
        input: &UpdateDealer,
    ) -> Result<Option<Dealer>, sqlx::Error> {
        let query = format!(
            "UPDATE dealers SET
                address = $3,
                timings = $4,
                version = version + 1
             WHERE user_id = $1 AND version = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Dealer>(&query)
            .bind(user_id)
            .bind(version)
            .bind(&input.address)
            .bind(&input.timings)
            .fetch_optional(executor)
            .await
    }
}
