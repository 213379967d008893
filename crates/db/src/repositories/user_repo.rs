//! Repository for the `users` table.

use autobazaar_core::identity::Entitlements;
use autobazaar_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::user::{
    CreateDealer, CreateUser, Dealer, EntitlementRow, UpdateDealer, UpdateUser, User,
};
use crate::repositories::dealer_repo::DealerRepo;
use crate::with_deadline;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, email_verified, phone, phone_verified, password_hash, \
                       profile_pic, city, date_joined, listing_limit, featured_limit, version";

/// Provides persistence for users and their entitlements.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    ///
    /// A duplicate email or phone fails on `uq_users_email` / `uq_users_phone`.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        with_deadline(Self::insert(pool, input)).await
    }

    /// Insert a user and their dealer profile in one transaction.
    pub async fn create_with_dealer(
        pool: &PgPool,
        input: &CreateUser,
        dealer: &CreateDealer,
    ) -> Result<(User, Dealer), sqlx::Error> {
        with_deadline(async {
            let mut tx = pool.begin().await?;
            let user = Self::insert(&mut *tx, input).await?;
            let dealer = DealerRepo::insert(&mut *tx, user.id, dealer).await?;
            tx.commit().await?;
            Ok::<_, sqlx::Error>((user, dealer))
        })
        .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        with_deadline(sqlx::query_as::<_, User>(&query).bind(id).fetch_optional(pool)).await
    }

    /// Find a user by email (case-sensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        with_deadline(sqlx::query_as::<_, User>(&query).bind(email).fetch_optional(pool)).await
    }

    pub async fn find_by_phone(pool: &PgPool, phone: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE phone = $1");
        with_deadline(sqlx::query_as::<_, User>(&query).bind(phone).fetch_optional(pool)).await
    }

    /// Resolve the owner of an unexpired token with the given hash and scope.
    pub async fn find_for_token(
        pool: &PgPool,
        token_hash: &str,
        scope: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users
             WHERE id = (
                 SELECT user_id FROM tokens
                 WHERE hash = $1 AND scope = $2 AND expiry > NOW()
             )"
        );
        with_deadline(
            sqlx::query_as::<_, User>(&query)
                .bind(token_hash)
                .bind(scope)
                .fetch_optional(pool),
        )
        .await
    }

    /// Update profile fields if the stored `version` still equals `version`.
    ///
    /// Returns `None` when the row is missing or was modified concurrently.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        version: i32,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        with_deadline(Self::update_guarded(pool, id, version, input)).await
    }

    /// Update a dealer's user row and dealer row together.
    ///
    /// Both version guards must hold; if either misses nothing is written and
    /// `None` is returned.
    pub async fn update_with_dealer(
        pool: &PgPool,
        id: DbId,
        version: i32,
        input: &UpdateUser,
        dealer_version: i32,
        dealer: &UpdateDealer,
    ) -> Result<Option<(User, Dealer)>, sqlx::Error> {
        with_deadline(async {
            let mut tx = pool.begin().await?;
            let Some(user) = Self::update_guarded(&mut *tx, id, version, input).await? else {
                return Ok(None);
            };
            let Some(dealer) =
                DealerRepo::update_guarded(&mut *tx, id, dealer_version, dealer).await?
            else {
                return Ok(None);
            };
            tx.commit().await?;
            Ok::<_, sqlx::Error>(Some((user, dealer)))
        })
        .await
    }

    /// Quotas and current usage for a seller.
    pub async fn entitlements(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Entitlements>, sqlx::Error> {
        let row = with_deadline(
            sqlx::query_as::<_, EntitlementRow>(
                "SELECT u.listing_limit, u.featured_limit,
                        (SELECT COUNT(*) FROM listings l WHERE l.seller = u.id) AS listings_used,
                        (SELECT COUNT(*) FROM listings l WHERE l.seller = u.id AND l.featured)
                            AS featured_used
                 FROM users u
                 WHERE u.id = $1",
            )
            .bind(id)
            .fetch_optional(pool),
        )
        .await?;
        Ok(row.map(Entitlements::from))
    }

    async fn insert<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreateUser,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (name, email, phone, password_hash, city)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.password_hash)
            .bind(input.city)
            .fetch_one(executor)
            .await
    }

    async fn update_guarded<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        version: i32,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                name = $3,
                city = $4,
                version = version + 1
             WHERE id = $1 AND version = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(version)
            .bind(&input.name)
            .bind(input.city)
            .fetch_optional(executor)
            .await
    }
}
