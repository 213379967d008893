//! Repository for the `tokens` table.

use autobazaar_core::types::DbId;
use sqlx::PgPool;

use crate::models::token::{CreateToken, Token};
use crate::with_deadline;

const COLUMNS: &str = "hash, user_id, expiry, scope";

/// Provides persistence for hashed bearer tokens.
pub struct TokenRepo;

impl TokenRepo {
    /// Store a new token hash.
    pub async fn create(pool: &PgPool, input: &CreateToken) -> Result<Token, sqlx::Error> {
        let query = format!(
            "INSERT INTO tokens (hash, user_id, expiry, scope)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        with_deadline(
            sqlx::query_as::<_, Token>(&query)
                .bind(&input.hash)
                .bind(input.user_id)
                .bind(input.expiry)
                .bind(&input.scope)
                .fetch_one(pool),
        )
        .await
    }

    /// Revoke every token of `scope` held by a user. Returns the number removed.
    pub async fn delete_all_for_user(
        pool: &PgPool,
        user_id: DbId,
        scope: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = with_deadline(
            sqlx::query("DELETE FROM tokens WHERE user_id = $1 AND scope = $2")
                .bind(user_id)
                .bind(scope)
                .execute(pool),
        )
        .await?;
        Ok(result.rows_affected())
    }
}
