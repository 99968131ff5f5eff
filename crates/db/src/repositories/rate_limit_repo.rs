//! Repository for the `generation_limits` table.
//!
//! Quota mutations are single atomic statements. Application code never
//! reads a count and writes it back in two steps; two concurrent charges
//! at one remaining attempt must not both succeed.

use gitscribe_core::Identity;
use sqlx::PgPool;

/// Provides quota counter operations keyed by caller identity and the
/// server's current calendar day.
pub struct RateLimitRepo;

impl RateLimitRepo {
    /// Today's used count for an identity, zero when no row exists yet.
    pub async fn current_count(pool: &PgPool, identity: &Identity) -> Result<i32, sqlx::Error> {
        let count = match identity {
            Identity::User(user_id) => {
                sqlx::query_scalar::<_, i32>(
                    "SELECT count FROM generation_limits
                     WHERE user_id = $1 AND date = CURRENT_DATE",
                )
                .bind(user_id)
                .fetch_optional(pool)
                .await?
            }
            Identity::Ip(ip_address) => {
                sqlx::query_scalar::<_, i32>(
                    "SELECT count FROM generation_limits
                     WHERE ip_address = $1 AND date = CURRENT_DATE",
                )
                .bind(ip_address)
                .fetch_optional(pool)
                .await?
            }
        };
        Ok(count.unwrap_or(0))
    }

    /// Atomically charge one generation if today's count is below `ceiling`.
    ///
    /// Upserts today's row; the conditional `DO UPDATE .. WHERE` makes the
    /// whole check-and-increment one statement. Returns the post-charge
    /// count, or `None` when the ceiling was already reached and nothing
    /// was written.
    pub async fn check_and_increment(
        pool: &PgPool,
        identity: &Identity,
        ceiling: i32,
    ) -> Result<Option<i32>, sqlx::Error> {
        match identity {
            Identity::User(user_id) => {
                sqlx::query_scalar::<_, i32>(
                    "INSERT INTO generation_limits (user_id, count, date)
                     VALUES ($1, 1, CURRENT_DATE)
                     ON CONFLICT (user_id, date) WHERE user_id IS NOT NULL
                     DO UPDATE SET count = generation_limits.count + 1
                     WHERE generation_limits.count < $2
                     RETURNING count",
                )
                .bind(user_id)
                .bind(ceiling)
                .fetch_optional(pool)
                .await
            }
            Identity::Ip(ip_address) => {
                sqlx::query_scalar::<_, i32>(
                    "INSERT INTO generation_limits (ip_address, count, date)
                     VALUES ($1, 1, CURRENT_DATE)
                     ON CONFLICT (ip_address, date) WHERE ip_address IS NOT NULL
                     DO UPDATE SET count = generation_limits.count + 1
                     WHERE generation_limits.count < $2
                     RETURNING count",
                )
                .bind(ip_address)
                .bind(ceiling)
                .fetch_optional(pool)
                .await
            }
        }
    }

    /// Increment today's counter without a ceiling guard.
    ///
    /// Callers must verify remaining quota separately and refund on
    /// failure. Returns the post-increment count.
    pub async fn increment(pool: &PgPool, identity: &Identity) -> Result<i32, sqlx::Error> {
        match identity {
            Identity::User(user_id) => {
                sqlx::query_scalar::<_, i32>(
                    "INSERT INTO generation_limits (user_id, count, date)
                     VALUES ($1, 1, CURRENT_DATE)
                     ON CONFLICT (user_id, date) WHERE user_id IS NOT NULL
                     DO UPDATE SET count = generation_limits.count + 1
                     RETURNING count",
                )
                .bind(user_id)
                .fetch_one(pool)
                .await
            }
            Identity::Ip(ip_address) => {
                sqlx::query_scalar::<_, i32>(
                    "INSERT INTO generation_limits (ip_address, count, date)
                     VALUES ($1, 1, CURRENT_DATE)
                     ON CONFLICT (ip_address, date) WHERE ip_address IS NOT NULL
                     DO UPDATE SET count = generation_limits.count + 1
                     RETURNING count",
                )
                .bind(ip_address)
                .fetch_one(pool)
                .await
            }
        }
    }

    /// Credit back one charged generation that failed before completing.
    ///
    /// A no-op when no row exists today or the count is already zero; a
    /// refund never creates rows or negative counts. Returns the number of
    /// rows touched (0 or 1).
    pub async fn refund(pool: &PgPool, identity: &Identity) -> Result<u64, sqlx::Error> {
        let result = match identity {
            Identity::User(user_id) => {
                sqlx::query(
                    "UPDATE generation_limits SET count = count - 1
                     WHERE user_id = $1 AND date = CURRENT_DATE AND count > 0",
                )
                .bind(user_id)
                .execute(pool)
                .await?
            }
            Identity::Ip(ip_address) => {
                sqlx::query(
                    "UPDATE generation_limits SET count = count - 1
                     WHERE ip_address = $1 AND date = CURRENT_DATE AND count > 0",
                )
                .bind(ip_address)
                .execute(pool)
                .await?
            }
        };
        Ok(result.rows_affected())
    }
}
