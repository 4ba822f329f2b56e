use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::Role;
use crate::models::user::{SubscriptionTier, UserRow};

pub async fn get_subscription_tier(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar("SELECT subscription_tier FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn count_users(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
}

pub async fn list_users(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>(
        "SELECT * FROM users ORDER BY created_at DESC, id LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn set_role(
    pool: &PgPool,
    user_id: Uuid,
    role: Role,
) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>("UPDATE users SET role = $2 WHERE id = $1 RETURNING *")
        .bind(user_id)
        .bind(role.as_str())
        .fetch_optional(pool)
        .await
}

/// Upgrades a user after checkout. Returns false when the user does not exist.
pub async fn activate_subscription(
    pool: &PgPool,
    user_id: Uuid,
    stripe_customer_id: Option<&str>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE users
         SET subscription_tier = $2,
             stripe_customer_id = COALESCE($3, stripe_customer_id)
         WHERE id = $1",
    )
    .bind(user_id)
    .bind(SubscriptionTier::Pro.as_str())
    .bind(stripe_customer_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Downgrades every user attached to a Stripe customer; returns how many changed.
pub async fn cancel_subscription(pool: &PgPool, stripe_customer_id: &str) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE users SET subscription_tier = $2 WHERE stripe_customer_id = $1",
    )
    .bind(stripe_customer_id)
    .bind(SubscriptionTier::Free.as_str())
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}
