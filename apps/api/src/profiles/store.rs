use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::profile::ProfileRow;
use crate::profiles::validation::NormalizedProfile;

pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> Result<Option<ProfileRow>, sqlx::Error> {
    sqlx::query_as::<_, ProfileRow>("SELECT * FROM profiles WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Inserts or replaces the caller's profile.
pub async fn upsert_profile(
    pool: &PgPool,
    user_id: Uuid,
    profile: &NormalizedProfile,
) -> Result<ProfileRow, sqlx::Error> {
    let row = sqlx::query_as::<_, ProfileRow>(
        r#"
        INSERT INTO profiles
            (user_id, headline, skills, desired_roles, desired_locations,
             remote_preference, min_match_score, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
        ON CONFLICT (user_id) DO UPDATE SET
            headline = EXCLUDED.headline,
            skills = EXCLUDED.skills,
            desired_roles = EXCLUDED.desired_roles,
            desired_locations = EXCLUDED.desired_locations,
            remote_preference = EXCLUDED.remote_preference,
            min_match_score = EXCLUDED.min_match_score,
            updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(&profile.headline)
    .bind(&profile.skills)
    .bind(&profile.desired_roles)
    .bind(&profile.desired_locations)
    .bind(profile.remote_preference.map(|r| r.as_str()))
    .bind(profile.min_match_score as i32)
    .fetch_one(pool)
    .await?;

    info!(
        user_id = %user_id,
        skills = row.skills.len(),
        "Profile saved"
    );
    Ok(row)
}
