use sqlx::PgPool;
use uuid::Uuid;

use crate::applications::status::ApplicationStatus;
use crate::models::application::ApplicationRow;

pub async fn list_applications(
    pool: &PgPool,
    user_id: Uuid,
    status: Option<ApplicationStatus>,
) -> Result<Vec<ApplicationRow>, sqlx::Error> {
    sqlx::query_as::<_, ApplicationRow>(
        r#"
        SELECT * FROM applications
        WHERE user_id = $1 AND ($2::TEXT IS NULL OR status = $2)
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .bind(status.map(|s| s.as_str()))
    .fetch_all(pool)
    .await
}

pub async fn get_application(
    pool: &PgPool,
    user_id: Uuid,
    application_id: Uuid,
) -> Result<Option<ApplicationRow>, sqlx::Error> {
    sqlx::query_as::<_, ApplicationRow>("SELECT * FROM applications WHERE id = $1 AND user_id = $2")
        .bind(application_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub struct NewApplication<'a> {
    pub user_id: Uuid,
    pub job_id: Uuid,
    pub status: ApplicationStatus,
    pub notes: Option<&'a str>,
    pub match_score: Option<i32>,
}

pub async fn insert_application(
    pool: &PgPool,
    new: NewApplication<'_>,
) -> Result<ApplicationRow, sqlx::Error> {
    sqlx::query_as::<_, ApplicationRow>(
        r#"
        INSERT INTO applications (user_id, job_id, status, notes, match_score, applied_at)
        VALUES ($1, $2, $3, $4, $5, CASE WHEN $6 THEN NOW() ELSE NULL END)
        RETURNING *
        "#,
    )
    .bind(new.user_id)
    .bind(new.job_id)
    .bind(new.status.as_str())
    .bind(new.notes)
    .bind(new.match_score)
    .bind(new.status.marks_submission())
    .fetch_one(pool)
    .await
}

/// Applies the given changes; `None` leaves a column as is. `applied_at` is set
/// once, the first time the status moves past `saved`.
pub async fn update_application(
    pool: &PgPool,
    user_id: Uuid,
    application_id: Uuid,
    status: Option<ApplicationStatus>,
    notes: Option<&str>,
) -> Result<Option<ApplicationRow>, sqlx::Error> {
    sqlx::query_as::<_, ApplicationRow>(
        r#"
        UPDATE applications SET
            status = COALESCE($3, status),
            notes = COALESCE($4, notes),
            applied_at = CASE
                WHEN applied_at IS NULL AND $5 THEN NOW()
                ELSE applied_at
            END,
            updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(application_id)
    .bind(user_id)
    .bind(status.map(|s| s.as_str()))
    .bind(notes)
    .bind(status.map(|s| s.marks_submission()).unwrap_or(false))
    .fetch_optional(pool)
    .await
}

pub async fn delete_application(
    pool: &PgPool,
    user_id: Uuid,
    application_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM applications WHERE id = $1 AND user_id = $2")
        .bind(application_id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Application counts per status across all users. Statuses with no rows are absent.
pub async fn count_applications_by_status(pool: &PgPool) -> Result<Vec<(String, i64)>, sqlx::Error> {
    sqlx::query_as::<_, (String, i64)>(
        "SELECT status, COUNT(*) FROM applications GROUP BY status ORDER BY status",
    )
    .fetch_all(pool)
    .await
}
