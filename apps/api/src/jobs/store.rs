use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::matching::scorer::RemoteType;
use crate::models::job::JobRow;

/// Filters accepted by the job listing.
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    /// Case-insensitive substring of title or company.
    pub q: Option<String>,
    pub location: Option<String>,
    pub remote_type: Option<RemoteType>,
}

/// Fields an admin supplies when creating or replacing a posting.
#[derive(Debug, Clone)]
pub struct JobFields {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub remote_type: Option<RemoteType>,
    pub required_skills: Vec<String>,
    pub description: String,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
}

/// Escapes LIKE wildcards so user input matches literally.
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &JobFilter) {
    builder.push(" WHERE is_active = TRUE");

    if let Some(q) = filter.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        let pattern = format!("%{}%", escape_like(q));
        builder
            .push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR company ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if let Some(location) = filter
        .location
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
    {
        builder
            .push(" AND location ILIKE ")
            .push_bind(format!("%{}%", escape_like(location)));
    }

    if let Some(remote_type) = filter.remote_type {
        builder
            .push(" AND remote_type = ")
            .push_bind(remote_type.as_str());
    }
}

pub async fn count_jobs(pool: &PgPool, filter: &JobFilter) -> Result<i64, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM jobs");
    push_filters(&mut builder, filter);
    builder.build_query_scalar::<i64>().fetch_one(pool).await
}

/// Active jobs matching `filter`, newest first.
pub async fn list_jobs(
    pool: &PgPool,
    filter: &JobFilter,
    limit: i64,
    offset: i64,
) -> Result<Vec<JobRow>, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM jobs");
    push_filters(&mut builder, filter);
    builder
        .push(" ORDER BY created_at DESC, id")
        .push(" LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);
    builder.build_query_as::<JobRow>().fetch_all(pool).await
}

pub async fn get_active_job(pool: &PgPool, job_id: Uuid) -> Result<Option<JobRow>, sqlx::Error> {
    sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1 AND is_active = TRUE")
        .bind(job_id)
        .fetch_optional(pool)
        .await
}

/// Active jobs the user has no application for yet, newest first.
pub async fn list_unapplied_jobs(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
) -> Result<Vec<JobRow>, sqlx::Error> {
    sqlx::query_as::<_, JobRow>(
        r#"
        SELECT j.*
        FROM jobs j
        WHERE j.is_active = TRUE
          AND NOT EXISTS (
              SELECT 1 FROM applications a WHERE a.job_id = j.id AND a.user_id = $1
          )
        ORDER BY j.created_at DESC, j.id
        LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn insert_job(pool: &PgPool, fields: &JobFields) -> Result<JobRow, sqlx::Error> {
    sqlx::query_as::<_, JobRow>(
        r#"
        INSERT INTO jobs
            (title, company, location, remote_type, required_skills,
             description, salary_min, salary_max)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(&fields.title)
    .bind(&fields.company)
    .bind(&fields.location)
    .bind(fields.remote_type.map(|r| r.as_str()))
    .bind(&fields.required_skills)
    .bind(&fields.description)
    .bind(fields.salary_min)
    .bind(fields.salary_max)
    .fetch_one(pool)
    .await
}

pub async fn update_job(
    pool: &PgPool,
    job_id: Uuid,
    fields: &JobFields,
) -> Result<Option<JobRow>, sqlx::Error> {
    sqlx::query_as::<_, JobRow>(
        r#"
        UPDATE jobs SET
            title = $2, company = $3, location = $4, remote_type = $5,
            required_skills = $6, description = $7, salary_min = $8, salary_max = $9,
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(job_id)
    .bind(&fields.title)
    .bind(&fields.company)
    .bind(&fields.location)
    .bind(fields.remote_type.map(|r| r.as_str()))
    .bind(&fields.required_skills)
    .bind(&fields.description)
    .bind(fields.salary_min)
    .bind(fields.salary_max)
    .fetch_optional(pool)
    .await
}

/// Soft delete: applications keep pointing at the row.
pub async fn deactivate_job(pool: &PgPool, job_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE jobs SET is_active = FALSE, updated_at = NOW() WHERE id = $1 AND is_active = TRUE",
    )
    .bind(job_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}
