//! Axum route handlers for the Admin API. Every handler requires `AdminUser`.

use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::admin::validation::{validate_job, JobRequest};
use crate::applications::status::ApplicationStatus;
use crate::applications::store::count_applications_by_status;
use crate::auth::{AdminUser, Role};
use crate::errors::AppError;
use crate::jobs::store::{count_jobs, deactivate_job, insert_job, update_job, JobFilter};
use crate::models::job::JobRow;
use crate::models::user::UserRow;
use crate::routes::pagination::{Page, PageParams, Pagination};
use crate::state::AppState;
use crate::users::store::{count_users, list_users, set_role};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct AdminStats {
    pub users: i64,
    pub active_jobs: i64,
    pub applications: i64,
    /// Every status is present, zero when unused.
    pub applications_by_status: BTreeMap<&'static str, i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

/// Folds raw `(status, count)` rows into a map keyed by every known status.
/// Rows with an unknown status still count toward the total.
fn tally_statuses(rows: &[(String, i64)]) -> (BTreeMap<&'static str, i64>, i64) {
    let mut by_status: BTreeMap<&'static str, i64> =
        ApplicationStatus::ALL.iter().map(|s| (s.as_str(), 0)).collect();
    let mut total = 0;
    for (status, count) in rows {
        total += count;
        if let Some(known) = ApplicationStatus::ALL.iter().find(|s| s.as_str() == status) {
            *by_status.entry(known.as_str()).or_insert(0) += count;
        }
    }
    (by_status, total)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/admin/stats
pub async fn handle_stats(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<AdminStats>, AppError> {
    let users = count_users(&state.db).await?;
    let active_jobs = count_jobs(&state.db, &JobFilter::default()).await?;
    let rows = count_applications_by_status(&state.db).await?;
    let (applications_by_status, applications) = tally_statuses(&rows);

    Ok(Json(AdminStats {
        users,
        active_jobs,
        applications,
        applications_by_status,
    }))
}

/// GET /api/v1/admin/users
pub async fn handle_list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(page_params): Query<PageParams>,
) -> Result<Json<Page<UserRow>>, AppError> {
    let pagination = Pagination::from_params(page_params)?;
    let total = count_users(&state.db).await?;
    let users = list_users(&state.db, pagination.limit(), pagination.offset()).await?;
    Ok(Json(Page::new(users, pagination, total)))
}

/// PATCH /api/v1/admin/users/:id/role
pub async fn handle_update_role(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(user_id): Path<Uuid>,
    Json(request): Json<UpdateRoleRequest>,
) -> Result<Json<UserRow>, AppError> {
    if user_id == admin.id && request.role != Role::Admin {
        return Err(AppError::Validation(
            "Admins cannot remove their own admin role".to_string(),
        ));
    }

    let user = set_role(&state.db, user_id, request.role)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))?;

    info!(admin_id = %admin.id, user_id = %user_id, role = request.role.as_str(), "User role changed");
    Ok(Json(user))
}

/// POST /api/v1/admin/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(request): Json<JobRequest>,
) -> Result<(StatusCode, Json<JobRow>), AppError> {
    let fields = validate_job(&request)?;
    let job = insert_job(&state.db, &fields).await?;
    info!(admin_id = %admin.id, job_id = %job.id, title = %job.title, "Job created");
    Ok((StatusCode::CREATED, Json(job)))
}

/// PUT /api/v1/admin/jobs/:id
pub async fn handle_replace_job(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(job_id): Path<Uuid>,
    Json(request): Json<JobRequest>,
) -> Result<Json<JobRow>, AppError> {
    let fields = validate_job(&request)?;
    let job = update_job(&state.db, job_id, &fields)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;
    info!(admin_id = %admin.id, job_id = %job.id, "Job replaced");
    Ok(Json(job))
}

/// DELETE /api/v1/admin/jobs/:id
///
/// Deactivates rather than deletes so existing applications keep their job.
pub async fn handle_deactivate_job(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(job_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !deactivate_job(&state.db, job_id).await? {
        return Err(AppError::NotFound(format!("Job {job_id} not found")));
    }
    info!(admin_id = %admin.id, job_id = %job_id, "Job deactivated");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_fills_every_status() {
        let rows = vec![("applied".to_string(), 3), ("offer".to_string(), 1)];
        let (by_status, total) = tally_statuses(&rows);
        assert_eq!(total, 4);
        assert_eq!(by_status.len(), ApplicationStatus::ALL.len());
        assert_eq!(by_status["applied"], 3);
        assert_eq!(by_status["offer"], 1);
        assert_eq!(by_status["saved"], 0);
    }

    #[test]
    fn test_tally_counts_unknown_status_in_total_only() {
        let rows = vec![("archived".to_string(), 2)];
        let (by_status, total) = tally_statuses(&rows);
        assert_eq!(total, 2);
        assert!(!by_status.contains_key("archived"));
        assert!(by_status.values().all(|&c| c == 0));
    }

    #[test]
    fn test_role_request_parses_lowercase() {
        let req: UpdateRoleRequest = serde_json::from_str(r#"{"role": "admin"}"#).unwrap();
        assert_eq!(req.role, Role::Admin);
        assert!(serde_json::from_str::<UpdateRoleRequest>(r#"{"role": "owner"}"#).is_err());
    }
}
