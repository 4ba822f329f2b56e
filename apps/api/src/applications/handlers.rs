use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::applications::status::ApplicationStatus;
use crate::applications::store::{
    delete_application, get_application, insert_application, list_applications,
    update_application, NewApplication,
};
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::jobs::store::get_active_job;
use crate::matching::scorer::{CandidateProfile, JobPosting};
use crate::models::application::ApplicationRow;
use crate::profiles::store::get_profile;
use crate::state::AppState;

const MAX_NOTES_LEN: usize = 5000;

/// `status` is parsed by hand so a bad value gets the usual JSON error body.
#[derive(Debug, Default, Deserialize)]
pub struct StatusQuery {
    pub status: Option<String>,
}

impl StatusQuery {
    pub fn parse(&self) -> Result<Option<ApplicationStatus>, AppError> {
        match self.status.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw
                .parse::<ApplicationStatus>()
                .map(Some)
                .map_err(|e| AppError::Validation(format!("status: {e}"))),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateApplicationRequest {
    pub job_id: Uuid,
    pub status: Option<ApplicationStatus>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateApplicationRequest {
    pub status: Option<ApplicationStatus>,
    pub notes: Option<String>,
}

fn check_notes(notes: Option<&str>) -> Result<(), AppError> {
    match notes {
        Some(n) if n.chars().count() > MAX_NOTES_LEN => Err(AppError::Validation(format!(
            "notes must be at most {MAX_NOTES_LEN} characters"
        ))),
        _ => Ok(()),
    }
}

/// GET /api/v1/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<StatusQuery>,
) -> Result<Json<Vec<ApplicationRow>>, AppError> {
    let applications = list_applications(&state.db, user.id, query.parse()?).await?;
    Ok(Json(applications))
}

/// POST /api/v1/applications
///
/// The match score is computed against the caller's profile at creation time and
/// stored with the application; it is left empty when there is no profile.
pub async fn handle_create_application(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreateApplicationRequest>,
) -> Result<(StatusCode, Json<ApplicationRow>), AppError> {
    check_notes(req.notes.as_deref())?;

    let job = get_active_job(&state.db, req.job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {} not found", req.job_id)))?;

    let match_score = get_profile(&state.db, user.id).await?.map(|row| {
        let result = state
            .match_scorer
            .score(&CandidateProfile::from(&row), &JobPosting::from(&job));
        result.score as i32
    });

    let status = req.status.unwrap_or(ApplicationStatus::Saved);
    let application = insert_application(
        &state.db,
        NewApplication {
            user_id: user.id,
            job_id: job.id,
            status,
            notes: req.notes.as_deref(),
            match_score,
        },
    )
    .await
    .map_err(|e| {
        if AppError::is_unique_violation(&e) {
            AppError::Conflict(format!("An application for job {} already exists", job.id))
        } else {
            AppError::Database(e)
        }
    })?;

    info!(
        user_id = %user.id,
        job_id = %job.id,
        status = %status,
        match_score = ?match_score,
        "Application created"
    );

    Ok((StatusCode::CREATED, Json(application)))
}

/// GET /api/v1/applications/:id
pub async fn handle_get_application(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApplicationRow>, AppError> {
    let application = get_application(&state.db, user.id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))?;
    Ok(Json(application))
}

/// PATCH /api/v1/applications/:id
pub async fn handle_update_application(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateApplicationRequest>,
) -> Result<Json<ApplicationRow>, AppError> {
    if req.status.is_none() && req.notes.is_none() {
        return Err(AppError::Validation(
            "Provide a status or notes to update".to_string(),
        ));
    }
    check_notes(req.notes.as_deref())?;

    let application = update_application(&state.db, user.id, id, req.status, req.notes.as_deref())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))?;

    if let Some(status) = req.status {
        info!(user_id = %user.id, application_id = %id, status = %status, "Application status changed");
    }
    Ok(Json(application))
}

/// DELETE /api/v1/applications/:id
pub async fn handle_delete_application(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !delete_application(&state.db, user.id, id).await? {
        return Err(AppError::NotFound(format!("Application {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}
