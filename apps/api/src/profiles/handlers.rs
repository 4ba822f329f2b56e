use axum::{extract::State, Json};
use serde::Serialize;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::profile::ProfileRow;
use crate::profiles::completeness::{compute_completeness_report, CompletenessReport};
use crate::profiles::store::{get_profile, upsert_profile};
use crate::profiles::validation::{validate_profile, UpsertProfileRequest};
use crate::state::AppState;

#[derive(Serialize)]
pub struct ProfileResponse {
    pub profile: ProfileRow,
    pub completeness: CompletenessReport,
}

impl From<ProfileRow> for ProfileResponse {
    fn from(profile: ProfileRow) -> Self {
        let completeness = compute_completeness_report(&profile);
        Self {
            profile,
            completeness,
        }
    }
}

/// GET /api/v1/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = get_profile(&state.db, user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not created yet".to_string()))?;
    Ok(Json(profile.into()))
}

/// PUT /api/v1/profile
pub async fn handle_upsert_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<UpsertProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    let normalized = validate_profile(&req)?;
    let profile = upsert_profile(&state.db, user.id, &normalized).await?;
    Ok(Json(profile.into()))
}
