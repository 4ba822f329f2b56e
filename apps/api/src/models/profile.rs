use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::matching::scorer::CandidateProfile;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfileRow {
    pub user_id: Uuid,
    pub headline: Option<String>,
    pub skills: Vec<String>,
    pub desired_roles: Vec<String>,
    pub desired_locations: Vec<String>,
    pub remote_preference: Option<String>,
    pub min_match_score: i32,
    pub updated_at: DateTime<Utc>,
}

impl From<&ProfileRow> for CandidateProfile {
    fn from(row: &ProfileRow) -> Self {
        Self {
            skills: row.skills.clone(),
            desired_roles: row.desired_roles.clone(),
            desired_locations: row.desired_locations.clone(),
            // Unknown stored values behave like "no preference".
            remote_preference: row
                .remote_preference
                .as_deref()
                .and_then(|r| r.parse().ok()),
            min_match_score: row.min_match_score.clamp(0, 100) as u32,
        }
    }
}
