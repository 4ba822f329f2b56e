use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::matching::scorer::JobPosting;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub remote_type: Option<String>,
    pub required_skills: Vec<String>,
    pub description: String,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&JobRow> for JobPosting {
    fn from(row: &JobRow) -> Self {
        Self {
            title: row.title.clone(),
            location: row.location.clone(),
            remote_type: row.remote_type.as_deref().and_then(|r| r.parse().ok()),
            required_skills: row.required_skills.clone(),
        }
    }
}
