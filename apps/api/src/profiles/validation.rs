use std::collections::HashSet;

use serde::Deserialize;

use crate::errors::AppError;
use crate::matching::scorer::{RemoteType, DEFAULT_MIN_MATCH_SCORE};

pub const MAX_SKILLS: usize = 100;
pub const MAX_DESIRED_ROLES: usize = 20;
pub const MAX_DESIRED_LOCATIONS: usize = 20;
pub const MAX_ENTRY_LEN: usize = 100;
const MAX_HEADLINE_LEN: usize = 200;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpsertProfileRequest {
    pub headline: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub desired_roles: Vec<String>,
    #[serde(default)]
    pub desired_locations: Vec<String>,
    pub remote_preference: Option<RemoteType>,
    pub min_match_score: Option<u32>,
}

/// A profile request after trimming, de-duplication and validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedProfile {
    pub headline: Option<String>,
    pub skills: Vec<String>,
    pub desired_roles: Vec<String>,
    pub desired_locations: Vec<String>,
    pub remote_preference: Option<RemoteType>,
    pub min_match_score: u32,
}

/// Trims every entry, drops blanks and case-insensitive duplicates (first wins).
pub fn normalize_list(values: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .filter(|v| seen.insert(v.to_lowercase()))
        .map(str::to_string)
        .collect()
}

/// Checks list length and per-entry length, recording one message per problem.
pub fn check_text_list(field: &str, values: &[String], max_items: usize, errors: &mut Vec<String>) {
    if values.len() > max_items {
        errors.push(format!(
            "{field} may contain at most {max_items} entries (got {})",
            values.len()
        ));
    }
    if let Some(long) = values.iter().find(|v| v.chars().count() > MAX_ENTRY_LEN) {
        errors.push(format!(
            "{field} entries must be at most {MAX_ENTRY_LEN} characters ('{}…' is too long)",
            long.chars().take(20).collect::<String>()
        ));
    }
}

pub fn validate_profile(req: &UpsertProfileRequest) -> Result<NormalizedProfile, AppError> {
    let headline = req
        .headline
        .as_deref()
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(str::to_string);

    let profile = NormalizedProfile {
        headline,
        skills: normalize_list(&req.skills),
        desired_roles: normalize_list(&req.desired_roles),
        desired_locations: normalize_list(&req.desired_locations),
        remote_preference: req.remote_preference,
        min_match_score: req.min_match_score.unwrap_or(DEFAULT_MIN_MATCH_SCORE),
    };

    let mut errors = Vec::new();

    if let Some(h) = &profile.headline {
        if h.chars().count() > MAX_HEADLINE_LEN {
            errors.push(format!("headline must be at most {MAX_HEADLINE_LEN} characters"));
        }
    }
    check_text_list("skills", &profile.skills, MAX_SKILLS, &mut errors);
    check_text_list("desired_roles", &profile.desired_roles, MAX_DESIRED_ROLES, &mut errors);
    check_text_list(
        "desired_locations",
        &profile.desired_locations,
        MAX_DESIRED_LOCATIONS,
        &mut errors,
    );
    if profile.min_match_score > 100 {
        errors.push(format!(
            "min_match_score must be between 0 and 100 (got {})",
            profile.min_match_score
        ));
    }

    if errors.is_empty() {
        Ok(profile)
    } else {
        Err(AppError::Validation(errors.join("; ")))
    }
}
