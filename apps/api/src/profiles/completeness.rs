use serde::{Deserialize, Serialize};

use crate::models::profile::ProfileRow;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum FieldStatus {
    Complete,
    Partial,
    Missing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldHealth {
    pub field: String,
    pub score: f64,
    pub status: FieldStatus,
    pub recommendation: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletenessReport {
    pub overall_score: f64,
    pub fields: Vec<FieldHealth>,
    pub missing_fields: Vec<String>,
}

/// Skills needed before the skills field counts as complete.
const TARGET_SKILL_COUNT: usize = 5;

const FIELD_WEIGHTS: &[(&str, f64)] = &[
    ("skills", 0.40),
    ("desired_roles", 0.20),
    ("desired_locations", 0.15),
    ("headline", 0.15),
    ("remote_preference", 0.10),
];

pub fn compute_completeness_report(profile: &ProfileRow) -> CompletenessReport {
    let mut fields = Vec::new();
    let mut missing_fields = Vec::new();
    let mut weighted_score_sum = 0.0;

    for (field, weight) in FIELD_WEIGHTS {
        let score = field_score(profile, field);

        let status = match score {
            s if s >= 1.0 => FieldStatus::Complete,
            s if s > 0.0 => FieldStatus::Partial,
            _ => FieldStatus::Missing,
        };

        if status == FieldStatus::Missing {
            missing_fields.push(field.to_string());
        }

        weighted_score_sum += score * weight;
        fields.push(FieldHealth {
            field: field.to_string(),
            score,
            recommendation: recommendation_for(field, &status, profile),
            status,
        });
    }

    let total_weight: f64 = FIELD_WEIGHTS.iter().map(|(_, w)| w).sum();
    let overall_score = if total_weight > 0.0 {
        (weighted_score_sum / total_weight).clamp(0.0, 1.0)
    } else {
        0.0
    };

    CompletenessReport {
        overall_score,
        fields,
        missing_fields,
    }
}

fn field_score(profile: &ProfileRow, field: &str) -> f64 {
    let present = |b: bool| if b { 1.0 } else { 0.0 };
    match field {
        "skills" => (profile.skills.len() as f64 / TARGET_SKILL_COUNT as f64).min(1.0),
        "desired_roles" => present(!profile.desired_roles.is_empty()),
        "desired_locations" => present(!profile.desired_locations.is_empty()),
        "headline" => present(profile.headline.as_deref().is_some_and(|h| !h.trim().is_empty())),
        "remote_preference" => present(profile.remote_preference.is_some()),
        _ => 0.0,
    }
}

fn recommendation_for(field: &str, status: &FieldStatus, profile: &ProfileRow) -> Option<String> {
    if *status == FieldStatus::Complete {
        return None;
    }
    let text = match field {
        "skills" => format!(
            "Add at least {} skills (you have {}); skills carry half of every match score",
            TARGET_SKILL_COUNT,
            profile.skills.len()
        ),
        "desired_roles" => "Add the job titles you are targeting to get role matches".to_string(),
        "desired_locations" => "Add preferred locations (or \"Remote\") to get location matches".to_string(),
        "headline" => "Add a one-line headline summarizing your experience".to_string(),
        "remote_preference" => "Choose remote, onsite or hybrid to get work-preference matches".to_string(),
        _ => return None,
    };
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn make_profile(skills: usize, complete_rest: bool) -> ProfileRow {
        ProfileRow {
            user_id: Uuid::new_v4(),
            headline: complete_rest.then(|| "Backend engineer, 6 years".to_string()),
            skills: (0..skills).map(|i| format!("skill-{i}")).collect(),
            desired_roles: if complete_rest { vec!["Backend".to_string()] } else { vec![] },
            desired_locations: if complete_rest { vec!["Remote".to_string()] } else { vec![] },
            remote_preference: complete_rest.then(|| "remote".to_string()),
            min_match_score: 50,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_complete_profile_scores_one() {
        let report = compute_completeness_report(&make_profile(5, true));
        assert!((report.overall_score - 1.0).abs() < 1e-9);
        assert!(report.missing_fields.is_empty());
        assert!(report.fields.iter().all(|f| f.recommendation.is_none()));
    }

    #[test]
    fn test_empty_profile_scores_zero() {
        let report = compute_completeness_report(&make_profile(0, false));
        assert_eq!(report.overall_score, 0.0);
        assert_eq!(report.missing_fields.len(), FIELD_WEIGHTS.len());
    }

    #[test]
    fn test_few_skills_is_partial() {
        let report = compute_completeness_report(&make_profile(2, false));
        let skills = report.fields.iter().find(|f| f.field == "skills").unwrap();
        assert_eq!(skills.status, FieldStatus::Partial);
        assert!((skills.score - 0.4).abs() < 1e-9);
        // 0.4 * 0.40 weight
        assert!((report.overall_score - 0.16).abs() < 1e-9);
        assert!(skills.recommendation.as_deref().unwrap().contains("you have 2"));
    }
}
