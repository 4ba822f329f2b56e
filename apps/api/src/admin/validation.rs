use serde::Deserialize;

use crate::errors::AppError;
use crate::jobs::store::JobFields;
use crate::matching::scorer::RemoteType;
use crate::profiles::validation::{check_text_list, normalize_list};

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_COMPANY_LEN: usize = 200;
pub const MAX_REQUIRED_SKILLS: usize = 50;
const MAX_DESCRIPTION_LEN: usize = 20_000;

/// Body for creating or replacing a job posting.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobRequest {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub remote_type: Option<RemoteType>,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub description: String,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
}

fn trimmed_option(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub fn validate_job(req: &JobRequest) -> Result<JobFields, AppError> {
    let fields = JobFields {
        title: req.title.trim().to_string(),
        company: req.company.trim().to_string(),
        location: trimmed_option(req.location.as_deref()),
        remote_type: req.remote_type,
        required_skills: normalize_list(&req.required_skills),
        description: req.description.trim().to_string(),
        salary_min: req.salary_min,
        salary_max: req.salary_max,
    };

    let mut errors = Vec::new();

    if fields.title.is_empty() {
        errors.push("title cannot be empty".to_string());
    } else if fields.title.chars().count() > MAX_TITLE_LEN {
        errors.push(format!("title must be at most {MAX_TITLE_LEN} characters"));
    }
    if fields.company.is_empty() {
        errors.push("company cannot be empty".to_string());
    } else if fields.company.chars().count() > MAX_COMPANY_LEN {
        errors.push(format!("company must be at most {MAX_COMPANY_LEN} characters"));
    }
    if fields.description.chars().count() > MAX_DESCRIPTION_LEN {
        errors.push(format!(
            "description must be at most {MAX_DESCRIPTION_LEN} characters"
        ));
    }
    check_text_list(
        "required_skills",
        &fields.required_skills,
        MAX_REQUIRED_SKILLS,
        &mut errors,
    );

    for (name, value) in [("salary_min", fields.salary_min), ("salary_max", fields.salary_max)] {
        if value.is_some_and(|v| v < 0) {
            errors.push(format!("{name} cannot be negative"));
        }
    }
    if let (Some(min), Some(max)) = (fields.salary_min, fields.salary_max) {
        if min > max {
            errors.push(format!(
                "salary_min ({min}) cannot exceed salary_max ({max})"
            ));
        }
    }

    if errors.is_empty() {
        Ok(fields)
    } else {
        Err(AppError::Validation(errors.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> JobRequest {
        JobRequest {
            title: "  Backend Engineer ".to_string(),
            company: "Acme".to_string(),
            location: Some("  ".to_string()),
            remote_type: Some(RemoteType::Remote),
            required_skills: vec!["Rust".to_string(), " rust ".to_string(), "SQL".to_string()],
            description: "Build things".to_string(),
            salary_min: Some(100_000),
            salary_max: Some(150_000),
        }
    }

    fn validation_message(req: &JobRequest) -> String {
        match validate_job(req) {
            Err(AppError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_job_is_normalized() {
        let fields = validate_job(&request()).unwrap();
        assert_eq!(fields.title, "Backend Engineer");
        assert!(fields.location.is_none());
        assert_eq!(fields.required_skills, vec!["Rust".to_string(), "SQL".to_string()]);
    }

    #[test]
    fn test_blank_title_rejected() {
        let req = JobRequest {
            title: "   ".to_string(),
            ..request()
        };
        assert!(validation_message(&req).contains("title cannot be empty"));
    }

    #[test]
    fn test_long_title_rejected() {
        let req = JobRequest {
            title: "x".repeat(MAX_TITLE_LEN + 1),
            ..request()
        };
        assert!(validation_message(&req).contains("title must be at most 200"));
    }

    #[test]
    fn test_too_many_skills_rejected() {
        let req = JobRequest {
            required_skills: (0..51).map(|i| format!("skill {i}")).collect(),
            ..request()
        };
        assert!(validation_message(&req).contains("required_skills"));
    }

    #[test]
    fn test_inverted_salary_range_rejected() {
        let req = JobRequest {
            salary_min: Some(200_000),
            salary_max: Some(100_000),
            ..request()
        };
        assert!(validation_message(&req).contains("cannot exceed salary_max"));
    }

    #[test]
    fn test_one_sided_salary_allowed() {
        let req = JobRequest {
            salary_min: None,
            ..request()
        };
        assert!(validate_job(&req).is_ok());
    }

    #[test]
    fn test_unknown_remote_type_fails_to_parse() {
        let result = serde_json::from_str::<JobRequest>(
            r#"{"title": "Dev", "company": "Acme", "remote_type": "Remote"}"#,
        );
        assert!(result.is_err());
    }
}
