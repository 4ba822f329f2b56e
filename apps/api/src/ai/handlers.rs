//! Axum route handlers for the AI API.
//!
//! Every route is limited to pro subscribers and shares the per-user AI rate
//! limiter. Prompts go through `state.llm`; nothing here talks to OpenAI directly.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::ai::prompts::{
    cover_letter_prompt, interview_prep_prompt, optimize_resume_prompt, COVER_LETTER_SYSTEM,
    MAX_INTERVIEW_QUESTIONS,
};
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::jobs::store::get_active_job;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::models::job::JobRow;
use crate::models::profile::ProfileRow;
use crate::models::user::SubscriptionTier;
use crate::profiles::store::get_profile;
use crate::state::AppState;
use crate::users::store::get_subscription_tier;

const MAX_RESUME_LEN: usize = 20_000;
const MAX_TONE_LEN: usize = 40;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CoverLetterRequest {
    pub job_id: Uuid,
    pub tone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CoverLetterResponse {
    pub job_id: Uuid,
    pub cover_letter: String,
}

#[derive(Debug, Deserialize)]
pub struct InterviewPrepRequest {
    pub job_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewQuestion {
    pub question: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub why_asked: Option<String>,
    #[serde(default)]
    pub suggested_approach: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewPrep {
    pub questions: Vec<InterviewQuestion>,
    #[serde(default)]
    pub focus_areas: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct OptimizeResumeRequest {
    pub job_id: Uuid,
    pub resume_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeSuggestion {
    pub section: String,
    #[serde(default)]
    pub original: Option<String>,
    pub suggestion: String,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeOptimization {
    #[serde(default)]
    pub summary: Option<String>,
    pub suggestions: Vec<ResumeSuggestion>,
    #[serde(default)]
    pub missing_keywords: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Shared guards
// ────────────────────────────────────────────────────────────────────────────

fn is_pro(tier: Option<&str>) -> bool {
    tier == Some(SubscriptionTier::Pro.as_str())
}

/// Checks the subscription tier, then spends one request from the caller's
/// quota, then loads the profile and job every AI prompt needs.
async fn prepare(
    state: &AppState,
    user: &AuthUser,
    job_id: Uuid,
) -> Result<(ProfileRow, JobRow), AppError> {
    let tier = get_subscription_tier(&state.db, user.id).await?;
    if !is_pro(tier.as_deref()) {
        return Err(AppError::Forbidden(
            "AI features require a pro subscription".to_string(),
        ));
    }

    state.ai_rate_limiter.check(user.id)?;

    let profile = get_profile(&state.db, user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Create a profile before using AI features".to_string()))?;
    let job = get_active_job(&state.db, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    Ok((profile, job))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/ai/cover-letter
pub async fn handle_cover_letter(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CoverLetterRequest>,
) -> Result<Json<CoverLetterResponse>, AppError> {
    if let Some(tone) = &request.tone {
        if tone.chars().count() > MAX_TONE_LEN {
            return Err(AppError::Validation(format!(
                "tone must be at most {MAX_TONE_LEN} characters"
            )));
        }
    }

    let (profile, job) = prepare(&state, &user, request.job_id).await?;
    let prompt = cover_letter_prompt(&profile, &job, request.tone.as_deref());

    let cover_letter = state
        .llm
        .call_text(&prompt, COVER_LETTER_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Cover letter generation failed: {e}")))?;

    info!(user_id = %user.id, job_id = %job.id, chars = cover_letter.len(), "Generated cover letter");

    Ok(Json(CoverLetterResponse {
        job_id: job.id,
        cover_letter,
    }))
}

/// POST /api/v1/ai/interview-prep
pub async fn handle_interview_prep(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<InterviewPrepRequest>,
) -> Result<Json<InterviewPrep>, AppError> {
    let (profile, job) = prepare(&state, &user, request.job_id).await?;
    let prompt = interview_prep_prompt(&profile, &job);

    let mut prep: InterviewPrep = state
        .llm
        .call_json(&prompt, JSON_ONLY_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Interview prep generation failed: {e}")))?;
    prep.questions.truncate(MAX_INTERVIEW_QUESTIONS);

    info!(user_id = %user.id, job_id = %job.id, questions = prep.questions.len(), "Generated interview prep");

    Ok(Json(prep))
}

/// POST /api/v1/ai/optimize-resume
pub async fn handle_optimize_resume(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<OptimizeResumeRequest>,
) -> Result<Json<ResumeOptimization>, AppError> {
    let resume_text = request.resume_text.trim();
    if resume_text.is_empty() {
        return Err(AppError::Validation("resume_text cannot be empty".to_string()));
    }
    if resume_text.chars().count() > MAX_RESUME_LEN {
        return Err(AppError::Validation(format!(
            "resume_text must be at most {MAX_RESUME_LEN} characters"
        )));
    }

    let (profile, job) = prepare(&state, &user, request.job_id).await?;
    let prompt = optimize_resume_prompt(&profile, &job, resume_text);

    let optimization: ResumeOptimization = state
        .llm
        .call_json(&prompt, JSON_ONLY_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Resume optimization failed: {e}")))?;

    info!(
        user_id = %user.id,
        job_id = %job.id,
        suggestions = optimization.suggestions.len(),
        "Generated resume suggestions"
    );

    Ok(Json(optimization))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_pro_tier_passes() {
        assert!(is_pro(Some("pro")));
        assert!(!is_pro(Some("free")));
        assert!(!is_pro(Some("PRO")));
        assert!(!is_pro(None));
    }

    #[test]
    fn test_interview_prep_tolerates_missing_optional_fields() {
        let prep: InterviewPrep =
            serde_json::from_str(r#"{"questions": [{"question": "Why Rust?"}]}"#).unwrap();
        assert_eq!(prep.questions.len(), 1);
        assert!(prep.questions[0].why_asked.is_none());
        assert!(prep.focus_areas.is_empty());
    }

    #[test]
    fn test_resume_optimization_requires_suggestions() {
        let result = serde_json::from_str::<ResumeOptimization>(r#"{"summary": "ok"}"#);
        assert!(result.is_err());

        let parsed: ResumeOptimization = serde_json::from_str(
            r#"{"suggestions": [{"section": "Skills", "original": null, "suggestion": "Add Kafka"}],
                "missing_keywords": ["Kafka"]}"#,
        )
        .unwrap();
        assert_eq!(parsed.suggestions[0].section, "Skills");
        assert!(parsed.suggestions[0].original.is_none());
        assert_eq!(parsed.missing_keywords, vec!["Kafka".to_string()]);
    }
}
