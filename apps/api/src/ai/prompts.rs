// Prompt templates for the AI routes.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::NO_FABRICATION_INSTRUCTION;
use crate::models::job::JobRow;
use crate::models::profile::ProfileRow;

/// System prompt for free-text cover letters.
pub const COVER_LETTER_SYSTEM: &str = "You are an experienced career coach who writes concise, \
    specific cover letters. Write in the first person as the candidate. \
    Return only the letter text, with no subject line and no placeholders.";

pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"Write a cover letter of at most 350 words for the job below.
Open with why this role at {company} fits the candidate, connect two or three of their skills to the job's requirements, and close with a short call to action.
{tone_line}
{no_fabrication}

CANDIDATE PROFILE:
{profile}

JOB POSTING:
{job}"#;

pub const INTERVIEW_PREP_PROMPT_TEMPLATE: &str = r#"Prepare the candidate below for an interview for the job below.

Return a JSON object with this EXACT schema (no extra fields):
{
  "questions": [
    {
      "question": "Walk me through a system you designed end to end.",
      "category": "technical",
      "why_asked": "The role owns backend services.",
      "suggested_approach": "Pick a project using the listed skills; cover trade-offs."
    }
  ],
  "focus_areas": ["Distributed systems fundamentals"]
}

Rules:
- Produce between 5 and {max_questions} questions.
- "category" is one of "technical", "behavioral", "role".
- Base technical questions on the job's required skills.
- Point focus_areas at required skills the candidate does not list.
{no_fabrication}

CANDIDATE PROFILE:
{profile}

JOB POSTING:
{job}"#;

pub const OPTIMIZE_RESUME_PROMPT_TEMPLATE: &str = r#"Suggest improvements to the resume below so it fits the job below.

Return a JSON object with this EXACT schema (no extra fields):
{
  "summary": "One sentence on how well the resume fits today.",
  "suggestions": [
    {
      "section": "Experience",
      "original": "Worked on APIs",
      "suggestion": "Built REST APIs in Rust serving ...",
      "reason": "Names a required skill."
    }
  ],
  "missing_keywords": ["Kubernetes"]
}

Rules:
- "original" must quote text that appears in the resume, or be null for additions.
- "missing_keywords" lists required skills absent from the resume.
{no_fabrication}

CANDIDATE PROFILE:
{profile}

JOB POSTING:
{job}

RESUME:
{resume}"#;

/// Maximum interview questions requested from the model.
pub const MAX_INTERVIEW_QUESTIONS: usize = 10;

fn list_or_none(values: &[String]) -> String {
    if values.is_empty() {
        "(none)".to_string()
    } else {
        values.join(", ")
    }
}

/// Renders the profile fields the prompts rely on as a labelled block.
pub fn render_profile(profile: &ProfileRow) -> String {
    format!(
        "Headline: {}\nSkills: {}\nDesired roles: {}\nDesired locations: {}\nWork preference: {}",
        profile.headline.as_deref().unwrap_or("(none)"),
        list_or_none(&profile.skills),
        list_or_none(&profile.desired_roles),
        list_or_none(&profile.desired_locations),
        profile.remote_preference.as_deref().unwrap_or("(none)"),
    )
}

pub fn render_job(job: &JobRow) -> String {
    format!(
        "Title: {}\nCompany: {}\nLocation: {}\nWork type: {}\nRequired skills: {}\nDescription:\n{}",
        job.title,
        job.company,
        job.location.as_deref().unwrap_or("(unspecified)"),
        job.remote_type.as_deref().unwrap_or("(unspecified)"),
        list_or_none(&job.required_skills),
        job.description.trim(),
    )
}

fn fill(template: &str, profile: &ProfileRow, job: &JobRow) -> String {
    template
        .replace("{no_fabrication}", NO_FABRICATION_INSTRUCTION)
        .replace("{profile}", &render_profile(profile))
        .replace("{job}", &render_job(job))
}

pub fn cover_letter_prompt(profile: &ProfileRow, job: &JobRow, tone: Option<&str>) -> String {
    let tone_line = match tone.map(str::trim).filter(|t| !t.is_empty()) {
        Some(t) => format!("Use a {t} tone."),
        None => "Use a professional, warm tone.".to_string(),
    };
    fill(COVER_LETTER_PROMPT_TEMPLATE, profile, job)
        .replace("{company}", &job.company)
        .replace("{tone_line}", &tone_line)
}

pub fn interview_prep_prompt(profile: &ProfileRow, job: &JobRow) -> String {
    fill(INTERVIEW_PREP_PROMPT_TEMPLATE, profile, job)
        .replace("{max_questions}", &MAX_INTERVIEW_QUESTIONS.to_string())
}

pub fn optimize_resume_prompt(profile: &ProfileRow, job: &JobRow, resume_text: &str) -> String {
    // Resume last: it may contain braces that look like placeholders.
    fill(OPTIMIZE_RESUME_PROMPT_TEMPLATE, profile, job).replace("{resume}", resume_text.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn profile() -> ProfileRow {
        ProfileRow {
            user_id: Uuid::new_v4(),
            headline: Some("Backend engineer".to_string()),
            skills: vec!["Rust".to_string(), "PostgreSQL".to_string()],
            desired_roles: vec!["Backend Engineer".to_string()],
            desired_locations: vec![],
            remote_preference: Some("remote".to_string()),
            min_match_score: 50,
            updated_at: Utc::now(),
        }
    }

    fn job() -> JobRow {
        JobRow {
            id: Uuid::new_v4(),
            title: "Senior Backend Engineer".to_string(),
            company: "Acme".to_string(),
            location: None,
            remote_type: Some("remote".to_string()),
            required_skills: vec!["Rust".to_string(), "Kafka".to_string()],
            description: "  Build the billing platform.  ".to_string(),
            salary_min: None,
            salary_max: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_render_profile_marks_empty_lists() {
        let text = render_profile(&profile());
        assert!(text.contains("Skills: Rust, PostgreSQL"));
        assert!(text.contains("Desired locations: (none)"));
    }

    #[test]
    fn test_cover_letter_prompt_fills_every_placeholder() {
        let prompt = cover_letter_prompt(&profile(), &job(), None);
        assert!(prompt.contains("this role at Acme"));
        assert!(prompt.contains("professional, warm tone"));
        assert!(prompt.contains("Required skills: Rust, Kafka"));
        assert!(prompt.contains(NO_FABRICATION_INSTRUCTION));
        for placeholder in ["{company}", "{tone_line}", "{profile}", "{job}", "{no_fabrication}"] {
            assert!(!prompt.contains(placeholder), "{placeholder} left in prompt");
        }
    }

    #[test]
    fn test_cover_letter_blank_tone_uses_default() {
        let prompt = cover_letter_prompt(&profile(), &job(), Some("  "));
        assert!(prompt.contains("professional, warm tone"));
        let prompt = cover_letter_prompt(&profile(), &job(), Some("confident"));
        assert!(prompt.contains("Use a confident tone."));
    }

    #[test]
    fn test_interview_prep_prompt_sets_question_cap() {
        let prompt = interview_prep_prompt(&profile(), &job());
        assert!(prompt.contains("between 5 and 10 questions"));
        assert!(prompt.contains("Location: (unspecified)"));
    }

    #[test]
    fn test_optimize_resume_keeps_resume_braces() {
        let prompt = optimize_resume_prompt(&profile(), &job(), "Skills: {profile} fan\n");
        assert!(prompt.ends_with("RESUME:\nSkills: {profile} fan"));
        assert!(prompt.contains("Description:\nBuild the billing platform."));
    }
}
