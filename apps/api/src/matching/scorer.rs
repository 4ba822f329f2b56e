//! Match scoring: weighted compatibility between a candidate profile and a job posting.
//!
//! Four components, evaluated in a fixed order: skills, role, location, remote preference.
//! Each contributes either nothing or up to its weight from `MatchWeights`, so the
//! total stays inside 0..=100 whenever the weights validate.
//!
//! `AppState` holds an `Arc<dyn MatchScorer>` so listing, detail and recommendation
//! endpoints all score with the same configured weights.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::matching::weights::{MatchWeights, MAX_SCORE};

/// Threshold applied when a profile does not set its own.
pub const DEFAULT_MIN_MATCH_SCORE: u32 = 50;

// ────────────────────────────────────────────────────────────────────────────
// Input data models
// ────────────────────────────────────────────────────────────────────────────

/// Work-location mode of a job or the mode a candidate prefers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteType {
    Remote,
    Onsite,
    Hybrid,
}

impl RemoteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RemoteType::Remote => "remote",
            RemoteType::Onsite => "onsite",
            RemoteType::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for RemoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RemoteType {
    type Err = String;

    /// Exact, lowercase only. Stored values are normalized on write.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "remote" => Ok(RemoteType::Remote),
            "onsite" => Ok(RemoteType::Onsite),
            "hybrid" => Ok(RemoteType::Hybrid),
            other => Err(format!(
                "unknown remote type '{other}' (expected remote, onsite or hybrid)"
            )),
        }
    }
}

/// What the candidate brings and what they are looking for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub skills: Vec<String>,
    pub desired_roles: Vec<String>,
    pub desired_locations: Vec<String>,
    pub remote_preference: Option<RemoteType>,
    pub min_match_score: u32,
}

impl Default for CandidateProfile {
    fn default() -> Self {
        Self {
            skills: vec![],
            desired_roles: vec![],
            desired_locations: vec![],
            remote_preference: None,
            min_match_score: DEFAULT_MIN_MATCH_SCORE,
        }
    }
}

/// The parts of a job posting the scorer reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    pub location: Option<String>,
    pub remote_type: Option<RemoteType>,
    pub required_skills: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

/// Points awarded per component, before rounding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchBreakdown {
    pub skills: f64,
    pub role: f64,
    pub location: f64,
    pub remote: f64,
}

impl MatchBreakdown {
    pub fn total(&self) -> f64 {
        self.skills + self.role + self.location + self.remote
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub score: u32, // 0 – 100
    /// In evaluation order: skills, role, location, remote.
    pub reasons: Vec<String>,
    pub recommended: bool,
    pub breakdown: MatchBreakdown,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Scores one profile against one job. Implementations must be pure: no I/O,
/// no clock, no randomness.
pub trait MatchScorer: Send + Sync {
    fn score(&self, profile: &CandidateProfile, job: &JobPosting) -> MatchResult;

    fn weights(&self) -> &MatchWeights;
}

/// Default scorer: the four-component weighted formula.
#[derive(Debug, Clone, Default)]
pub struct WeightedMatchScorer {
    weights: MatchWeights,
}

impl WeightedMatchScorer {
    pub fn new(weights: MatchWeights) -> Self {
        Self { weights }
    }
}

impl MatchScorer for WeightedMatchScorer {
    fn score(&self, profile: &CandidateProfile, job: &JobPosting) -> MatchResult {
        score(profile, job, &self.weights)
    }

    fn weights(&self) -> &MatchWeights {
        &self.weights
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Core scoring algorithm
// ────────────────────────────────────────────────────────────────────────────

/// Computes the match between `profile` and `job`. Total: every input, including
/// empty lists and unset optionals, yields a result.
pub fn score(profile: &CandidateProfile, job: &JobPosting, weights: &MatchWeights) -> MatchResult {
    let mut breakdown = MatchBreakdown::default();
    let mut reasons = Vec::new();

    // 1. Skills
    // Every listed requirement counts toward the denominator; blank ones never match.
    let candidate_skills = normalized(&profile.skills);
    let matched = count_skill_matches(&candidate_skills, &normalized(&job.required_skills));
    let total_required = job.required_skills.len();
    if total_required > 0 {
        breakdown.skills = weights.skills * matched as f64 / total_required as f64;
    }
    if matched > 0 {
        reasons.push(format!("{matched} skill matches"));
    }

    // 2. Role
    let title = job.title.to_lowercase();
    if normalized(&profile.desired_roles)
        .iter()
        .any(|role| title.contains(role.as_str()))
    {
        breakdown.role = weights.role;
        reasons.push("Matches desired role".to_string());
    }

    // 3. Location (skipped when the job has none)
    if let Some(location) = job
        .location
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
    {
        let location = location.to_lowercase();
        if normalized(&profile.desired_locations)
            .iter()
            .any(|wanted| location.contains(wanted.as_str()))
        {
            breakdown.location = weights.location;
            reasons.push("Preferred location".to_string());
        }
    }

    // 4. Remote preference (exact equality)
    if let (Some(wanted), Some(offered)) = (profile.remote_preference, job.remote_type) {
        if wanted == offered {
            breakdown.remote = weights.remote;
            reasons.push("Matches work preference".to_string());
        }
    }

    let score = breakdown.total().round().clamp(0.0, MAX_SCORE) as u32;

    MatchResult {
        score,
        reasons,
        recommended: score >= profile.min_match_score,
        breakdown,
    }
}

/// Lowercases and trims, dropping blank entries. An empty string is a substring of
/// everything and would otherwise match every job.
fn normalized(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
        .collect()
}

/// Number of required skills covered by at least one candidate skill, where either
/// string containing the other counts as a match.
fn count_skill_matches(candidate: &[String], required: &[String]) -> usize {
    required
        .iter()
        .filter(|req| {
            candidate
                .iter()
                .any(|have| have.contains(req.as_str()) || req.contains(have.as_str()))
        })
        .count()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
