use serde::Serialize;

use crate::matching::scorer::{CandidateProfile, JobPosting, MatchResult, MatchScorer};

#[derive(Debug, Clone, Copy, Default)]
pub struct RankOptions {
    /// Keep only jobs whose score meets the profile threshold.
    pub only_recommended: bool,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Ranked<T> {
    #[serde(flatten)]
    pub item: T,
    #[serde(rename = "match")]
    pub match_result: MatchResult,
}

/// Scores every item against `profile` and orders them best first.
///
/// The sort is stable, so items with equal scores keep the order they came in
/// (the job store hands them over newest first).
pub fn rank_jobs<T, F>(
    profile: &CandidateProfile,
    items: Vec<T>,
    scorer: &dyn MatchScorer,
    posting_of: F,
    options: RankOptions,
) -> Vec<Ranked<T>>
where
    F: Fn(&T) -> JobPosting,
{
    let mut ranked: Vec<Ranked<T>> = items
        .into_iter()
        .map(|item| {
            let match_result = scorer.score(profile, &posting_of(&item));
            Ranked { item, match_result }
        })
        .filter(|r| !options.only_recommended || r.match_result.recommended)
        .collect();

    ranked.sort_by(|a, b| b.match_result.score.cmp(&a.match_result.score));

    if let Some(limit) = options.limit {
        ranked.truncate(limit);
    }
    ranked
}
