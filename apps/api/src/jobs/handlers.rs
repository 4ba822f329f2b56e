//! Axum route handlers for the Jobs API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::jobs::store::{count_jobs, get_active_job, list_jobs, list_unapplied_jobs, JobFilter};
use crate::matching::ranking::{rank_jobs, RankOptions, Ranked};
use crate::matching::scorer::{CandidateProfile, JobPosting, MatchResult, MatchScorer, RemoteType};
use crate::matching::weights::MatchWeights;
use crate::models::job::JobRow;
use crate::profiles::store::get_profile;
use crate::routes::pagination::{Page, PageParams, Pagination};
use crate::state::AppState;

/// Upper bound on rows scored in memory when sorting by match.
const MATCH_SCAN_LIMIT: i64 = 500;
const DEFAULT_RECOMMENDATIONS: usize = 10;
const MAX_RECOMMENDATIONS: usize = 50;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum JobSort {
    #[default]
    Recent,
    Match,
}

/// Raw listing filters. `remote_type` is parsed by hand so a bad value gets the
/// usual JSON error body instead of the extractor's plain-text rejection.
#[derive(Debug, Default, Deserialize)]
pub struct JobQuery {
    pub q: Option<String>,
    pub location: Option<String>,
    pub remote_type: Option<String>,
}

impl JobQuery {
    pub fn into_filter(self) -> Result<JobFilter, AppError> {
        let remote_type = match self.remote_type.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                raw.parse::<RemoteType>()
                    .map_err(|e| AppError::Validation(format!("remote_type: {e}")))?,
            ),
        };
        Ok(JobFilter {
            q: self.q,
            location: self.location,
            remote_type,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SortParams {
    pub sort: Option<String>,
}

impl SortParams {
    pub fn parse(&self) -> Result<JobSort, AppError> {
        match self.sort.as_deref().map(str::trim) {
            None | Some("") | Some("recent") => Ok(JobSort::Recent),
            Some("match") => Ok(JobSort::Match),
            Some(other) => Err(AppError::Validation(format!(
                "sort: unknown value '{other}' (expected recent or match)"
            ))),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JobWithMatch {
    #[serde(flatten)]
    pub job: JobRow,
    /// Present when the caller is signed in and has a profile.
    #[serde(rename = "match")]
    pub match_result: Option<MatchResult>,
}

impl From<Ranked<JobRow>> for JobWithMatch {
    fn from(ranked: Ranked<JobRow>) -> Self {
        Self {
            job: ranked.item,
            match_result: Some(ranked.match_result),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RecommendationParams {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub items: Vec<Ranked<JobRow>>,
    pub min_match_score: u32,
    pub weights: MatchWeights,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// Loads the caller's profile in scorer form, if the caller is signed in and has one.
async fn caller_profile(
    state: &AppState,
    user: Option<&AuthUser>,
) -> Result<Option<CandidateProfile>, AppError> {
    let Some(user) = user else {
        return Ok(None);
    };
    let row = get_profile(&state.db, user.id).await?;
    Ok(row.as_ref().map(CandidateProfile::from))
}

/// GET /api/v1/jobs
///
/// Active jobs, newest first by default. With `sort=match` and a caller profile,
/// the newest `MATCH_SCAN_LIMIT` matching jobs are scored and ordered best first,
/// and `total` counts only those.
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    Query(query): Query<JobQuery>,
    Query(sort): Query<SortParams>,
    Query(page_params): Query<PageParams>,
) -> Result<Json<Page<JobWithMatch>>, AppError> {
    let filter = query.into_filter()?;
    let sort = sort.parse()?;
    let pagination = Pagination::from_params(page_params)?;
    let profile = caller_profile(&state, user.as_ref()).await?;

    let page = match (sort, profile) {
        (JobSort::Match, Some(profile)) => {
            let rows = list_jobs(&state.db, &filter, MATCH_SCAN_LIMIT, 0).await?;
            match_sorted_page(&profile, rows, state.match_scorer.as_ref(), pagination)
        }
        (_, profile) => {
            let total = count_jobs(&state.db, &filter).await?;
            let rows =
                list_jobs(&state.db, &filter, pagination.limit(), pagination.offset()).await?;
            let items = rows
                .into_iter()
                .map(|job| {
                    let match_result = profile
                        .as_ref()
                        .map(|p| state.match_scorer.score(p, &JobPosting::from(&job)));
                    JobWithMatch { job, match_result }
                })
                .collect();
            Page::new(items, pagination, total)
        }
    };

    Ok(Json(page))
}

/// Ranks the scanned rows and cuts out one page. `total` is the number of rows
/// ranked, not the full filtered count, so every page it implies has items.
fn match_sorted_page(
    profile: &CandidateProfile,
    rows: Vec<JobRow>,
    scorer: &dyn MatchScorer,
    pagination: Pagination,
) -> Page<JobWithMatch> {
    let ranked = rank_jobs(
        profile,
        rows,
        scorer,
        |job| JobPosting::from(job),
        RankOptions::default(),
    );
    let total = ranked.len() as i64;
    let items = pagination
        .slice(ranked)
        .into_iter()
        .map(JobWithMatch::from)
        .collect();
    Page::new(items, pagination, total)
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobWithMatch>, AppError> {
    let job = get_active_job(&state.db, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    let match_result = caller_profile(&state, user.as_ref())
        .await?
        .map(|profile| state.match_scorer.score(&profile, &JobPosting::from(&job)));

    Ok(Json(JobWithMatch { job, match_result }))
}

/// GET /api/v1/jobs/recommendations
///
/// Jobs the caller has not applied to whose score meets their threshold, best first.
pub async fn handle_recommendations(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<RecommendationParams>,
) -> Result<Json<RecommendationsResponse>, AppError> {
    let limit = params.limit.unwrap_or(DEFAULT_RECOMMENDATIONS);
    if !(1..=MAX_RECOMMENDATIONS).contains(&limit) {
        return Err(AppError::Validation(format!(
            "limit must be between 1 and {MAX_RECOMMENDATIONS}"
        )));
    }

    let profile = get_profile(&state.db, user.id)
        .await?
        .map(|row| CandidateProfile::from(&row))
        .ok_or_else(|| {
            AppError::NotFound("Create a profile to get recommendations".to_string())
        })?;

    let rows = list_unapplied_jobs(&state.db, user.id, MATCH_SCAN_LIMIT).await?;
    let scanned = rows.len();

    let items = rank_jobs(
        &profile,
        rows,
        state.match_scorer.as_ref(),
        |job| JobPosting::from(job),
        RankOptions {
            only_recommended: true,
            limit: Some(limit),
        },
    );

    info!(
        user_id = %user.id,
        scanned,
        recommended = items.len(),
        "Computed job recommendations"
    );

    Ok(Json(RecommendationsResponse {
        items,
        min_match_score: profile.min_match_score,
        weights: *state.match_scorer.weights(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::scorer::WeightedMatchScorer;

    #[test]
    fn test_sort_defaults_to_recent() {
        assert_eq!(SortParams::default().parse().unwrap(), JobSort::Recent);
        let params = SortParams {
            sort: Some("match".to_string()),
        };
        assert_eq!(params.parse().unwrap(), JobSort::Match);
    }

    #[test]
    fn test_unknown_sort_is_validation_error() {
        let params = SortParams {
            sort: Some("salary".to_string()),
        };
        assert!(matches!(params.parse(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_job_query_parses_remote_type() {
        let query = JobQuery {
            remote_type: Some("hybrid".to_string()),
            ..JobQuery::default()
        };
        assert_eq!(query.into_filter().unwrap().remote_type, Some(RemoteType::Hybrid));

        let blank = JobQuery {
            remote_type: Some(" ".to_string()),
            ..JobQuery::default()
        };
        assert!(blank.into_filter().unwrap().remote_type.is_none());
    }

    #[test]
    fn test_job_query_rejects_unknown_remote_type() {
        let query = JobQuery {
            remote_type: Some("Remote".to_string()),
            ..JobQuery::default()
        };
        match query.into_filter() {
            Err(AppError::Validation(msg)) => assert!(msg.contains("remote_type")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    fn job_row(title: &str, skills: &[&str]) -> JobRow {
        JobRow {
            id: Uuid::new_v4(),
            title: title.to_string(),
            company: "Acme".to_string(),
            location: None,
            remote_type: None,
            required_skills: skills.iter().map(|s| s.to_string()).collect(),
            description: String::new(),
            salary_min: None,
            salary_max: None,
            is_active: true,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_match_sorted_total_counts_ranked_rows() {
        let profile = CandidateProfile {
            skills: vec!["rust".to_string()],
            ..CandidateProfile::default()
        };
        let rows = vec![
            job_row("A", &["Java"]),
            job_row("B", &["Rust"]),
            job_row("C", &["Rust", "Go"]),
        ];
        let scorer = WeightedMatchScorer::default();
        let pagination = Pagination {
            page: 2,
            per_page: 2,
        };

        let page = match_sorted_page(&profile, rows, &scorer, pagination);
        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].job.title, "A");
        assert_eq!(page.items[0].match_result.as_ref().unwrap().score, 0);
    }

    #[test]
    fn test_match_sorted_page_past_end_is_empty_and_total_agrees() {
        let profile = CandidateProfile::default();
        let rows = vec![job_row("A", &[]), job_row("B", &[])];
        let pagination = Pagination {
            page: 2,
            per_page: 20,
        };

        let page = match_sorted_page(&profile, rows, &WeightedMatchScorer::default(), pagination);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 2);
    }
}
