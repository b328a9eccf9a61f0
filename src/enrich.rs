//! Per-repository enrichment with issue-label counts and commit activity.
//!
//! All repositories are enriched concurrently and each repository's own calls
//! run concurrently too. A failure never removes a repository from the output:
//! failed counts become zero, and a repository whose issue lookups all failed
//! is emitted with neutral defaults.

use chrono::{DateTime, Utc};
use futures::future::join_all;

use crate::catalog;
use crate::error::{Error, Result};
use crate::github::RepositoryProvider;
use crate::query::{GOOD_FIRST_ISSUE_LABEL, HELP_WANTED_LABEL};
use crate::score::{self, TrendingInputs};
use crate::types::{DifficultyLevel, EnrichedRepository, RepositoryCandidate, Score};

pub const DESCRIPTION_PLACEHOLDER: &str = "No description available";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IssueCounts {
    pub good_first: u64,
    pub help_wanted: u64,
}

impl IssueCounts {
    pub fn total(&self) -> u64 {
        self.good_first + self.help_wanted
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichMode {
    /// Issue counts only, contribution score.
    Search,
    /// Issue counts plus commits since `since`, trending score.
    Trending { since: DateTime<Utc> },
}

pub async fn enrich_all<P>(
    provider: &P,
    candidates: &[RepositoryCandidate],
    mode: EnrichMode,
    now: DateTime<Utc>,
) -> Vec<EnrichedRepository>
where
    P: RepositoryProvider + ?Sized,
{
    // join_all yields results in input order regardless of completion order
    join_all(
        candidates
            .iter()
            .map(|candidate| enrich_one(provider, candidate, mode, now)),
    )
    .await
}

pub async fn enrich_one<P>(
    provider: &P,
    candidate: &RepositoryCandidate,
    mode: EnrichMode,
    now: DateTime<Utc>,
) -> EnrichedRepository
where
    P: RepositoryProvider + ?Sized,
{
    let enriched = match mode {
        EnrichMode::Search => fetch_issue_counts(provider, &candidate.full_name)
            .await
            .map(|counts| search_enrichment(candidate, counts, now)),
        EnrichMode::Trending { since } => {
            let (counts, commits) = tokio::join!(
                fetch_issue_counts(provider, &candidate.full_name),
                provider.recent_commits(&candidate.full_name, since),
            );
            let commits = commits.unwrap_or_else(|e| {
                tracing::debug!(repo = %candidate.full_name, "commit activity unavailable: {e}");
                0
            });
            counts.map(|counts| trending_enrichment(candidate, counts, commits, now))
        }
    };

    enriched.unwrap_or_else(|e| {
        let outcome = if e.is_timeout() { "timed out" } else { "failed" };
        tracing::warn!(repo = %candidate.full_name, "enrichment {outcome}, using defaults: {e}");
        fallback_enrichment(candidate, mode)
    })
}

/// Both label counts, fetched concurrently. One failed label counts as zero;
/// only when both fail is the enrichment itself considered failed.
pub async fn fetch_issue_counts<P>(provider: &P, full_name: &str) -> Result<IssueCounts>
where
    P: RepositoryProvider + ?Sized,
{
    let (good_first, help_wanted) = tokio::join!(
        provider.count_issues(full_name, GOOD_FIRST_ISSUE_LABEL),
        provider.count_issues(full_name, HELP_WANTED_LABEL),
    );

    match (good_first, help_wanted) {
        (Err(e), Err(_)) => Err(e),
        (good_first, help_wanted) => Ok(IssueCounts {
            good_first: count_or_zero(full_name, GOOD_FIRST_ISSUE_LABEL, good_first),
            help_wanted: count_or_zero(full_name, HELP_WANTED_LABEL, help_wanted),
        }),
    }
}

fn count_or_zero(full_name: &str, label: &str, count: std::result::Result<u64, Error>) -> u64 {
    count.unwrap_or_else(|e| {
        tracing::debug!(repo = %full_name, label, "issue count unavailable: {e}");
        0
    })
}

pub fn search_enrichment(
    candidate: &RepositoryCandidate,
    counts: IssueCounts,
    now: DateTime<Utc>,
) -> EnrichedRepository {
    let stars = candidate.stargazers_count;
    build(
        candidate,
        counts,
        score::search_difficulty(stars, counts.good_first, counts.help_wanted),
        Score::ContributionScore(score::contribution_score(
            stars,
            counts.good_first,
            counts.help_wanted,
            candidate.updated_at,
            now,
        )),
        None,
        score::is_new(candidate.created_at, now),
    )
}

pub fn trending_enrichment(
    candidate: &RepositoryCandidate,
    counts: IssueCounts,
    recent_commits: u64,
    now: DateTime<Utc>,
) -> EnrichedRepository {
    let inputs = TrendingInputs {
        stars: candidate.stargazers_count,
        good_first: counts.good_first,
        help_wanted: counts.help_wanted,
        recent_commits,
        created_at: candidate.created_at,
        updated_at: candidate.updated_at,
    };
    let difficulty = score::trending_difficulty(
        candidate.stargazers_count,
        candidate.forks_count,
        counts.good_first,
        counts.help_wanted,
        score::age_days(candidate.created_at, now),
    );
    build(
        candidate,
        counts,
        difficulty,
        Score::TrendingScore(score::trending_score(&inputs, now)),
        Some(recent_commits),
        score::is_new(candidate.created_at, now),
    )
}

/// Zeroed counts, zero score and an intermediate tier.
pub fn fallback_enrichment(candidate: &RepositoryCandidate, mode: EnrichMode) -> EnrichedRepository {
    let (score, recent_commits) = match mode {
        EnrichMode::Search => (Score::ContributionScore(0), None),
        EnrichMode::Trending { .. } => (Score::TrendingScore(0), Some(0)),
    };
    build(
        candidate,
        IssueCounts::default(),
        DifficultyLevel::Intermediate,
        score,
        recent_commits,
        false,
    )
}

fn build(
    candidate: &RepositoryCandidate,
    counts: IssueCounts,
    difficulty_level: DifficultyLevel,
    score: Score,
    recent_commits: Option<u64>,
    is_new: bool,
) -> EnrichedRepository {
    EnrichedRepository {
        id: candidate.id,
        name: candidate.name.clone(),
        full_name: candidate.full_name.clone(),
        description: candidate
            .description
            .clone()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| DESCRIPTION_PLACEHOLDER.to_string()),
        html_url: candidate.html_url.clone(),
        clone_url: candidate.clone_url.clone(),
        stars: candidate.stargazers_count,
        forks: candidate.forks_count,
        language: candidate.language.clone(),
        topics: candidate.topics.clone(),
        created_at: candidate.created_at,
        updated_at: candidate.updated_at,
        pushed_at: candidate.pushed_at,
        owner: candidate.owner.clone(),
        good_first_issues: counts.good_first,
        help_wanted_issues: counts.help_wanted,
        total_contribution_opportunities: counts.total(),
        difficulty_level,
        score,
        recent_commits,
        is_new,
        beginner_friendliness: catalog::beginner_friendliness(
            &candidate.topics,
            candidate.stargazers_count,
            counts.good_first,
            candidate.has_wiki,
        ),
    }
}
