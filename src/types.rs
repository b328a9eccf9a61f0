use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_PER_PAGE: u32 = 12;
pub const MAX_PER_PAGE: u32 = 100;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    pub login: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub html_url: String,
}

/// A repository as returned by the provider's search or lookup endpoints.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RepositoryCandidate {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub clone_url: String,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    pub language: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub has_wiki: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub pushed_at: Option<DateTime<Utc>>,
    pub owner: Owner,
}

/// One page of `/search/repositories`.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct SearchPage {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub items: Vec<RepositoryCandidate>,
}

#[derive(Deserialize, Debug)]
pub struct IssueSearchResponse {
    pub total_count: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl DifficultyLevel {
    /// Lenient parse: anything unrecognised (including "all") is `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "beginner" => Some(DifficultyLevel::Beginner),
            "intermediate" => Some(DifficultyLevel::Intermediate),
            "advanced" => Some(DifficultyLevel::Advanced),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyLevel::Beginner => "beginner",
            DifficultyLevel::Intermediate => "intermediate",
            DifficultyLevel::Advanced => "advanced",
        }
    }
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The heuristic score attached to an enriched repository. Serialized as a
/// single `contribution_score` or `trending_score` field.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Score {
    ContributionScore(i64),
    TrendingScore(i64),
}

impl Score {
    pub fn value(&self) -> i64 {
        match self {
            Score::ContributionScore(v) | Score::TrendingScore(v) => *v,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EnrichedRepository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub description: String,
    pub html_url: String,
    pub clone_url: String,
    pub stars: u64,
    pub forks: u64,
    pub language: Option<String>,
    pub topics: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub pushed_at: Option<DateTime<Utc>>,
    pub owner: Owner,
    pub good_first_issues: u64,
    pub help_wanted_issues: u64,
    pub total_contribution_opportunities: u64,
    pub difficulty_level: DifficultyLevel,
    #[serde(flatten)]
    pub score: Score,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recent_commits: Option<u64>,
    pub is_new: bool,
    pub beginner_friendliness: u8,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DifficultyBreakdown {
    pub beginner: usize,
    pub intermediate: usize,
    pub advanced: usize,
}

/// Trending time window.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Since {
    Daily,
    #[default]
    Weekly,
    Monthly,
}

impl Since {
    /// Unknown or empty values fall back to weekly.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" => Since::Daily,
            "monthly" => Since::Monthly,
            _ => Since::Weekly,
        }
    }

    pub fn days(&self) -> i64 {
        match self {
            Since::Daily => 1,
            Since::Weekly => 7,
            Since::Monthly => 30,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Since::Daily => "daily",
            Since::Weekly => "weekly",
            Since::Monthly => "monthly",
        }
    }

    pub fn date_filter(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(self.days())
    }
}

/// How the trending endpoint assembles its candidate pool.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Three tier-specific searches, ranked and rebalanced across difficulty tiers.
    #[default]
    Balanced,
    /// One recency search with a popularity fallback, ranked only.
    Classic,
}

impl Strategy {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "classic" => Strategy::Classic,
            _ => Strategy::Balanced,
        }
    }
}

/// Normalised paging: page is at least 1, per_page is 1..=100 with 0 meaning the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Pagination {
    pub fn new(page: u32, per_page: u32) -> Self {
        let per_page = if per_page == 0 { DEFAULT_PER_PAGE } else { per_page };
        Self {
            page: page.max(1),
            per_page: per_page.min(MAX_PER_PAGE),
        }
    }

    pub fn has_more(&self, total_count: u64) -> bool {
        total_count > u64::from(self.page) * u64::from(self.per_page)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, DEFAULT_PER_PAGE)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub text: String,
    pub language: Option<String>,
    pub level: Option<DifficultyLevel>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Default)]
pub struct TrendingQuery {
    pub language: Option<String>,
    pub since: Since,
    pub strategy: Strategy,
    pub pagination: Pagination,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SearchResponse {
    pub repositories: Vec<EnrichedRepository>,
    pub total_count: u64,
    pub page: u32,
    pub per_page: u32,
    pub has_more: bool,
    pub search_query: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TrendingResponse {
    pub repositories: Vec<EnrichedRepository>,
    pub total_count: u64,
    pub page: u32,
    pub per_page: u32,
    pub has_more: bool,
    pub since: Since,
    pub language: String,
    pub date_filter: String,
    pub strategy: Strategy,
    pub difficulty_breakdown: DifficultyBreakdown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_clamps_and_defaults() {
        assert_eq!(Pagination::new(0, 0), Pagination { page: 1, per_page: 12 });
        assert_eq!(Pagination::new(3, 500), Pagination { page: 3, per_page: 100 });
    }

    #[test]
    fn has_more_compares_against_consumed_items() {
        let p = Pagination::new(1, 12);
        assert!(p.has_more(13));
        assert!(!p.has_more(12));
    }

    #[test]
    fn since_falls_back_to_weekly() {
        assert_eq!(Since::parse("daily"), Since::Daily);
        assert_eq!(Since::parse("yearly"), Since::Weekly);
        assert_eq!(Since::parse(""), Since::Weekly);
    }

    #[test]
    fn difficulty_parse_ignores_all() {
        assert_eq!(DifficultyLevel::parse("Beginner"), Some(DifficultyLevel::Beginner));
        assert_eq!(DifficultyLevel::parse("all"), None);
    }

    #[test]
    fn score_serializes_as_named_field() {
        let json = serde_json::to_value(Score::TrendingScore(42)).unwrap();
        assert_eq!(json, serde_json::json!({ "trending_score": 42 }));
    }

    #[test]
    fn candidate_deserializes_search_item() {
        let item = serde_json::json!({
            "id": 7,
            "name": "demo",
            "full_name": "acme/demo",
            "description": null,
            "html_url": "https://github.com/acme/demo",
            "stargazers_count": 12,
            "forks_count": 3,
            "language": "Rust",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-02-01T00:00:00Z",
            "pushed_at": null,
            "owner": { "login": "acme", "avatar_url": "a", "html_url": "h" }
        });
        let repo: RepositoryCandidate = serde_json::from_value(item).unwrap();
        assert_eq!(repo.full_name, "acme/demo");
        assert!(repo.topics.is_empty());
        assert!(repo.pushed_at.is_none());
    }
}
