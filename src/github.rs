//! GitHub REST client and the provider seam the pipeline is written against.

use std::sync::OnceLock;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, Response};

use crate::config::GitHubConfig;
use crate::error::{Error, Result};
use crate::query;
use crate::types::{IssueSearchResponse, RepositoryCandidate, SearchPage, MAX_PER_PAGE};

pub const ACCEPT_HEADER: &str = "application/vnd.github.v3+json";

/// Page size requested when listing commits. The commit-activity estimate
/// multiplies the last page number by this.
pub const COMMITS_PAGE_SIZE: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Stars,
    Updated,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Stars => "stars",
            SortKey::Updated => "updated",
        }
    }
}

/// One `/search/repositories` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSearch {
    pub query: String,
    pub sort: SortKey,
    pub page: u32,
    pub per_page: u32,
}

impl RepoSearch {
    pub fn new(query: impl Into<String>, sort: SortKey, page: u32, per_page: u32) -> Self {
        Self {
            query: query.into(),
            sort,
            page: page.max(1),
            per_page: per_page.clamp(1, MAX_PER_PAGE),
        }
    }
}

/// Everything the discovery pipeline needs from a code host.
#[async_trait]
pub trait RepositoryProvider: Send + Sync {
    /// Non-success statuses surface as [`Error::Upstream`].
    async fn search_repositories(&self, search: &RepoSearch) -> Result<SearchPage>;

    /// Open issues in `full_name` carrying `label`.
    async fn count_issues(&self, full_name: &str, label: &str) -> Result<u64>;

    /// Approximate number of commits since `since`, see [`approximate_commit_count`].
    async fn recent_commits(&self, full_name: &str, since: DateTime<Utc>) -> Result<u64>;

    async fn repository(&self, full_name: &str) -> Result<RepositoryCandidate>;
}

/// Auxiliary searches degrade to an empty page instead of failing the request.
pub async fn search_or_empty<P>(provider: &P, search: &RepoSearch) -> SearchPage
where
    P: RepositoryProvider + ?Sized,
{
    match provider.search_repositories(search).await {
        Ok(page) => page,
        Err(e) => {
            tracing::warn!(query = %search.query, "auxiliary search failed: {e}");
            SearchPage::default()
        }
    }
}

fn last_page_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"[?&]page=(\d+)[^>]*>;\s*rel="last""#).expect("static regex is valid")
    })
}

/// Estimates a commit count from the `Link` header of a commit listing.
///
/// This is an approximation, not an exact count: the last page number is
/// multiplied by [`COMMITS_PAGE_SIZE`], so the result may overshoot by up to
/// one page. A successful response without a `last` link counts as one commit.
pub fn approximate_commit_count(link_header: Option<&str>) -> u64 {
    link_header
        .and_then(|link| last_page_pattern().captures(link))
        .and_then(|caps| caps[1].parse::<u64>().ok())
        .map_or(1, |last_page| last_page * COMMITS_PAGE_SIZE)
}

#[derive(Clone)]
pub struct GitHubClient {
    http: Client,
    config: GitHubConfig,
}

impl GitHubClient {
    pub fn new(config: GitHubConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT_HEADER));

        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()?;

        if config.token.is_none() {
            tracing::debug!("no GitHub token configured, using the anonymous rate limit");
        }

        Ok(Self { http, config })
    }

    fn get(&self, url: &str) -> RequestBuilder {
        let request = self.http.get(url);
        match &self.config.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, url: &str) -> Result<Response> {
        tracing::debug!(%url, "GET");
        let response = self.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Upstream { status });
        }
        Ok(response)
    }
}

#[async_trait]
impl RepositoryProvider for GitHubClient {
    async fn search_repositories(&self, search: &RepoSearch) -> Result<SearchPage> {
        let url = format!(
            "{}/search/repositories?q={}&sort={}&order=desc&page={}&per_page={}",
            self.config.api_base,
            urlencoding::encode(&search.query),
            search.sort.as_str(),
            search.page,
            search.per_page,
        );
        let page = self.send(&url).await?.json::<SearchPage>().await?;
        Ok(page)
    }

    async fn count_issues(&self, full_name: &str, label: &str) -> Result<u64> {
        let url = format!(
            "{}/search/issues?q={}",
            self.config.api_base,
            urlencoding::encode(&query::issue_query(full_name, label)),
        );
        let body = self.send(&url).await?.json::<IssueSearchResponse>().await?;
        Ok(body.total_count)
    }

    async fn recent_commits(&self, full_name: &str, since: DateTime<Utc>) -> Result<u64> {
        let url = format!(
            "{}/repos/{}/commits?since={}&per_page={}",
            self.config.api_base,
            full_name,
            urlencoding::encode(&since.to_rfc3339_opts(SecondsFormat::Secs, true)),
            COMMITS_PAGE_SIZE,
        );
        let response = self.send(&url).await?;
        let link = response
            .headers()
            .get(header::LINK)
            .and_then(|value| value.to_str().ok());
        Ok(approximate_commit_count(link))
    }

    async fn repository(&self, full_name: &str) -> Result<RepositoryCandidate> {
        let url = format!("{}/repos/{}", self.config.api_base, full_name);
        let repo = self.send(&url).await?.json::<RepositoryCandidate>().await?;
        Ok(repo)
    }
}
