#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use reqwest::StatusCode;

use ossify::github::{RepoSearch, RepositoryProvider};
use ossify::types::{Owner, RepositoryCandidate, SearchPage};
use ossify::{Error, Result};

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

pub fn repo(id: u64, stars: u64, forks: u64, age_days: i64) -> RepositoryCandidate {
    let created = now() - chrono::Duration::days(age_days);
    RepositoryCandidate {
        id,
        name: format!("repo{id}"),
        full_name: format!("acme/repo{id}"),
        description: Some(format!("Repository number {id}")),
        html_url: format!("https://github.com/acme/repo{id}"),
        clone_url: format!("https://github.com/acme/repo{id}.git"),
        stargazers_count: stars,
        forks_count: forks,
        language: Some("Python".to_string()),
        topics: vec![],
        has_wiki: false,
        created_at: Some(created),
        updated_at: Some(now() - chrono::Duration::days(2)),
        pushed_at: Some(now() - chrono::Duration::days(1)),
        owner: Owner {
            login: "acme".to_string(),
            avatar_url: "https://avatars.example/acme".to_string(),
            html_url: "https://github.com/acme".to_string(),
        },
    }
}

pub fn page(total_count: u64, items: Vec<RepositoryCandidate>) -> SearchPage {
    SearchPage { total_count, items }
}

#[derive(Clone)]
pub enum Outcome {
    Page(SearchPage),
    Status(u16),
}

fn status_error(code: u16) -> Error {
    Error::Upstream {
        status: StatusCode::from_u16(code).unwrap(),
    }
}

/// In-memory provider. Searches are matched by the first registered needle
/// contained in the query; unmatched searches return an empty page. Issue
/// counts default to zero, a `None` entry makes that call fail.
#[derive(Default)]
pub struct FakeProvider {
    searches: Vec<(String, Outcome)>,
    issues: HashMap<(String, String), Option<u64>>,
    commits: HashMap<String, Option<u64>>,
    delays: HashMap<String, Duration>,
    repositories: HashMap<String, RepositoryCandidate>,
    pub recorded: Mutex<Vec<RepoSearch>>,
    enriched: Mutex<HashSet<String>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, needle: &str, outcome: Outcome) -> Self {
        self.searches.push((needle.to_string(), outcome));
        self
    }

    pub fn issues(mut self, full_name: &str, label: &str, count: Option<u64>) -> Self {
        self.issues
            .insert((full_name.to_string(), label.to_string()), count);
        self
    }

    pub fn commits(mut self, full_name: &str, count: Option<u64>) -> Self {
        self.commits.insert(full_name.to_string(), count);
        self
    }

    /// Delays every enrichment call for `full_name`.
    pub fn delay(mut self, full_name: &str, delay: Duration) -> Self {
        self.delays.insert(full_name.to_string(), delay);
        self
    }

    pub fn repository(mut self, candidate: RepositoryCandidate) -> Self {
        self.repositories
            .insert(candidate.full_name.clone(), candidate);
        self
    }

    pub fn recorded_searches(&self) -> Vec<RepoSearch> {
        self.recorded.lock().unwrap().clone()
    }

    /// Distinct repositories that had their issues counted.
    pub fn enriched_repositories(&self) -> usize {
        self.enriched.lock().unwrap().len()
    }

    async fn pause(&self, full_name: &str) {
        if let Some(delay) = self.delays.get(full_name) {
            tokio::time::sleep(*delay).await;
        }
    }
}

#[async_trait]
impl RepositoryProvider for FakeProvider {
    async fn search_repositories(&self, search: &RepoSearch) -> Result<SearchPage> {
        self.recorded.lock().unwrap().push(search.clone());
        let outcome = self
            .searches
            .iter()
            .find(|(needle, _)| search.query.contains(needle.as_str()))
            .map(|(_, outcome)| outcome.clone());
        match outcome {
            Some(Outcome::Page(page)) => Ok(page),
            Some(Outcome::Status(code)) => Err(status_error(code)),
            None => Ok(SearchPage::default()),
        }
    }

    async fn count_issues(&self, full_name: &str, label: &str) -> Result<u64> {
        self.enriched.lock().unwrap().insert(full_name.to_string());
        self.pause(full_name).await;
        match self.issues.get(&(full_name.to_string(), label.to_string())) {
            Some(Some(count)) => Ok(*count),
            Some(None) => Err(status_error(422)),
            None => Ok(0),
        }
    }

    async fn recent_commits(&self, full_name: &str, _since: DateTime<Utc>) -> Result<u64> {
        self.pause(full_name).await;
        match self.commits.get(full_name) {
            Some(Some(count)) => Ok(*count),
            Some(None) => Err(status_error(409)),
            None => Ok(1),
        }
    }

    async fn repository(&self, full_name: &str) -> Result<RepositoryCandidate> {
        self.repositories
            .get(full_name)
            .cloned()
            .ok_or_else(|| status_error(404))
    }
}
