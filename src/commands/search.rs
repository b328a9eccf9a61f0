use chrono::{DateTime, Utc};

use ossify::catalog;
use ossify::config::Config;
use ossify::discovery::Discovery;
use ossify::github::GitHubClient;
use ossify::score;
use ossify::types::{
    DifficultyLevel, EnrichedRepository, Pagination, SearchQuery, Since, Strategy, TrendingQuery,
};

pub fn discovery(config: &Config) -> anyhow::Result<Discovery<GitHubClient>> {
    let client = GitHubClient::new(config.github.clone())?;
    Ok(Discovery::new(client).with_shuffle_seed(config.shuffle_seed))
}

pub async fn search_repos(
    config: &Config,
    query: String,
    language: Option<String>,
    level: Option<DifficultyLevel>,
    page: u32,
    per_page: u32,
    json: bool,
) -> anyhow::Result<()> {
    let request = SearchQuery {
        text: query,
        language,
        level,
        pagination: Pagination::new(page, per_page),
    };
    let now = Utc::now();
    let response = discovery(config)?.search(&request, now).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    if response.repositories.is_empty() {
        println!("No repositories found.");
        return Ok(());
    }

    println!("\nQuery: {}", response.search_query);
    println!(
        "Found {} repositories (showing page {}):\n",
        response.total_count, response.page
    );
    for repo in &response.repositories {
        print_repo(repo, now);
    }
    if response.has_more {
        println!("More results: --page {}", response.page + 1);
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn trending_repos(
    config: &Config,
    language: Option<String>,
    since: Since,
    strategy: Strategy,
    seed: Option<u64>,
    page: u32,
    per_page: u32,
    json: bool,
) -> anyhow::Result<()> {
    let request = TrendingQuery {
        language,
        since,
        strategy,
        pagination: Pagination::new(page, per_page),
    };
    let now = Utc::now();
    let response = discovery(config)?
        .with_shuffle_seed(seed.or(config.shuffle_seed))
        .trending(&request, now)
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!("\n{}", "=".repeat(60));
    let language = catalog::language(&response.language).map_or(response.language.as_str(), |l| l.label);
    println!(
        "TRENDING ({}, since {}, {})",
        response.since.as_str(),
        response.date_filter,
        language
    );
    let b = response.difficulty_breakdown;
    println!(
        "beginner {} / intermediate {} / advanced {}",
        b.beginner, b.intermediate, b.advanced
    );
    println!("{}\n", "=".repeat(60));

    if response.repositories.is_empty() {
        println!("No trending repositories found.");
    }
    for repo in &response.repositories {
        print_repo(repo, now);
    }
    Ok(())
}

pub async fn show_repo(config: &Config, full_name: &str, json: bool) -> anyhow::Result<()> {
    let now = Utc::now();
    let repo = discovery(config)?.repository(full_name, now).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&repo)?);
    } else {
        print_repo(&repo, now);
        if !repo.topics.is_empty() {
            println!("    Topics: {}", repo.topics.join(", "));
        }
        println!("    Clone: {}", repo.clone_url);
    }
    Ok(())
}

fn print_repo(repo: &EnrichedRepository, now: DateTime<Utc>) {
    let marker = if repo.is_new { " [new]" } else { "" };
    println!("  {}{}", repo.full_name, marker);
    println!(
        "    ⭐ {}  forks {}  {}",
        repo.stars,
        repo.forks,
        repo.language.as_deref().unwrap_or("-")
    );

    let idle = score::idle_days(repo.updated_at, repo.pushed_at, now).unwrap_or(i64::MAX);
    let quality = catalog::project_quality(repo.stars, repo.forks, idle);
    let kind = catalog::project_type(&repo.topics).map_or("-", |t| t.label);
    println!(
        "    {} | good first {} | help wanted {} | score {} | quality {:?} | {}",
        repo.difficulty_level,
        repo.good_first_issues,
        repo.help_wanted_issues,
        repo.score.value(),
        quality,
        kind
    );
    if let Some(commits) = repo.recent_commits {
        println!("    ~{} recent commits", commits);
    }
    println!("    {}", repo.description);
    println!("    {}\n", repo.html_url);
}
