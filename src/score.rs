//! Closed-form heuristics. Every function takes `now` explicitly so a request
//! scores all of its repositories against the same instant.

use chrono::{DateTime, Utc};

use crate::types::DifficultyLevel;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

// Search mode
pub const STAR_LOG_WEIGHT: f64 = 10.0;
pub const GOOD_FIRST_ISSUE_WEIGHT: u64 = 2;
pub const ISSUE_SCORE_WEIGHT: u64 = 5;
pub const ACTIVITY_CEILING: i64 = 100;
pub const ACTIVITY_DECAY_DAYS: i64 = 30;

// Trending mode
pub const TRENDING_GOOD_FIRST_WEIGHT: u64 = 3;
pub const TRENDING_HELP_WANTED_WEIGHT: u64 = 2;
pub const TRENDING_ISSUE_MULTIPLIER: u64 = 10;
pub const COMMIT_WEIGHT: u64 = 5;
pub const FRESH_UPDATE_DAYS: i64 = 30;
pub const FRESH_UPDATE_WEIGHT: i64 = 2;
pub const NEW_REPO_BONUS: i64 = 50;
pub const NEW_REPO_DAYS: i64 = 30;

/// Whole days from `then` to `now`, floor-divided on milliseconds.
pub fn days_between(now: DateTime<Utc>, then: DateTime<Utc>) -> i64 {
    (now - then).num_milliseconds().div_euclid(MILLIS_PER_DAY)
}

pub fn search_difficulty(stars: u64, good_first: u64, help_wanted: u64) -> DifficultyLevel {
    let total = good_first + help_wanted;
    if good_first > 0 && stars < 1_000 {
        DifficultyLevel::Beginner
    } else if total > 0 && stars < 5_000 {
        DifficultyLevel::Intermediate
    } else {
        DifficultyLevel::Advanced
    }
}

pub fn trending_difficulty(
    stars: u64,
    forks: u64,
    good_first: u64,
    help_wanted: u64,
    age_days: Option<i64>,
) -> DifficultyLevel {
    let total = good_first + help_wanted;

    let young = age_days.is_some_and(|days| days <= 90);
    let young_and_welcoming = young && good_first >= 2 && stars < 300;
    let small_with_backlog = stars < 500 && total >= 3 && good_first >= 1;
    if young_and_welcoming || small_with_backlog {
        return DifficultyLevel::Beginner;
    }

    let mid_size_with_issues = (500..10_000).contains(&stars) && total >= 1;
    let forked_community = (300..15_000).contains(&stars) && forks >= 200;
    if mid_size_with_issues || forked_community {
        return DifficultyLevel::Intermediate;
    }

    if stars >= 15_000 || forks >= 1_000 {
        return DifficultyLevel::Advanced;
    }

    DifficultyLevel::Intermediate
}

pub fn contribution_score(
    stars: u64,
    good_first: u64,
    help_wanted: u64,
    updated_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> i64 {
    let base = ((stars + 1) as f64).ln() * STAR_LOG_WEIGHT;
    let issues = ((good_first * GOOD_FIRST_ISSUE_WEIGHT + help_wanted) * ISSUE_SCORE_WEIGHT) as f64;
    let activity = match updated_at {
        Some(updated) => {
            let months = days_between(now, updated).div_euclid(ACTIVITY_DECAY_DAYS);
            (ACTIVITY_CEILING - months).max(0)
        }
        None => 0,
    };

    (base + issues + activity as f64).round() as i64
}

#[derive(Debug, Clone, Copy)]
pub struct TrendingInputs {
    pub stars: u64,
    pub good_first: u64,
    pub help_wanted: u64,
    pub recent_commits: u64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Unknown timestamps earn no growth, freshness or new-repository points.
pub fn trending_score(inputs: &TrendingInputs, now: DateTime<Utc>) -> i64 {
    let days_created = inputs.created_at.map(|t| days_between(now, t).max(1));
    let days_updated = inputs.updated_at.map(|t| days_between(now, t).max(1));

    let growth = days_created.map_or(0.0, |days| inputs.stars as f64 / (days as f64).sqrt());
    let contribution = ((inputs.good_first * TRENDING_GOOD_FIRST_WEIGHT
        + inputs.help_wanted * TRENDING_HELP_WANTED_WEIGHT)
        * TRENDING_ISSUE_MULTIPLIER) as f64;
    let freshness = days_updated.map_or(0, |days| (FRESH_UPDATE_DAYS - days).max(0) * FRESH_UPDATE_WEIGHT);
    let activity = (inputs.recent_commits * COMMIT_WEIGHT) as i64 + freshness;
    let new_repo = if days_created.is_some_and(|days| days <= NEW_REPO_DAYS) {
        NEW_REPO_BONUS
    } else {
        0
    };

    (growth + contribution + (activity + new_repo) as f64).round() as i64
}

/// Created within the last 30 days. Unknown creation time is never new.
pub fn is_new(created_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    created_at.is_some_and(|created| days_between(now, created) <= NEW_REPO_DAYS)
}

/// Days since the last update, falling back to the last push.
pub fn idle_days(
    updated_at: Option<DateTime<Utc>>,
    pushed_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<i64> {
    updated_at.or(pushed_at).map(|t| days_between(now, t))
}

pub fn age_days(created_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Option<i64> {
    created_at.map(|created| days_between(now, created))
}
