//! Turns free text and filters into GitHub search query strings.
//!
//! Language and difficulty hints are always translated into provider
//! qualifiers (`language:`, `label:`); they are never passed through raw.

use chrono::{DateTime, Duration, Utc};

use crate::types::{DifficultyLevel, Since};

pub const POPULARITY_FLOOR: &str = "stars:>10 forks:>5";
pub const GOOD_FIRST_ISSUES_FLOOR: &str = "good-first-issues:>0";
pub const GOOD_FIRST_ISSUE_LABEL: &str = "good first issue";
pub const HELP_WANTED_LABEL: &str = "help wanted";

/// The top-up search looks this many windows back.
pub const BROAD_WINDOW_MULTIPLIER: i64 = 4;

/// `language:<lowercased>` unless the filter is empty or "all".
pub fn language_qualifier(language: Option<&str>) -> Option<String> {
    let language = language?.trim();
    if language.is_empty() || language.eq_ignore_ascii_case("all") {
        return None;
    }
    Some(format!("language:{}", language.to_lowercase()))
}

fn label_qualifier(level: Option<DifficultyLevel>) -> Option<String> {
    match level? {
        DifficultyLevel::Beginner => Some(format!("label:\"{GOOD_FIRST_ISSUE_LABEL}\"")),
        DifficultyLevel::Intermediate => Some(format!("label:\"{HELP_WANTED_LABEL}\"")),
        DifficultyLevel::Advanced => None,
    }
}

/// Query for the search endpoint. Empty text degrades to the popularity floor.
pub fn build_search_query(
    text: &str,
    language: Option<&str>,
    level: Option<DifficultyLevel>,
) -> String {
    let mut terms: Vec<String> = Vec::new();

    let text = text.trim();
    if !text.is_empty() {
        terms.push(text.to_string());
    }
    terms.extend(language_qualifier(language));
    terms.extend(label_qualifier(level));
    terms.push(POPULARITY_FLOOR.to_string());
    terms.push(GOOD_FIRST_ISSUES_FLOOR.to_string());

    terms.join(" ")
}

/// Calendar date (UTC) used in `created:>` / `pushed:>` qualifiers.
pub fn date_string(date: DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn with_language(mut query: String, language: Option<&str>) -> String {
    if let Some(qualifier) = language_qualifier(language) {
        query.push(' ');
        query.push_str(&qualifier);
    }
    query
}

/// Classic trending: repositories created inside the window.
pub fn trending_query(since_date: DateTime<Utc>, language: Option<&str>) -> String {
    let query = format!("created:>{} stars:>10", date_string(since_date));
    let mut query = with_language(query, language);
    query.push(' ');
    query.push_str(GOOD_FIRST_ISSUES_FLOOR);
    query
}

/// Classic trending fallback: established repositories pushed inside the window.
pub fn popular_fallback_query(since_date: DateTime<Utc>, language: Option<&str>) -> String {
    with_language(
        format!("stars:>100 pushed:>{}", date_string(since_date)),
        language,
    )
}

/// The three category searches of the balanced trending flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierQueries {
    /// Young, small, several good first issues.
    pub beginner: String,
    /// Mid-size, recently pushed, asking for help.
    pub intermediate: String,
    /// Large, well forked, recently pushed.
    pub advanced: String,
}

pub fn tier_queries(since_date: DateTime<Utc>, language: Option<&str>) -> TierQueries {
    let date = date_string(since_date);
    TierQueries {
        beginner: with_language(
            format!("created:>{date} stars:10..500 good-first-issues:>2"),
            language,
        ),
        intermediate: with_language(
            format!("pushed:>{date} stars:500..10000 help-wanted-issues:>0"),
            language,
        ),
        advanced: with_language(
            format!("pushed:>{date} stars:>15000 forks:>1000"),
            language,
        ),
    }
}

/// Top-up search over a wider window with only a star floor.
pub fn broad_query(now: DateTime<Utc>, since: Since, language: Option<&str>) -> String {
    let wide = now - Duration::days(since.days() * BROAD_WINDOW_MULTIPLIER);
    with_language(format!("pushed:>{} stars:>100", date_string(wide)), language)
}

/// Issue search scoped to one repository, one label, open issues only.
pub fn issue_query(full_name: &str, label: &str) -> String {
    format!("repo:{full_name} label:\"{label}\" state:open")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 30, 0).unwrap()
    }

    #[test]
    fn language_appears_lowercased_exactly_once() {
        for lang in ["Python", "RUST", "go", "TypeScript"] {
            let q = build_search_query("parser", Some(lang), None);
            let token = format!("language:{}", lang.to_lowercase());
            assert_eq!(q.matches(&token).count(), 1, "{q}");
        }
    }

    #[test]
    fn all_language_adds_no_qualifier() {
        let q = build_search_query("cli", Some("all"), None);
        assert!(!q.contains("language:"));
        let q = build_search_query("cli", Some("  "), None);
        assert!(!q.contains("language:"));
    }

    #[test]
    fn empty_text_uses_popularity_floor() {
        let q = build_search_query("", None, None);
        assert_eq!(q, "stars:>10 forks:>5 good-first-issues:>0");
        let q = build_search_query("   ", None, None);
        assert!(q.starts_with("stars:>10 forks:>5"));
        assert!(!q.contains("  "));
    }

    #[test]
    fn level_maps_to_label_constraint() {
        let q = build_search_query("", None, Some(DifficultyLevel::Beginner));
        assert!(q.contains("label:\"good first issue\""));
        let q = build_search_query("", None, Some(DifficultyLevel::Intermediate));
        assert!(q.contains("label:\"help wanted\""));
        let q = build_search_query("", None, Some(DifficultyLevel::Advanced));
        assert!(!q.contains("label:"));
    }

    #[test]
    fn beginner_python_scenario() {
        let q = build_search_query("", Some("python"), Some(DifficultyLevel::Beginner));
        assert_eq!(
            q,
            "language:python label:\"good first issue\" stars:>10 forks:>5 good-first-issues:>0"
        );
    }

    #[test]
    fn trending_queries_carry_the_window_date() {
        let date = Since::Daily.date_filter(now());
        assert_eq!(
            trending_query(date, Some("Rust")),
            "created:>2024-06-14 stars:>10 language:rust good-first-issues:>0"
        );
        assert_eq!(
            popular_fallback_query(date, None),
            "stars:>100 pushed:>2024-06-14"
        );
    }

    #[test]
    fn tier_queries_use_created_and_pushed() {
        let tiers = tier_queries(Since::Weekly.date_filter(now()), Some("go"));
        assert!(tiers.beginner.starts_with("created:>2024-06-08"));
        assert!(tiers.intermediate.starts_with("pushed:>2024-06-08"));
        assert!(tiers.advanced.contains("stars:>15000"));
        assert!(tiers.advanced.ends_with("language:go"));
    }

    #[test]
    fn broad_query_widens_the_window() {
        assert_eq!(
            broad_query(now(), Since::Weekly, None),
            "pushed:>2024-05-18 stars:>100"
        );
    }

    #[test]
    fn issue_query_scopes_to_repository() {
        assert_eq!(
            issue_query("acme/demo", GOOD_FIRST_ISSUE_LABEL),
            "repo:acme/demo label:\"good first issue\" state:open"
        );
    }
}
