//! Static catalog of filter values plus the secondary heuristics shown next
//! to each repository (quality, project type, beginner friendliness).

use serde::Serialize;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    pub value: &'static str,
    pub label: &'static str,
    pub color: &'static str,
}

const fn lang(value: &'static str, label: &'static str, color: &'static str) -> Language {
    Language { value, label, color }
}

pub const UNKNOWN_COLOR: &str = "#6B7280";

pub const LANGUAGES: &[Language] = &[
    lang("all", "All Languages", UNKNOWN_COLOR),
    lang("javascript", "JavaScript", "#F7DF1E"),
    lang("typescript", "TypeScript", "#3178C6"),
    lang("python", "Python", "#3776AB"),
    lang("java", "Java", "#ED8B00"),
    lang("go", "Go", "#00ADD8"),
    lang("rust", "Rust", "#000000"),
    lang("cpp", "C++", "#00599C"),
    lang("c", "C", "#A8B9CC"),
    lang("csharp", "C#", "#239120"),
    lang("php", "PHP", "#777BB4"),
    lang("ruby", "Ruby", "#CC342D"),
    lang("swift", "Swift", "#FA7343"),
    lang("kotlin", "Kotlin", "#7F52FF"),
    lang("dart", "Dart", "#0175C2"),
    lang("scala", "Scala", "#DC322F"),
    lang("r", "R", "#276DC3"),
    lang("shell", "Shell", "#89E051"),
    lang("lua", "Lua", "#2C2D72"),
    lang("haskell", "Haskell", "#5D4F85"),
];

pub fn language(value: &str) -> Option<&'static Language> {
    let value = value.trim().to_lowercase();
    LANGUAGES.iter().find(|l| l.value == value)
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimePeriod {
    pub value: &'static str,
    pub label: &'static str,
}

pub const TIME_PERIODS: &[TimePeriod] = &[
    TimePeriod { value: "daily", label: "Today" },
    TimePeriod { value: "weekly", label: "This Week" },
    TimePeriod { value: "monthly", label: "This Month" },
];

pub const BEGINNER_FRIENDLY_TOPICS: &[&str] = &[
    "good-first-issue",
    "beginner-friendly",
    "hacktoberfest",
    "first-timers-only",
    "up-for-grabs",
    "help-wanted",
    "newcomer-friendly",
    "easy",
    "starter",
    "tutorial",
    "learning",
    "education",
    "documentation",
];

/// 0..=100, higher means easier to get started with.
pub fn beginner_friendliness(topics: &[String], stars: u64, good_first: u64, has_wiki: bool) -> u8 {
    let mut score: i64 = 0;

    let friendly = topics
        .iter()
        .filter(|t| BEGINNER_FRIENDLY_TOPICS.contains(&t.as_str()))
        .count() as i64;
    score += friendly * 10;
    score += good_first.min(100) as i64 * 15;

    if has_wiki || topics.iter().any(|t| t == "documentation") {
        score += 10;
    }

    if stars > 10_000 {
        score -= 20;
    } else if stars > 1_000 {
        score -= 10;
    }
    if stars > 50 && stars < 1_000 {
        score += 15;
    }

    score.clamp(0, 100) as u8
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProjectQuality {
    Excellent,
    Good,
    Decent,
    Unknown,
}

struct QualityBar {
    min_stars: u64,
    min_forks: u64,
    max_idle_days: i64,
}

const EXCELLENT: QualityBar = QualityBar { min_stars: 1_000, min_forks: 100, max_idle_days: 7 };
const GOOD: QualityBar = QualityBar { min_stars: 100, min_forks: 10, max_idle_days: 30 };
const DECENT: QualityBar = QualityBar { min_stars: 10, min_forks: 1, max_idle_days: 90 };

pub fn project_quality(stars: u64, forks: u64, days_since_update: i64) -> ProjectQuality {
    let meets = |bar: &QualityBar| {
        stars >= bar.min_stars && forks >= bar.min_forks && days_since_update <= bar.max_idle_days
    };
    if meets(&EXCELLENT) {
        ProjectQuality::Excellent
    } else if meets(&GOOD) {
        ProjectQuality::Good
    } else if meets(&DECENT) {
        ProjectQuality::Decent
    } else {
        ProjectQuality::Unknown
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectType {
    pub value: &'static str,
    pub label: &'static str,
    pub topics: &'static [&'static str],
}

pub const PROJECT_TYPES: &[ProjectType] = &[
    ProjectType { value: "web-app", label: "Web Applications", topics: &["webapp", "website", "frontend", "backend"] },
    ProjectType { value: "mobile-app", label: "Mobile Apps", topics: &["android", "ios", "mobile", "react-native", "flutter"] },
    ProjectType { value: "library", label: "Libraries & Frameworks", topics: &["library", "framework", "sdk", "api"] },
    ProjectType { value: "tool", label: "Developer Tools", topics: &["cli", "tool", "utility", "productivity"] },
    ProjectType { value: "game", label: "Games", topics: &["game", "gaming", "unity", "godot"] },
    ProjectType { value: "ai-ml", label: "AI & Machine Learning", topics: &["machine-learning", "ai", "deep-learning", "tensorflow", "pytorch"] },
    ProjectType { value: "data", label: "Data Science", topics: &["data-science", "data-analysis", "visualization", "jupyter"] },
    ProjectType { value: "devops", label: "DevOps & Infrastructure", topics: &["devops", "docker", "kubernetes", "ci-cd", "deployment"] },
];

/// First project type whose topic list intersects the repository's topics.
pub fn project_type(topics: &[String]) -> Option<&'static ProjectType> {
    PROJECT_TYPES
        .iter()
        .find(|ty| ty.topics.iter().any(|t| topics.iter().any(|own| own == t)))
}
