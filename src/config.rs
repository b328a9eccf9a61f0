use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_USER_AGENT: &str = "Ossify-App";
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Everything needed to talk to the provider.
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    pub api_base: String,
    /// Raises the rate limit when present; absence only lowers the ceiling.
    pub token: Option<String>,
    pub user_agent: String,
    pub request_timeout: Duration,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            token: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub github: GitHubConfig,
    /// Server bind address
    pub bind_addr: String,
    /// Fixed seed for the balancing shuffle; random per request when unset.
    pub shuffle_seed: Option<u64>,
    /// Where the saved-repository store lives
    pub data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github: GitHubConfig::default(),
            bind_addr: "127.0.0.1:3000".to_string(),
            shuffle_seed: None,
            data_dir: default_data_dir(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(token) = std::env::var("GITHUB_TOKEN") {
            if !token.trim().is_empty() {
                config.github.token = Some(token.trim().to_string());
            }
        }
        if let Ok(url) = std::env::var("OSSIFY_GITHUB_API") {
            config.github.api_base = url.trim_end_matches('/').to_string();
        }
        if let Ok(agent) = std::env::var("OSSIFY_USER_AGENT") {
            config.github.user_agent = agent;
        }
        if let Ok(val) = std::env::var("OSSIFY_REQUEST_TIMEOUT_SECS") {
            if let Ok(v) = val.parse::<u64>() {
                config.github.request_timeout =
                    Duration::from_secs(v.clamp(1, MAX_REQUEST_TIMEOUT_SECS));
            }
        }
        if let Ok(addr) = std::env::var("OSSIFY_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Ok(val) = std::env::var("OSSIFY_SHUFFLE_SEED") {
            if let Ok(v) = val.parse() {
                config.shuffle_seed = Some(v);
            }
        }
        if let Ok(dir) = std::env::var("OSSIFY_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }

        config
    }

    pub fn saved_repos_path(&self) -> PathBuf {
        self.data_dir.join("saved.json")
    }
}

fn default_data_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".config").join("ossify")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_public_api_without_token() {
        let config = Config::default();
        assert_eq!(config.github.api_base, "https://api.github.com");
        assert!(config.github.token.is_none());
        assert_eq!(config.github.user_agent, "Ossify-App");
        assert!(config.saved_repos_path().ends_with("ossify/saved.json"));
    }
}
