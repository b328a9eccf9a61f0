use std::sync::Arc;

use ossify::config::Config;
use ossify::server;

use super::search::discovery;

pub async fn serve(config: &Config, bind: Option<String>) -> anyhow::Result<()> {
    let bind_addr = bind.unwrap_or_else(|| config.bind_addr.clone());
    tracing::info!("GitHub API: {}", config.github.api_base);
    if config.github.token.is_none() {
        tracing::warn!("GITHUB_TOKEN not set, requests use the anonymous rate limit");
    }

    server::serve(&bind_addr, Arc::new(discovery(config)?)).await
}
