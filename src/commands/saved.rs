use chrono::Utc;
use uuid::Uuid;

use ossify::config::Config;
use ossify::store::{JsonFileStore, RepoSnapshot, SavedRepoStore};
use ossify::Error;

use super::search::discovery;

pub async fn save_repo(config: &Config, full_name: &str, user: &str) -> anyhow::Result<()> {
    let repo = discovery(config)?.repository(full_name, Utc::now()).await?;

    let mut store = JsonFileStore::load(config.saved_repos_path())?;
    match store.insert(user, RepoSnapshot::from(&repo)) {
        Ok(record) => {
            println!("✓ Saved {} ({})", record.snapshot.full_name, record.id);
            Ok(())
        }
        Err(Error::AlreadySaved { .. }) => {
            println!("{} is already in your list.", repo.full_name);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

pub fn list_saved(config: &Config, user: &str) -> anyhow::Result<()> {
    let store = JsonFileStore::load(config.saved_repos_path())?;
    let saved = store.list(user)?;

    if saved.is_empty() {
        println!("No repositories saved yet.");
        return Ok(());
    }

    println!("Saved repositories ({}):\n", store.path().display());
    for record in &saved {
        let repo = &record.snapshot;
        println!("  {} [{}]", repo.full_name, repo.difficulty_level);
        println!("    ⭐ {}  {}", repo.stars, repo.language.as_deref().unwrap_or("-"));
        println!("    {}", repo.html_url);
        println!("    id {}  saved {}", record.id, record.saved_at.format("%Y-%m-%d"));
        println!();
    }
    Ok(())
}

pub fn remove_saved(config: &Config, id: Uuid) -> anyhow::Result<()> {
    let mut store = JsonFileStore::load(config.saved_repos_path())?;
    let removed = store.delete(id)?;
    println!("✓ Removed {}", removed.snapshot.full_name);
    Ok(())
}
