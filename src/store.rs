use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::types::{DifficultyLevel, EnrichedRepository};

/// The part of a repository worth remembering once a user saves it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RepoSnapshot {
    pub repo_id: u64,
    pub name: String,
    pub full_name: String,
    pub stars: u64,
    pub html_url: String,
    pub description: String,
    pub difficulty_level: DifficultyLevel,
    pub language: Option<String>,
}

impl From<&EnrichedRepository> for RepoSnapshot {
    fn from(repo: &EnrichedRepository) -> Self {
        Self {
            repo_id: repo.id,
            name: repo.name.clone(),
            full_name: repo.full_name.clone(),
            stars: repo.stars,
            html_url: repo.html_url.clone(),
            description: repo.description.clone(),
            difficulty_level: repo.difficulty_level,
            language: repo.language.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SavedRepo {
    pub id: Uuid,
    pub user: String,
    #[serde(flatten)]
    pub snapshot: RepoSnapshot,
    pub saved_at: DateTime<Utc>,
}

/// Per-user saved repositories.
pub trait SavedRepoStore {
    fn list(&self, user: &str) -> Result<Vec<SavedRepo>>;

    /// Rejects a repository the user has already saved.
    fn insert(&mut self, user: &str, snapshot: RepoSnapshot) -> Result<SavedRepo>;

    fn delete(&mut self, id: Uuid) -> Result<SavedRepo>;
}

/// Saved repositories kept in one JSON file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    records: Vec<SavedRepo>,
}

impl JsonFileStore {
    /// A missing or unreadable file starts an empty store.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let records = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), "ignoring corrupt saved-repo file: {e}");
                Vec::new()
            })
        } else {
            Vec::new()
        };
        Ok(Self { path, records })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Atomic write via temp file + rename.
    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&self.records)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, contents)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl SavedRepoStore for JsonFileStore {
    fn list(&self, user: &str) -> Result<Vec<SavedRepo>> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.user == user)
            .cloned()
            .collect())
    }

    fn insert(&mut self, user: &str, snapshot: RepoSnapshot) -> Result<SavedRepo> {
        if self
            .records
            .iter()
            .any(|r| r.user == user && r.snapshot.repo_id == snapshot.repo_id)
        {
            return Err(Error::AlreadySaved {
                repo_id: snapshot.repo_id,
            });
        }

        let record = SavedRepo {
            id: Uuid::new_v4(),
            user: user.to_string(),
            snapshot,
            saved_at: Utc::now(),
        };
        self.records.push(record.clone());
        self.save()?;
        Ok(record)
    }

    fn delete(&mut self, id: Uuid) -> Result<SavedRepo> {
        let index = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or(Error::SavedNotFound { id })?;
        let removed = self.records.remove(index);
        self.save()?;
        Ok(removed)
    }
}
