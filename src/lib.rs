//! # ossify
//!
//! Discovers open-source repositories worth contributing to. Candidates come
//! from GitHub's search API, get enriched with "good first issue" and "help
//! wanted" counts, and are scored, ranked and (for trending) balanced across
//! beginner, intermediate and advanced tiers.
//!
//! ## Module Overview
//!
//! - [`query`] - Builds GitHub search query strings from text and filters
//! - [`github`] - Provider trait and the `reqwest` GitHub client
//! - [`enrich`] - Concurrent per-repository issue/commit enrichment
//! - [`score`] - Difficulty, contribution and trending heuristics
//! - [`catalog`] - Language catalog, project quality/type, beginner friendliness
//! - [`balance`] - Dedupe, ranking and tier balancing
//! - [`discovery`] - Search and trending pipelines, response assembly
//! - [`server`] - Axum HTTP endpoints
//! - [`store`] - Saved-repository store
//! - [`config`] - Environment-based configuration

pub mod balance;
pub mod catalog;
pub mod config;
pub mod discovery;
pub mod enrich;
pub mod error;
pub mod github;
pub mod query;
pub mod score;
pub mod server;
pub mod store;
pub mod types;

pub use error::{Error, Result};
