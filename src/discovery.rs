//! Request-scoped pipelines: build queries, fan out searches, enrich, score,
//! rank/balance and assemble the response.
//!
//! ```text
//!   query ──► search(es) ──► dedupe ──► enrich (per repo, concurrent)
//!                                            │
//!          response ◄── balance ◄── rank ◄───┘
//! ```

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::balance;
use crate::enrich::{self, EnrichMode};
use crate::error::Result;
use crate::github::{search_or_empty, RepoSearch, RepositoryProvider, SortKey};
use crate::query;
use crate::types::{
    EnrichedRepository, Pagination, RepositoryCandidate, SearchQuery, SearchResponse, Strategy,
    TrendingQuery, TrendingResponse,
};

/// Number of category searches in the balanced trending flow.
const TIER_COUNT: u32 = 3;

pub struct Discovery<P> {
    provider: P,
    shuffle_seed: Option<u64>,
}

impl<P: RepositoryProvider> Discovery<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            shuffle_seed: None,
        }
    }

    /// Fixes the balancing shuffle so responses are reproducible.
    pub fn with_shuffle_seed(mut self, seed: Option<u64>) -> Self {
        self.shuffle_seed = seed;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Search mode. The provider search is load-bearing: its failure fails the request.
    pub async fn search(&self, request: &SearchQuery, now: DateTime<Utc>) -> Result<SearchResponse> {
        let paging = request.pagination;
        let search_query =
            query::build_search_query(&request.text, request.language.as_deref(), request.level);

        let page = self
            .provider
            .search_repositories(&RepoSearch::new(
                search_query.clone(),
                SortKey::Stars,
                paging.page,
                paging.per_page,
            ))
            .await?;

        let candidates = first_page(balance::dedupe([page.items]), paging);
        let repositories = enrich::enrich_all(&self.provider, &candidates, EnrichMode::Search, now).await;

        tracing::info!(
            query = %search_query,
            total = page.total_count,
            returned = repositories.len(),
            "search complete"
        );

        Ok(SearchResponse {
            repositories,
            total_count: page.total_count,
            page: paging.page,
            per_page: paging.per_page,
            has_more: paging.has_more(page.total_count),
            search_query,
        })
    }

    pub async fn trending(&self, request: &TrendingQuery, now: DateTime<Utc>) -> Result<TrendingResponse> {
        let paging = request.pagination;
        let since_date = request.since.date_filter(now);

        let (repositories, total_count) = match request.strategy {
            Strategy::Classic => self.classic_trending(request, since_date, now).await?,
            Strategy::Balanced => self.balanced_trending(request, since_date, now).await,
        };

        tracing::info!(
            since = request.since.as_str(),
            strategy = ?request.strategy,
            total = total_count,
            returned = repositories.len(),
            "trending complete"
        );

        Ok(TrendingResponse {
            difficulty_breakdown: balance::breakdown(&repositories),
            repositories,
            total_count,
            page: paging.page,
            per_page: paging.per_page,
            has_more: paging.has_more(total_count),
            since: request.since,
            language: request
                .language
                .as_deref()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .unwrap_or("all")
                .to_string(),
            date_filter: query::date_string(since_date),
            strategy: request.strategy,
        })
    }

    /// One recency search (fatal on failure) topped up by a popularity search.
    async fn classic_trending(
        &self,
        request: &TrendingQuery,
        since_date: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<(Vec<EnrichedRepository>, u64)> {
        let paging = request.pagination;
        let language = request.language.as_deref();

        let primary = self
            .provider
            .search_repositories(&RepoSearch::new(
                query::trending_query(since_date, language),
                SortKey::Stars,
                paging.page,
                paging.per_page,
            ))
            .await?;

        let mut lists = vec![primary.items];
        let found = lists[0].len() as u32;
        if found < paging.per_page {
            let fallback = search_or_empty(
                &self.provider,
                &RepoSearch::new(
                    query::popular_fallback_query(since_date, language),
                    SortKey::Updated,
                    1,
                    paging.per_page - found,
                ),
            )
            .await;
            lists.push(fallback.items);
        }

        let candidates = first_page(balance::dedupe(lists), paging);
        let mut repositories = enrich::enrich_all(
            &self.provider,
            &candidates,
            EnrichMode::Trending { since: since_date },
            now,
        )
        .await;
        balance::rank(&mut repositories);

        Ok((repositories, primary.total_count))
    }

    /// Three tier searches in parallel, each allowed to fail, then ranked and
    /// rebalanced. The reported total is the sum of the tier totals.
    async fn balanced_trending(
        &self,
        request: &TrendingQuery,
        since_date: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> (Vec<EnrichedRepository>, u64) {
        let paging = request.pagination;
        let language = request.language.as_deref();
        let per_tier = paging.per_page.div_ceil(TIER_COUNT);
        let tiers = query::tier_queries(since_date, language);

        let beginner_search = RepoSearch::new(tiers.beginner, SortKey::Stars, paging.page, per_tier);
        let intermediate_search =
            RepoSearch::new(tiers.intermediate, SortKey::Updated, paging.page, per_tier);
        let advanced_search = RepoSearch::new(tiers.advanced, SortKey::Stars, paging.page, per_tier);

        let (beginner, intermediate, advanced) = tokio::join!(
            search_or_empty(&self.provider, &beginner_search),
            search_or_empty(&self.provider, &intermediate_search),
            search_or_empty(&self.provider, &advanced_search),
        );

        let total_count = beginner.total_count + intermediate.total_count + advanced.total_count;
        let wanted = paging.per_page as usize;
        let mut pool =
            balance::merge_tiers([beginner.items, intermediate.items, advanced.items], wanted);

        if pool.len() < wanted {
            let broad = search_or_empty(
                &self.provider,
                &RepoSearch::new(
                    query::broad_query(now, request.since, language),
                    SortKey::Updated,
                    1,
                    (wanted - pool.len()) as u32,
                ),
            )
            .await;
            pool = first_page(balance::dedupe([pool, broad.items]), paging);
        }

        let mut repositories = enrich::enrich_all(
            &self.provider,
            &pool,
            EnrichMode::Trending { since: since_date },
            now,
        )
        .await;
        balance::rank(&mut repositories);

        let mut rng = match self.shuffle_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let repositories = balance::balance_tiers(repositories, wanted, &mut rng);

        (repositories, total_count)
    }

    /// Looks up and enriches one repository in search mode.
    pub async fn repository(&self, full_name: &str, now: DateTime<Utc>) -> Result<EnrichedRepository> {
        let candidate = self.provider.repository(full_name).await?;
        Ok(enrich::enrich_one(&self.provider, &candidate, EnrichMode::Search, now).await)
    }
}

fn first_page(mut candidates: Vec<RepositoryCandidate>, paging: Pagination) -> Vec<RepositoryCandidate> {
    candidates.truncate(paging.per_page as usize);
    candidates
}
