//! Merging, ranking and tier balancing of enriched results.

use std::collections::{HashSet, VecDeque};

use rand::seq::SliceRandom;
use rand::Rng;

use crate::types::{DifficultyBreakdown, DifficultyLevel, EnrichedRepository, RepositoryCandidate};

/// Points each contribution opportunity adds on top of the heuristic score.
pub const OPPORTUNITY_WEIGHT: i64 = 20;

pub const BEGINNER_SHARE: f64 = 0.3;
pub const INTERMEDIATE_SHARE: f64 = 0.4;
pub const ADVANCED_SHARE: f64 = 0.3;

/// Merges candidate lists by provider id, first occurrence wins.
pub fn dedupe<I>(lists: I) -> Vec<RepositoryCandidate>
where
    I: IntoIterator<Item = Vec<RepositoryCandidate>>,
{
    let mut seen = HashSet::new();
    lists
        .into_iter()
        .flatten()
        .filter(|repo| seen.insert(repo.id))
        .collect()
}

pub fn rank_key(repo: &EnrichedRepository) -> i64 {
    repo.score.value() + repo.total_contribution_opportunities as i64 * OPPORTUNITY_WEIGHT
}

/// Highest `score + opportunities * 20` first; ties keep their input order.
pub fn rank(repos: &mut [EnrichedRepository]) {
    repos.sort_by_key(|repo| std::cmp::Reverse(rank_key(repo)));
}

fn quota(target: usize, share: f64) -> usize {
    if target == 0 {
        return 0;
    }
    ((target as f64 * share).floor() as usize).max(1)
}

/// Per-tier quotas in beginner, intermediate, advanced order, never summing
/// past `target`. When the one-item floors overshoot a tiny target the
/// intermediate quota gives way first, then advanced.
pub fn tier_quotas(target: usize) -> [usize; 3] {
    let mut quotas = [
        quota(target, BEGINNER_SHARE),
        quota(target, INTERMEDIATE_SHARE),
        quota(target, ADVANCED_SHARE),
    ];
    for tier in [1, 2, 0] {
        let total: usize = quotas.iter().sum();
        let surplus = total.saturating_sub(target);
        quotas[tier] -= surplus.min(quotas[tier]);
    }
    quotas
}

/// Merges the beginner, intermediate and advanced search results into at most
/// `target` candidates: each tier first contributes up to its quota, then the
/// remaining slots are filled round-robin across tiers. Ids seen in an
/// earlier tier are dropped.
pub fn merge_tiers(tiers: [Vec<RepositoryCandidate>; 3], target: usize) -> Vec<RepositoryCandidate> {
    let mut seen = HashSet::new();
    let mut queues: Vec<VecDeque<RepositoryCandidate>> = tiers
        .into_iter()
        .map(|list| list.into_iter().filter(|repo| seen.insert(repo.id)).collect())
        .collect();

    let mut merged = Vec::with_capacity(target);
    for (queue, limit) in queues.iter_mut().zip(tier_quotas(target)) {
        let take = limit.min(queue.len());
        merged.extend(queue.drain(..take));
    }

    while merged.len() < target && queues.iter().any(|q| !q.is_empty()) {
        for queue in queues.iter_mut() {
            if merged.len() == target {
                break;
            }
            merged.extend(queue.pop_front());
        }
    }
    merged
}

/// Picks a tier-balanced, shuffled subset of exactly `target` items (or the
/// whole pool when it is smaller).
///
/// `ranked` must already be ranked. Each tier contributes up to its
/// [`tier_quotas`] share in rank order, shortfalls are filled from leftovers in
/// rank order, and only the kept selection is shuffled, so the output is
/// deliberately not in rank order.
pub fn balance_tiers<R>(
    ranked: Vec<EnrichedRepository>,
    target: usize,
    rng: &mut R,
) -> Vec<EnrichedRepository>
where
    R: Rng + ?Sized,
{
    let tiers = [
        DifficultyLevel::Beginner,
        DifficultyLevel::Intermediate,
        DifficultyLevel::Advanced,
    ];

    let mut taken = vec![false; ranked.len()];
    let mut picked: Vec<usize> = Vec::with_capacity(target);

    for (tier, limit) in tiers.into_iter().zip(tier_quotas(target)) {
        let tier_indices = ranked
            .iter()
            .enumerate()
            .filter(|(_, repo)| repo.difficulty_level == tier)
            .map(|(i, _)| i)
            .take(limit);
        for i in tier_indices {
            taken[i] = true;
            picked.push(i);
        }
    }

    if picked.len() < target {
        let missing = target - picked.len();
        let leftovers: Vec<usize> = (0..ranked.len()).filter(|&i| !taken[i]).take(missing).collect();
        picked.extend(leftovers);
    }

    picked.shuffle(rng);

    let mut slots: Vec<Option<EnrichedRepository>> = ranked.into_iter().map(Some).collect();
    picked
        .into_iter()
        .filter_map(|i| slots[i].take())
        .collect()
}

pub fn breakdown(repos: &[EnrichedRepository]) -> DifficultyBreakdown {
    repos
        .iter()
        .fold(DifficultyBreakdown::default(), |mut acc, repo| {
            match repo.difficulty_level {
                DifficultyLevel::Beginner => acc.beginner += 1,
                DifficultyLevel::Intermediate => acc.intermediate += 1,
                DifficultyLevel::Advanced => acc.advanced += 1,
            }
            acc
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Owner, Score};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn candidate(id: u64) -> RepositoryCandidate {
        RepositoryCandidate {
            id,
            name: format!("repo{id}"),
            full_name: format!("acme/repo{id}"),
            description: None,
            html_url: String::new(),
            clone_url: String::new(),
            stargazers_count: 0,
            forks_count: 0,
            language: None,
            topics: vec![],
            has_wiki: false,
            created_at: None,
            updated_at: None,
            pushed_at: None,
            owner: Owner {
                login: "acme".into(),
                avatar_url: String::new(),
                html_url: String::new(),
            },
        }
    }

    fn enriched(id: u64, tier: DifficultyLevel, score: i64, opportunities: u64) -> EnrichedRepository {
        EnrichedRepository {
            id,
            name: format!("repo{id}"),
            full_name: format!("acme/repo{id}"),
            description: String::new(),
            html_url: String::new(),
            clone_url: String::new(),
            stars: 0,
            forks: 0,
            language: None,
            topics: vec![],
            created_at: None,
            updated_at: None,
            pushed_at: None,
            owner: candidate(id).owner,
            good_first_issues: opportunities,
            help_wanted_issues: 0,
            total_contribution_opportunities: opportunities,
            difficulty_level: tier,
            score: Score::TrendingScore(score),
            recent_commits: Some(0),
            is_new: false,
            beginner_friendliness: 0,
        }
    }

    fn pool(beginners: u64, intermediates: u64, advanced: u64) -> Vec<EnrichedRepository> {
        let mut repos = Vec::new();
        let mut id = 0;
        for (count, tier) in [
            (beginners, DifficultyLevel::Beginner),
            (intermediates, DifficultyLevel::Intermediate),
            (advanced, DifficultyLevel::Advanced),
        ] {
            for _ in 0..count {
                id += 1;
                repos.push(enriched(id, tier, 1_000 - id as i64, 0));
            }
        }
        repos
    }

    #[test]
    fn dedupe_keeps_first_occurrence() {
        let a: Vec<_> = [1, 2, 3, 4].into_iter().map(candidate).collect();
        let b: Vec<_> = [3, 5, 1, 6].into_iter().map(candidate).collect();
        let merged = dedupe([a, b]);
        assert_eq!(merged.len(), 4 + 4 - 2);
        let ids: Vec<u64> = merged.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn rank_weights_opportunities() {
        let mut repos = vec![
            enriched(1, DifficultyLevel::Advanced, 100, 0),
            enriched(2, DifficultyLevel::Beginner, 50, 3),
            enriched(3, DifficultyLevel::Intermediate, 105, 0),
        ];
        rank(&mut repos);
        let ids: Vec<u64> = repos.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn rank_is_stable_on_ties() {
        let mut repos = vec![
            enriched(1, DifficultyLevel::Advanced, 40, 1),
            enriched(2, DifficultyLevel::Advanced, 60, 0),
        ];
        rank(&mut repos);
        assert_eq!(repos[0].id, 1);
    }

    #[test]
    fn balanced_selection_meets_tier_minimums() {
        let mut rng = StdRng::seed_from_u64(7);
        let target = 10;
        let out = balance_tiers(pool(8, 8, 8), target, &mut rng);
        assert_eq!(out.len(), target);
        let counts = breakdown(&out);
        assert!(counts.beginner >= 3);
        assert!(counts.advanced >= 3);
        assert!(counts.intermediate >= 4);
    }

    #[test]
    fn shortfall_is_filled_from_leftovers() {
        let mut rng = StdRng::seed_from_u64(1);
        // no advanced items at all
        let out = balance_tiers(pool(2, 10, 0), 10, &mut rng);
        assert_eq!(out.len(), 10);
        assert_eq!(breakdown(&out).beginner, 2);
    }

    #[test]
    fn small_pool_returns_everything() {
        let mut rng = StdRng::seed_from_u64(3);
        let out = balance_tiers(pool(1, 1, 1), 12, &mut rng);
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn zero_target_is_empty() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!(balance_tiers(pool(2, 2, 2), 0, &mut rng).is_empty());
    }

    #[test]
    fn fixed_seed_gives_fixed_permutation() {
        let first = balance_tiers(pool(4, 4, 4), 9, &mut StdRng::seed_from_u64(42));
        let second = balance_tiers(pool(4, 4, 4), 9, &mut StdRng::seed_from_u64(42));
        let ids = |v: &[EnrichedRepository]| v.iter().map(|r| r.id).collect::<Vec<_>>();
        assert_eq!(ids(&first), ids(&second));
    }

    #[test]
    fn quotas_shrink_intermediate_first_for_tiny_targets() {
        assert_eq!(tier_quotas(0), [0, 0, 0]);
        assert_eq!(tier_quotas(1), [1, 0, 0]);
        assert_eq!(tier_quotas(2), [1, 0, 1]);
        assert_eq!(tier_quotas(3), [1, 1, 1]);
        assert_eq!(tier_quotas(10), [3, 4, 3]);
        assert_eq!(tier_quotas(12), [3, 4, 3]);
    }

    #[test]
    fn two_slots_keep_beginner_and_advanced_for_every_seed() {
        for seed in 0..50 {
            let out = balance_tiers(pool(3, 3, 3), 2, &mut StdRng::seed_from_u64(seed));
            let counts = breakdown(&out);
            assert_eq!(out.len(), 2);
            assert_eq!((counts.beginner, counts.advanced), (1, 1), "seed {seed}");
        }
    }

    #[test]
    fn single_slot_is_the_top_beginner() {
        for seed in 0..10 {
            let out = balance_tiers(pool(3, 3, 3), 1, &mut StdRng::seed_from_u64(seed));
            assert_eq!(out.len(), 1);
            assert_eq!(out[0].id, 1);
        }
    }

    #[test]
    fn merge_takes_tier_shares_before_overflow() {
        let tier = |ids: std::ops::RangeInclusive<u64>| ids.map(candidate).collect::<Vec<_>>();
        let merged = merge_tiers([tier(1..=4), tier(11..=14), tier(21..=24)], 10);
        let ids: Vec<u64> = merged.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 11, 12, 13, 14, 21, 22, 23]);
    }

    #[test]
    fn merge_fills_round_robin_and_drops_repeats() {
        let tier = |ids: &[u64]| ids.iter().copied().map(candidate).collect::<Vec<_>>();
        // intermediate tier is empty and repeats id 1 from the beginner tier
        let merged = merge_tiers([tier(&[1, 2, 3, 4]), tier(&[1]), tier(&[21, 22, 23, 24])], 10);
        let ids: Vec<u64> = merged.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 21, 22, 23, 4, 24]);
    }

    #[test]
    fn no_duplicates_in_selection() {
        let out = balance_tiers(pool(5, 5, 5), 12, &mut StdRng::seed_from_u64(9));
        let unique: HashSet<u64> = out.iter().map(|r| r.id).collect();
        assert_eq!(unique.len(), out.len());
    }
}
