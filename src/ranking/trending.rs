//! Trending selector
//!
//! Global ordering of the catalog by trending score, with a per-location
//! admission cap so neither city monopolizes the strip, and a backfill pass
//! so the strip still fills when one city dominates the scores.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

use crate::catalog::{Catalog, Location, Recording};
use crate::likes::LikeCounts;
use crate::ranking::score::trending_score;

/// Default slot count for the trending strip.
pub const DEFAULT_TRENDING_LIMIT: usize = 6;

/// One trending slot: the recording plus the signals it was ranked by.
/// The score is derived per call and never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct TrendingEntry {
    pub recording: Recording,
    pub like_count: u64,
    pub trending_score: i64,
}

/// Rank the catalog by trending score and admit up to `limit` entries.
///
/// Recordings missing from `like_counts` count as zero likes, which is also
/// how a failed like-count fetch degrades: the ordering then rests purely on
/// recency and the hero-artwork bonus. Deterministic for identical inputs.
///
/// Admission runs in two passes over the sorted list: a diversity pass
/// honoring a per-location cap of `ceil(limit/2)`, then a backfill pass that
/// ignores the cap if the first pass came up short. Output order is
/// admission order, so the diversity picks keep their sorted relative order
/// and backfill picks append after them.
pub fn trending_recordings(
    catalog: &Catalog,
    like_counts: &LikeCounts,
    now: NaiveDate,
    limit: usize,
) -> Vec<TrendingEntry> {
    if limit == 0 || catalog.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<TrendingEntry> = catalog
        .recordings()
        .iter()
        .map(|recording| {
            let like_count = like_counts.get(&recording.id).copied().unwrap_or(0);
            TrendingEntry {
                like_count,
                trending_score: trending_score(recording, like_count, now),
                recording: recording.clone(),
            }
        })
        .collect();

    // Stable sort: equal (score, date) pairs keep catalog order.
    scored.sort_by(|a, b| {
        b.trending_score
            .cmp(&a.trending_score)
            .then(b.recording.date.cmp(&a.recording.date))
    });

    let location_cap = limit.div_ceil(2);
    let mut per_location: HashMap<Location, usize> = HashMap::new();
    let mut admitted: Vec<usize> = Vec::with_capacity(limit.min(scored.len()));
    let mut taken = vec![false; scored.len()];

    // Diversity pass: admit in sorted order while under the location cap.
    for (idx, entry) in scored.iter().enumerate() {
        if admitted.len() == limit {
            break;
        }
        let count = per_location.entry(entry.recording.location).or_insert(0);
        if *count < location_cap {
            *count += 1;
            taken[idx] = true;
            admitted.push(idx);
        }
    }

    // Backfill pass: top up from the sorted list regardless of location.
    if admitted.len() < limit {
        for idx in 0..scored.len() {
            if admitted.len() == limit {
                break;
            }
            if !taken[idx] {
                taken[idx] = true;
                admitted.push(idx);
            }
        }
    }

    let mut slots: Vec<Option<TrendingEntry>> = scored.into_iter().map(Some).collect();
    admitted
        .into_iter()
        .map(|idx| slots[idx].take().expect("each index admitted once"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: &str, y: i32, m: u32, d: u32, location: Location) -> Recording {
        Recording {
            id: id.to_string(),
            short_id: format!("s-{id}"),
            slug: format!("slug-{id}"),
            title: format!("Talk {id}"),
            description: None,
            speakers: vec![],
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            tags: vec![],
            location,
            episode: None,
            episode_number: None,
            feature_hero_thumbnail: false,
        }
    }

    fn now() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
    }

    fn likes(pairs: &[(&str, u64)]) -> LikeCounts {
        pairs.iter().map(|(id, n)| (id.to_string(), *n)).collect()
    }

    #[test]
    fn test_orders_by_score_then_date() {
        let cat = Catalog::from_records(vec![
            rec("old-liked", 2023, 1, 1, Location::Amsterdam),
            rec("fresh", 2024, 12, 20, Location::Utrecht),
            rec("fresh-older", 2024, 12, 10, Location::Utrecht),
        ]);
        // old-liked: 5*3 + 0 = 15; fresh: 10; fresh-older: 10.
        let result = trending_recordings(&cat, &likes(&[("old-liked", 5)]), now(), 6);

        let ids: Vec<&str> = result.iter().map(|e| e.recording.id.as_str()).collect();
        assert_eq!(ids, vec!["old-liked", "fresh", "fresh-older"]);
        assert_eq!(result[0].trending_score, 15);
        assert_eq!(result[0].like_count, 5);
    }

    #[test]
    fn test_missing_like_counts_default_to_zero() {
        let cat = Catalog::from_records(vec![rec("a", 2024, 12, 20, Location::Amsterdam)]);
        let result = trending_recordings(&cat, &LikeCounts::new(), now(), 3);
        assert_eq!(result[0].like_count, 0);
        assert_eq!(result[0].trending_score, 10);
    }

    #[test]
    fn test_location_cap_limits_diversity_pass() {
        // Six high-scoring Amsterdam talks, two Utrecht stragglers.
        let mut records = Vec::new();
        for i in 0..6 {
            records.push(rec(&format!("ams-{i}"), 2024, 12, 20 - i as u32, Location::Amsterdam));
        }
        records.push(rec("utr-0", 2024, 1, 2, Location::Utrecht));
        records.push(rec("utr-1", 2024, 1, 1, Location::Utrecht));

        let result = trending_recordings(&cat_of(records), &LikeCounts::new(), now(), 6);

        let ams = result
            .iter()
            .take(5)
            .filter(|e| e.recording.location == Location::Amsterdam)
            .count();
        // Diversity pass admits 3 Amsterdam + 2 Utrecht = 5; the sixth slot
        // backfills with the best skipped Amsterdam talk.
        assert_eq!(result.len(), 6);
        assert_eq!(ams, 3);
        assert_eq!(result[5].recording.location, Location::Amsterdam);
    }

    fn cat_of(records: Vec<Recording>) -> Catalog {
        Catalog::from_records(records)
    }

    #[test]
    fn test_backfill_preserves_sorted_order_within_passes() {
        let mut records = Vec::new();
        for i in 0..5 {
            records.push(rec(&format!("ams-{i}"), 2024, 12, 20 - i as u32, Location::Amsterdam));
        }
        let result = trending_recordings(&cat_of(records), &LikeCounts::new(), now(), 4);

        // Cap is 2, so diversity admits ams-0 and ams-1; backfill appends
        // ams-2 and ams-3 in sorted order.
        let ids: Vec<&str> = result.iter().map(|e| e.recording.id.as_str()).collect();
        assert_eq!(ids, vec!["ams-0", "ams-1", "ams-2", "ams-3"]);
    }

    #[test]
    fn test_scores_non_increasing_within_diversity_prefix() {
        let cat = Catalog::from_records(vec![
            rec("a", 2024, 12, 20, Location::Amsterdam),
            rec("b", 2024, 10, 1, Location::Utrecht),
            rec("c", 2024, 3, 1, Location::Amsterdam),
            rec("d", 2023, 1, 1, Location::Utrecht),
        ]);
        let result = trending_recordings(&cat, &likes(&[("b", 2), ("d", 1)]), now(), 4);

        for pair in result.windows(2) {
            assert!(pair[0].trending_score >= pair[1].trending_score);
        }
    }

    #[test]
    fn test_zero_limit_and_oversized_limit() {
        let cat = Catalog::from_records(vec![
            rec("a", 2024, 12, 20, Location::Amsterdam),
            rec("b", 2024, 12, 10, Location::Amsterdam),
        ]);
        assert!(trending_recordings(&cat, &LikeCounts::new(), now(), 0).is_empty());

        let all = trending_recordings(&cat, &LikeCounts::new(), now(), 100);
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_hero_thumbnail_breaks_even_recency() {
        let mut plain = rec("plain", 2024, 12, 20, Location::Amsterdam);
        plain.date = NaiveDate::from_ymd_opt(2024, 12, 20).unwrap();
        let mut hero = rec("hero", 2024, 12, 19, Location::Amsterdam);
        hero.feature_hero_thumbnail = true;

        let cat = Catalog::from_records(vec![plain, hero]);
        let result = trending_recordings(&cat, &LikeCounts::new(), now(), 2);

        assert_eq!(result[0].recording.id, "hero");
        assert_eq!(result[0].trending_score, 13);
    }
}
