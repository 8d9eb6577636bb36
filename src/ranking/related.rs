//! Related-recordings selector
//!
//! Given an anchor recording, selects a small, diverse, ordered set of other
//! recordings for the "you might also like" strip. Selection is two-staged:
//! the strongest match is picked first through a fixed tie-break cascade,
//! then the remaining slots are greedily filled while penalizing overlap
//! with what is already in the result.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::catalog::{Catalog, Recording};
use crate::ranking::score::{relevance_score, same_episode, shared_speaker_count, shared_tag_count};

/// Default slot count for the related strip.
pub const DEFAULT_RELATED_LIMIT: usize = 4;

/// Penalty weight per tag overlapping an already-picked recording.
const USED_TAG_PENALTY: i64 = 2;
/// Penalty weight per speaker overlapping an already-picked recording.
const USED_SPEAKER_PENALTY: i64 = 4;
/// Flat penalty in a tag-based pool for candidates sharing no tag.
const NO_TAG_MATCH_PENALTY: i64 = 4;

/// How the candidate pool was formed, in priority order. The first predicate
/// with at least one matching candidate wins; with no match at all the pool
/// is the full candidate set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PoolTier {
    SharedTags,
    SharedSpeakers,
    SameEpisode,
    SameLocation,
    Any,
}

/// Precomputed match features of one candidate against the anchor.
struct Candidate<'a> {
    recording: &'a Recording,
    shared_tags: usize,
    shared_speakers: usize,
    same_episode: bool,
    same_location: bool,
    score: i64,
}

impl<'a> Candidate<'a> {
    fn new(anchor: &Recording, recording: &'a Recording) -> Self {
        Self {
            recording,
            shared_tags: shared_tag_count(anchor, recording),
            shared_speakers: shared_speaker_count(anchor, recording),
            same_episode: same_episode(anchor, recording),
            same_location: recording.location == anchor.location,
            score: relevance_score(anchor, recording),
        }
    }

    fn in_tier(&self, tier: PoolTier) -> bool {
        match tier {
            PoolTier::SharedTags => self.shared_tags > 0,
            PoolTier::SharedSpeakers => self.shared_speakers > 0,
            PoolTier::SameEpisode => self.same_episode,
            PoolTier::SameLocation => self.same_location,
            PoolTier::Any => true,
        }
    }
}

/// Accumulated state of the greedy fill: everything the picks so far have
/// already covered. Updated after each pick.
#[derive(Debug, Default)]
struct UsedSets {
    episodes: HashSet<String>,
    speakers: HashSet<String>,
    tags: HashSet<String>,
    ids: HashSet<String>,
}

impl UsedSets {
    fn absorb(&mut self, recording: &Recording) {
        self.ids.insert(recording.id.clone());
        if let Some(episode) = recording.episode_key() {
            self.episodes.insert(episode.to_string());
        }
        for speaker in &recording.speakers {
            self.speakers.insert(speaker.to_lowercase());
        }
        for tag in &recording.tags {
            self.tags.insert(tag.clone());
        }
    }

    /// A candidate is eligible while it is unpicked and its episode (if any)
    /// has not appeared in the result yet.
    fn eligible(&self, recording: &Recording) -> bool {
        if self.ids.contains(&recording.id) {
            return false;
        }
        match recording.episode_key() {
            Some(episode) => !self.episodes.contains(episode),
            None => true,
        }
    }

    /// Redundancy with the picks so far: overlapping tags are cheap,
    /// overlapping speakers expensive.
    fn diversity_penalty(&self, recording: &Recording) -> i64 {
        let tag_overlap = recording
            .tags
            .iter()
            .filter(|tag| self.tags.contains(*tag))
            .count() as i64;
        let speaker_overlap = recording
            .speakers
            .iter()
            .filter(|s| self.speakers.contains(&s.to_lowercase()))
            .count() as i64;
        USED_TAG_PENALTY * tag_overlap + USED_SPEAKER_PENALTY * speaker_overlap
    }
}

/// Select up to `limit` recordings related to `anchor`, strongest first.
///
/// Deterministic for identical `(anchor, catalog, limit)`. Returns an empty
/// vector when the limit is zero or the anchor is not part of the catalog;
/// the rendering layer must always get a list, never an error. The result
/// may be shorter than `limit` when episode exclusivity exhausts the pool -
/// it is never padded with ineligible candidates.
pub fn related_recordings(anchor: &Recording, catalog: &Catalog, limit: usize) -> Vec<Recording> {
    if limit == 0 || !catalog.contains(&anchor.id) {
        return Vec::new();
    }

    let candidates: Vec<Candidate<'_>> = catalog
        .recordings()
        .iter()
        .filter(|r| r.id != anchor.id)
        .map(|r| Candidate::new(anchor, r))
        .collect();

    if candidates.is_empty() {
        return Vec::new();
    }

    let tier = pick_tier(&candidates);
    let pool: Vec<&Candidate<'_>> = candidates.iter().filter(|c| c.in_tier(tier)).collect();

    // The tier predicate guarantees a non-empty pool.
    let first = match pool.iter().copied().max_by(|a, b| first_pick_ordering(a, b)) {
        Some(candidate) => candidate,
        None => return Vec::new(),
    };

    let mut used = UsedSets::default();
    let mut picks: Vec<Recording> = Vec::with_capacity(limit.min(candidates.len()));
    used.absorb(first.recording);
    picks.push(first.recording.clone());

    // Fill from the pool first; once it is exhausted, widen to the full
    // candidate set (this is where the no-tag-match penalty bites).
    greedy_fill(&pool, tier, &mut used, &mut picks, limit);
    if picks.len() < limit && pool.len() < candidates.len() {
        let all: Vec<&Candidate<'_>> = candidates.iter().collect();
        greedy_fill(&all, tier, &mut used, &mut picks, limit);
    }

    picks
}

/// Repeatedly pick the eligible candidate with the best penalized score
/// until `limit` is reached or nothing eligible remains.
fn greedy_fill(
    candidates: &[&Candidate<'_>],
    tier: PoolTier,
    used: &mut UsedSets,
    picks: &mut Vec<Recording>,
    limit: usize,
) {
    while picks.len() < limit {
        let next = candidates
            .iter()
            .copied()
            .filter(|c| used.eligible(c.recording))
            .map(|c| (c, ranked_score(c, tier, used)))
            .max_by(|(a, score_a), (b, score_b)| {
                score_a
                    .cmp(score_b)
                    .then(a.recording.date.cmp(&b.recording.date))
                    .then_with(|| b.recording.title.cmp(&a.recording.title))
            });

        match next {
            Some((winner, _)) => {
                used.absorb(winner.recording);
                picks.push(winner.recording.clone());
            }
            None => break,
        }
    }
}

/// First predicate with at least one matching candidate wins.
fn pick_tier(candidates: &[Candidate<'_>]) -> PoolTier {
    for tier in [
        PoolTier::SharedTags,
        PoolTier::SharedSpeakers,
        PoolTier::SameEpisode,
        PoolTier::SameLocation,
    ] {
        if candidates.iter().any(|c| c.in_tier(tier)) {
            return tier;
        }
    }
    PoolTier::Any
}

/// Tie-break cascade for the "next up" slot: shared tags, shared speakers,
/// same episode, raw score, newer date, then title ascending. Location is
/// deliberately not an independent key here; it only participates through
/// the raw score.
fn first_pick_ordering(a: &Candidate<'_>, b: &Candidate<'_>) -> Ordering {
    a.shared_tags
        .cmp(&b.shared_tags)
        .then(a.shared_speakers.cmp(&b.shared_speakers))
        .then(a.same_episode.cmp(&b.same_episode))
        .then(a.score.cmp(&b.score))
        .then(a.recording.date.cmp(&b.recording.date))
        .then_with(|| b.recording.title.cmp(&a.recording.title))
}

/// Greedy-fill rank: base relevance minus redundancy with the picks so far,
/// minus a flat penalty in tag-based pools for candidates with no tag match.
fn ranked_score(candidate: &Candidate<'_>, tier: PoolTier, used: &UsedSets) -> i64 {
    let tag_penalty = if tier == PoolTier::SharedTags && candidate.shared_tags == 0 {
        NO_TAG_MATCH_PENALTY
    } else {
        0
    };
    candidate.score - used.diversity_penalty(candidate.recording) - tag_penalty
}
