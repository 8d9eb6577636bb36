//! Scoring primitives
//!
//! Pure functions behind both selectors. All scores are integer sums of
//! weighted match counts and tiered recency bonuses; no floats, no clock
//! reads (the trending `now` is passed in by the caller).

use chrono::NaiveDate;

use crate::catalog::Recording;

/// Weight per shared tag, capped at [`MAX_TAG_MATCHES`] matches.
pub const TAG_WEIGHT: i64 = 3;
pub const MAX_TAG_MATCHES: usize = 3;

/// Weight per shared speaker, capped at [`MAX_SPEAKER_MATCHES`] matches.
pub const SPEAKER_WEIGHT: i64 = 4;
pub const MAX_SPEAKER_MATCHES: usize = 2;

/// Bonus when both recordings belong to the same non-empty episode.
pub const EPISODE_BONUS: i64 = 6;

/// Bonus when the candidate was recorded at the anchor's location.
pub const LOCATION_BONUS: i64 = 2;

/// Weight per like in the trending score.
pub const LIKE_WEIGHT: i64 = 3;

/// Bonus for editorially-featured hero artwork.
pub const HERO_BONUS: i64 = 3;

/// Number of distinct tags two recordings share. Tags are already
/// lowercased and deduplicated at catalog construction.
pub fn shared_tag_count(a: &Recording, b: &Recording) -> usize {
    b.tags.iter().filter(|tag| a.tags.contains(tag)).count()
}

/// Number of speakers two recordings share, compared case-insensitively.
pub fn shared_speaker_count(a: &Recording, b: &Recording) -> usize {
    let ours: Vec<String> = a.speakers.iter().map(|s| s.to_lowercase()).collect();
    b.speakers
        .iter()
        .filter(|s| ours.contains(&s.to_lowercase()))
        .count()
}

/// True when both recordings carry the same non-empty episode identifier.
pub fn same_episode(a: &Recording, b: &Recording) -> bool {
    matches!(
        (a.episode_key(), b.episode_key()),
        (Some(x), Some(y)) if x == y
    )
}

/// Relevance of `candidate` when viewed from `anchor`.
///
/// Sum of capped tag and speaker matches, episode and location bonuses, and
/// a recency bonus relative to the anchor's own date. A candidate newer than
/// the anchor clamps to zero days, i.e. the most-recent tier.
pub fn relevance_score(anchor: &Recording, candidate: &Recording) -> i64 {
    let tag_matches = shared_tag_count(anchor, candidate).min(MAX_TAG_MATCHES) as i64;
    let speaker_matches = shared_speaker_count(anchor, candidate).min(MAX_SPEAKER_MATCHES) as i64;

    let mut score = TAG_WEIGHT * tag_matches + SPEAKER_WEIGHT * speaker_matches;

    if same_episode(anchor, candidate) {
        score += EPISODE_BONUS;
    }
    if candidate.location == anchor.location {
        score += LOCATION_BONUS;
    }

    score += anchor_recency_bonus(anchor.date, candidate.date);
    score
}

/// Recency bonus tiers for the related selector, measured against the
/// anchor's date rather than the wall clock.
fn anchor_recency_bonus(anchor_date: NaiveDate, candidate_date: NaiveDate) -> i64 {
    let days = (anchor_date - candidate_date).num_days().max(0);
    if days <= 90 {
        2
    } else if days <= 180 {
        1
    } else {
        0
    }
}

/// Trending score: popularity (likes), recency against `now`, and the
/// editorial hero-artwork flag. Recordings dated in the future land in the
/// freshest tier.
pub fn trending_score(recording: &Recording, like_count: u64, now: NaiveDate) -> i64 {
    let mut score = like_count as i64 * LIKE_WEIGHT;

    let days = (now - recording.date).num_days();
    score += if days <= 30 {
        10
    } else if days <= 90 {
        7
    } else if days <= 180 {
        4
    } else if days <= 365 {
        2
    } else {
        0
    };

    if recording.feature_hero_thumbnail {
        score += HERO_BONUS;
    }

    score
}
