//! Ranking Module
//!
//! Computes the two catalog orderings the site renders:
//!
//! 1. **Related** - a small, diverse set of recordings related to an anchor
//!    talk, for the "you might also like" strip on a recording page.
//! 2. **Trending** - a global ordering of the catalog blending like counts
//!    with recency and editorial-feature signals, with a per-location cap so
//!    one city cannot dominate the front page.
//!
//! ## Algorithm Overview
//!
//! Related selection runs in three phases:
//! - Pick a candidate pool by the best available match type (shared tags,
//!   then shared speakers, then same episode, then same location).
//! - Pick the single strongest match first ("next up").
//! - Greedily fill the remaining slots, penalizing overlap with what was
//!   already picked and never repeating an episode.
//!
//! Trending scores every recording (`likes x 3` + tiered recency bonus +
//! featured-artwork bonus), sorts, then admits under the location cap with a
//! backfill pass for whatever the cap excluded.
//!
//! Everything here is pure and deterministic: identical inputs always yield
//! identical ordered output. The selectors allocate only local working state,
//! so concurrent calls over the shared catalog snapshot need no locking.

pub mod related;
pub mod score;
pub mod trending;

pub use related::{related_recordings, DEFAULT_RELATED_LIMIT};
pub use trending::{trending_recordings, TrendingEntry, DEFAULT_TRENDING_LIMIT};
