//! Recording catalog
//!
//! Immutable, date-descending snapshot of every recorded talk plus the
//! compute-once store that guards its construction. The ranking selectors
//! only ever read from a finished snapshot; if the source data changes the
//! whole snapshot is replaced (process restart), never edited in place.

use chrono::NaiveDate;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::error::{Error, Result};

/// Venue a talk was recorded at.
///
/// The series currently runs in exactly two cities. The trending diversity
/// cap (`ceil(limit/2)` per location) leans on there being two of these, so
/// the enum deliberately does not generalize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    Amsterdam,
    Utrecht,
}

/// A single recorded talk. Immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recording {
    /// Stable source video id, unique across the catalog.
    pub id: String,
    /// Short unique identifier used in URLs.
    pub short_id: String,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Speaker display names, in billing order.
    pub speakers: Vec<String>,
    /// Calendar date of the talk; nothing finer than day granularity.
    pub date: NaiveDate,
    /// Lowercased, deduplicated, no empty strings.
    #[serde(default)]
    pub tags: Vec<String>,
    pub location: Location,
    #[serde(default)]
    pub episode: Option<String>,
    #[serde(default)]
    pub episode_number: Option<u32>,
    /// Editorially-featured artwork flag; feeds the trending score.
    #[serde(default)]
    pub feature_hero_thumbnail: bool,
}

impl Recording {
    /// Episode identifier, treating empty strings as absent.
    pub fn episode_key(&self) -> Option<&str> {
        self.episode.as_deref().filter(|e| !e.is_empty())
    }
}

/// The full catalog: deduplicated, sorted by date descending at
/// construction and never re-sorted afterwards.
#[derive(Debug, Clone)]
pub struct Catalog {
    recordings: Vec<Recording>,
}

impl Catalog {
    /// Build a catalog from raw loader output, enforcing the input contract:
    /// duplicates by id are dropped (first occurrence wins), tags are
    /// lowercased with empties and duplicates removed, and the result is
    /// stable-sorted by date descending.
    pub fn from_records(records: Vec<Recording>) -> Self {
        let mut seen_ids: HashSet<String> = HashSet::with_capacity(records.len());
        let mut recordings: Vec<Recording> = Vec::with_capacity(records.len());

        for mut rec in records {
            if !seen_ids.insert(rec.id.clone()) {
                continue;
            }

            let mut tags: Vec<String> = Vec::with_capacity(rec.tags.len());
            let mut seen_tags: HashSet<String> = HashSet::with_capacity(rec.tags.len());
            for tag in rec.tags.drain(..) {
                let tag = tag.trim().to_lowercase();
                if tag.is_empty() {
                    continue;
                }
                if seen_tags.insert(tag.clone()) {
                    tags.push(tag);
                }
            }
            rec.tags = tags;

            recordings.push(rec);
        }

        recordings.sort_by(|a, b| b.date.cmp(&a.date));

        Self { recordings }
    }

    /// All recordings, newest first.
    pub fn recordings(&self) -> &[Recording] {
        &self.recordings
    }

    pub fn len(&self) -> usize {
        self.recordings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recordings.is_empty()
    }

    // Linear scans are fine here: the catalog tops out in the hundreds.

    pub fn by_slug(&self, slug: &str) -> Option<&Recording> {
        self.recordings.iter().find(|r| r.slug == slug)
    }

    pub fn by_short_id(&self, short_id: &str) -> Option<&Recording> {
        self.recordings.iter().find(|r| r.short_id == short_id)
    }

    pub fn by_id(&self, id: &str) -> Option<&Recording> {
        self.recordings.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id(id).is_some()
    }
}

/// Compute-once holder for the catalog snapshot.
///
/// The first caller of [`CatalogStore::get_or_load`] runs the loader;
/// concurrent first callers block until the snapshot is complete and then
/// all observe the same `Arc`. The loader runs at most once per process
/// lifetime.
#[derive(Debug, Default)]
pub struct CatalogStore {
    cell: OnceCell<Arc<Catalog>>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// Return the memoized catalog, constructing it via `loader` on first
    /// access. A failed load is not memoized, so a later call may retry.
    pub fn get_or_load<F>(&self, loader: F) -> Result<Arc<Catalog>>
    where
        F: FnOnce() -> Result<Vec<Recording>>,
    {
        let catalog = self.cell.get_or_try_init(|| {
            let records = loader()?;
            let catalog = Catalog::from_records(records);
            info!("Catalog loaded: {} recordings", catalog.len());
            Ok::<_, Error>(Arc::new(catalog))
        })?;
        Ok(Arc::clone(catalog))
    }

    /// The snapshot, if it has already been built.
    pub fn get(&self) -> Option<Arc<Catalog>> {
        self.cell.get().cloned()
    }
}

/// Read raw recordings from a JSON file. This is the thin end of the
/// external loader contract; [`Catalog::from_records`] re-enforces the
/// invariants rather than trusting the file.
pub fn load_records_from_path(path: &Path) -> Result<Vec<Recording>> {
    let raw = std::fs::read_to_string(path).map_err(|e| Error::Catalog {
        message: format!("failed to read catalog file {}: {}", path.display(), e).into(),
    })?;
    let records: Vec<Recording> = serde_json::from_str(&raw).map_err(|e| Error::Catalog {
        message: format!("failed to parse catalog file {}: {}", path.display(), e).into(),
    })?;
    Ok(records)
}
