//! Replay ranking engine library crate
//!
//! Re-exports core modules for integration tests and external use.

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod likes;
pub mod ranking;

// Re-export commonly used types
pub use catalog::{Catalog, CatalogStore, Location, Recording};
pub use config::Config;
pub use error::Result;
pub use likes::{HttpLikeProvider, LikeCounts};
pub use ranking::{related_recordings, trending_recordings, TrendingEntry};
