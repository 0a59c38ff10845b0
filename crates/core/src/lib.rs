//! Trace-driven cache hierarchy simulator library.
//!
//! This crate models a multi-level set-associative cache hierarchy with the following:
//! 1. **Cache:** LRU set-associative levels with write-back eviction and per-level counters.
//! 2. **Dead-block prediction:** Trace-digest and reference-count policies marking blocks dead in place.
//! 3. **Prefetch:** A tag-correlating prefetcher that fills predicted-dead blocks speculatively.
//! 4. **Hierarchy:** An arena of levels wired child-to-parent, propagating misses and write-backs.
//! 5. **Simulation:** Trace parsing, the top-level simulator, and statistics reporting.

/// Cache levels, block state, and dead-block predictors.
pub mod cache;
/// Common types (address arithmetic, errors).
pub mod common;
/// Simulator configuration (defaults, enums, per-level settings).
pub mod config;
/// The multi-level arena and access propagation.
pub mod hierarchy;
/// Speculative block installation policies.
pub mod prefetch;
/// Trace parsing and the top-level simulator.
pub mod sim;
/// Counter collection and reporting.
pub mod stats;

/// Per-level cache model; usually driven through [`Hierarchy`].
pub use crate::cache::CacheLevel;
/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Level arena plus the handles used to address levels inside it.
pub use crate::hierarchy::{Hierarchy, LevelId};
/// Top-level simulator; construct with `Simulator::new`.
pub use crate::sim::Simulator;
/// Counter snapshots for one level and for the whole hierarchy.
pub use crate::stats::{CacheStats, HierarchyStats};
