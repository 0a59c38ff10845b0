//! Configuration system for the cache hierarchy simulator.
//!
//! This module defines the structures and enums that parameterize a run.
//! It provides:
//! 1. **Defaults:** The baseline three-level geometry used when fields are
//!    not overridden.
//! 2. **Structures:** Per-level cache parameters and the hierarchy root.
//! 3. **Enums:** Dead-block predictor policy and prefetch mechanism
//!    selection.
//!
//! Configuration is supplied via JSON (a file passed to the CLI, or any
//! string handed to `serde_json`); `Config::default()` reproduces the
//! baseline geometry with no file at all.

use serde::Deserialize;

/// Default configuration constants for the simulator.
///
/// These values define the baseline hierarchy geometry when not explicitly
/// overridden in a JSON configuration file.
mod defaults {
    /// Default L1 capacity in KiB (instruction and data caches alike).
    pub const L1_SIZE_KB: u64 = 64;

    /// Default L2 capacity in KiB (1 MiB shared).
    pub const L2_SIZE_KB: u64 = 1024;

    /// Default block size in bytes at every level.
    ///
    /// Matches typical modern processor cache line sizes.
    pub const BLOCK_BYTES: u64 = 64;

    /// Default L1 associativity.
    pub const L1_WAYS: usize = 4;

    /// Default L2 associativity.
    pub const L2_WAYS: usize = 16;
}

/// Dead-block predictor policy for one cache level.
///
/// Selects which signal the level uses to decide a resident block has
/// finished its useful life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum DeadBlockPolicy {
    /// Folded program-counter digests compared across residencies,
    /// evaluated at burst boundaries. The natural choice for L1 caches.
    #[default]
    Trace,
    /// Per-residency reference counts compared across residencies,
    /// evaluated on every hit. The natural choice for a shared L2.
    #[serde(alias = "Refcount")]
    RefCount,
}

/// Prefetch mechanism for one cache level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Prefetcher {
    /// No prefetching at this level.
    None,
    /// Tag-correlating prefetcher: predicts the next miss tag from the two
    /// preceding miss tags in the same set, inserting only into
    /// dead-predicted slots.
    #[default]
    #[serde(alias = "TCP")]
    TagCorrelating,
}

/// Geometry and policy selection for one cache level.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Total capacity in KiB.
    #[serde(default = "CacheConfig::default_size_kb")]
    pub size_kb: u64,

    /// Block size in bytes; must be a power of two.
    #[serde(default = "CacheConfig::default_block_bytes")]
    pub block_bytes: u64,

    /// Associativity (blocks per set).
    #[serde(default = "CacheConfig::default_ways")]
    pub ways: usize,

    /// Dead-block predictor policy.
    #[serde(default)]
    pub dbp: DeadBlockPolicy,

    /// Prefetch mechanism.
    #[serde(default)]
    pub prefetcher: Prefetcher,
}

impl CacheConfig {
    /// Returns the default per-level capacity in KiB.
    fn default_size_kb() -> u64 {
        defaults::L1_SIZE_KB
    }

    /// Returns the default block size in bytes.
    fn default_block_bytes() -> u64 {
        defaults::BLOCK_BYTES
    }

    /// Returns the default associativity.
    fn default_ways() -> usize {
        defaults::L1_WAYS
    }
}

impl Default for CacheConfig {
    /// The baseline L1 shape: 64 KiB, 64 B blocks, 4-way, trace-policy
    /// dead-block prediction, tag-correlating prefetch.
    fn default() -> Self {
        Self {
            size_kb: defaults::L1_SIZE_KB,
            block_bytes: defaults::BLOCK_BYTES,
            ways: defaults::L1_WAYS,
            dbp: DeadBlockPolicy::Trace,
            prefetcher: Prefetcher::TagCorrelating,
        }
    }
}

/// Root configuration: one entry per level of the standard three-level
/// hierarchy (split L1 over a shared L2).
///
/// # Examples
///
/// Creating a default configuration:
///
/// ```
/// use dbpsim_core::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.l1_d.size_kb, 64);
/// assert_eq!(config.l2.size_kb, 1024);
/// assert_eq!(config.l2.ways, 16);
/// ```
///
/// Deserializing from JSON; absent fields keep their defaults:
///
/// ```
/// use dbpsim_core::config::{Config, DeadBlockPolicy, Prefetcher};
///
/// let json = r#"{
///     "l1_d": { "size_kb": 32, "ways": 8 },
///     "l2":   { "size_kb": 512, "ways": 8, "dbp": "RefCount" }
/// }"#;
///
/// let config: Config = serde_json::from_str(json).unwrap();
/// assert_eq!(config.l1_d.size_kb, 32);
/// assert_eq!(config.l1_d.ways, 8);
/// assert_eq!(config.l1_i.size_kb, 64);
/// assert_eq!(config.l2.dbp, DeadBlockPolicy::RefCount);
/// assert_eq!(config.l2.prefetcher, Prefetcher::TagCorrelating);
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// L1 instruction cache.
    #[serde(default, alias = "l1i")]
    pub l1_i: CacheConfig,

    /// L1 data cache.
    #[serde(default, alias = "l1d")]
    pub l1_d: CacheConfig,

    /// Shared L2 cache, parent of both L1s.
    #[serde(default = "Config::default_l2")]
    pub l2: CacheConfig,
}

impl Config {
    /// The baseline L2 shape: 1 MiB, 64 B blocks, 16-way, reference-count
    /// dead-block prediction, tag-correlating prefetch.
    fn default_l2() -> CacheConfig {
        CacheConfig {
            size_kb: defaults::L2_SIZE_KB,
            block_bytes: defaults::BLOCK_BYTES,
            ways: defaults::L2_WAYS,
            dbp: DeadBlockPolicy::RefCount,
            prefetcher: Prefetcher::TagCorrelating,
        }
    }

    /// Disables prefetching at every level, leaving geometry untouched.
    pub fn disable_prefetch(&mut self) {
        self.l1_i.prefetcher = Prefetcher::None;
        self.l1_d.prefetcher = Prefetcher::None;
        self.l2.prefetcher = Prefetcher::None;
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            l1_i: CacheConfig::default(),
            l1_d: CacheConfig::default(),
            l2: Self::default_l2(),
        }
    }
}
