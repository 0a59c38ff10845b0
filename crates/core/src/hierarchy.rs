//! Hierarchy assembly and access propagation.
//!
//! The hierarchy owns every cache level and hands out copyable [`LevelId`]
//! handles instead of references, which settles the parent-lifetime question
//! by construction:
//! 1. **Ownership:** All levels live in one arena for the whole run; a
//!    child stores only its parent's handle.
//! 2. **Construction order:** `add_level` refuses a parent handle that has
//!    not been added yet, so parents always outlive their children.
//! 3. **Propagation:** `access` runs the level-local algorithm, then the
//!    write-back of an evicted dirty block, then the original miss, then
//!    the level's prefetch attempt, recursing through parent handles.

use tracing::debug;

use crate::cache::CacheLevel;
use crate::common::error::ConfigError;
use crate::config::CacheConfig;

/// Handle to one level inside a [`Hierarchy`].
///
/// Only meaningful for the hierarchy that issued it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LevelId(usize);

impl LevelId {
    /// Position of this level in construction order.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0
    }
}

/// An assembled cache hierarchy: the arena of levels plus the recursive
/// access driver.
///
/// Every level owns its own predictor and prefetcher tables, so any number
/// of hierarchies can run independently in one process.
#[derive(Debug, Default)]
pub struct Hierarchy {
    levels: Vec<CacheLevel>,
}

impl Hierarchy {
    /// Creates an empty hierarchy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a level from `config` and wires it under `parent`.
    ///
    /// Levels must be added root-first: `parent` has to be a handle this
    /// hierarchy already issued.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] when the geometry is invalid or `parent` names a
    /// level that does not exist yet.
    pub fn add_level(
        &mut self,
        config: &CacheConfig,
        parent: Option<LevelId>,
    ) -> Result<LevelId, ConfigError> {
        if let Some(p) = parent {
            if p.0 >= self.levels.len() {
                return Err(ConfigError::UnknownParent(p.0));
            }
        }
        let level = CacheLevel::new(config, parent)?;
        let id = LevelId(self.levels.len());
        debug!(
            "level #{}: {} sets x {} ways, {} B blocks, parent {}",
            id.0,
            level.num_sets(),
            level.ways(),
            config.block_bytes,
            parent.map_or_else(|| String::from("none"), |p| format!("#{}", p.0)),
        );
        self.levels.push(level);
        Ok(id)
    }

    /// One memory reference against the named level.
    ///
    /// Runs the full per-access algorithm: the level-local lookup with its
    /// hit or miss path, then (on a miss with an eviction) the write-back
    /// of the dirty victim to the parent as a synthetic write, then the
    /// original miss recursively into the parent, and finally the level's
    /// own prefetch attempt. Everything completes before this returns;
    /// there is no queued work.
    ///
    /// # Panics
    ///
    /// On a set index outside the level's set array, which indicates an
    /// inconsistent geometry (see the configuration error section of the
    /// crate docs); and on a handle from a different hierarchy.
    pub fn access(&mut self, level: LevelId, addr: u64, pc: u64, is_write: bool) {
        let outcome = self.levels[level.0].access(addr, pc, is_write);
        let parent = self.levels[level.0].parent();
        if let Some(parent) = parent {
            if let Some(victim_addr) = outcome.writeback {
                self.access(parent, victim_addr, pc, true);
            }
            if !outcome.hit {
                self.access(parent, addr, pc, is_write);
            }
        }
        if !outcome.hit {
            self.levels[level.0].prefetch_attempt(addr);
        }
    }

    /// Read access to a level, for counters and probes.
    pub fn level(&self, id: LevelId) -> &CacheLevel {
        &self.levels[id.0]
    }

    /// Number of levels added so far.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Whether no levels have been added yet.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}
