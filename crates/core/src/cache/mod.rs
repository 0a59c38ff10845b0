//! Set-Associative Cache Level.
//!
//! This module implements one level of the simulated cache hierarchy: an
//! array of bounded LRU sets over tag-only blocks, instrumented with a
//! dead-block predictor and an optional tag-correlating prefetcher. It
//! models hits, misses, evictions and write-backs; no data contents are
//! carried, only addresses and per-block state bits.

/// Dead-block prediction policies (trace-based, reference-count).
pub mod dbp;

use std::collections::VecDeque;
use std::fmt;

use tracing::trace;

use self::dbp::{Candidate, DeadBlockPredictor, RefCountPredictor, TracePredictor};
use crate::common::addr::AddressLayout;
use crate::common::error::ConfigError;
use crate::config::{CacheConfig, DeadBlockPolicy, Prefetcher};
use crate::hierarchy::LevelId;
use crate::prefetch::TagCorrelatingPrefetcher;
use crate::stats::CacheStats;

/// One resident block: a tag plus the state bits the predictors feed on.
#[derive(Clone, Debug)]
struct Block {
    tag: u64,
    dirty: bool,
    predicted_dead: bool,
    prefetched: bool,
    referenced: bool,
    reference_count: u32,
}

impl Block {
    /// A freshly fetched block. The inserting access itself does not count
    /// as a reference.
    fn new(tag: u64, is_write: bool) -> Self {
        Self {
            tag,
            dirty: is_write,
            predicted_dead: false,
            prefetched: false,
            referenced: false,
            reference_count: 0,
        }
    }

    /// A speculatively inserted block, clean and unreferenced.
    fn speculative(tag: u64) -> Self {
        Self {
            tag,
            dirty: false,
            predicted_dead: false,
            prefetched: true,
            referenced: false,
            reference_count: 0,
        }
    }

    fn status(&self) -> BlockStatus {
        BlockStatus {
            dirty: self.dirty,
            predicted_dead: self.predicted_dead,
            prefetched: self.prefetched,
            referenced: self.referenced,
            reference_count: self.reference_count,
        }
    }
}

/// Read-only snapshot of a resident block's state bits.
///
/// Returned by [`CacheLevel::peek`] so drivers and tests can observe the
/// block lifecycle without reaching into set internals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockStatus {
    /// Written since fetch; the hit path assigns the most recent access's
    /// write flag.
    pub dirty: bool,
    /// Flagged dead by the level's predictor.
    pub predicted_dead: bool,
    /// Inserted speculatively by the prefetcher.
    pub prefetched: bool,
    /// Touched at least once since insertion.
    pub referenced: bool,
    /// References since insertion (the inserting miss not included).
    pub reference_count: u32,
}

/// What one level-local access did; the hierarchy drives propagation from
/// this.
#[derive(Clone, Copy, Debug)]
pub(crate) struct AccessOutcome {
    /// Whether the block was resident.
    pub hit: bool,
    /// Base address of an evicted dirty block that must be written back to
    /// the parent level.
    pub writeback: Option<u64>,
}

/// One level of the cache hierarchy.
///
/// Owns its sets, its dead-block predictor table and (when enabled) its
/// prefetcher table; independent hierarchies in one process never share
/// state. Each set is kept in LRU order, front least recent, back most
/// recent, holding at most `ways` blocks with distinct tags.
pub struct CacheLevel {
    layout: AddressLayout,
    sets: Vec<VecDeque<Block>>,
    ways: usize,
    parent: Option<LevelId>,
    dbp: Box<dyn DeadBlockPredictor>,
    prefetcher: Option<TagCorrelatingPrefetcher>,
    stats: CacheStats,
}

impl CacheLevel {
    /// Builds a level from its configuration.
    ///
    /// Geometry: number of sets = (total size / block size) / ways. The
    /// block size must be a power of two; the combination must leave at
    /// least one set.
    pub(crate) fn new(config: &CacheConfig, parent: Option<LevelId>) -> Result<Self, ConfigError> {
        if !config.block_bytes.is_power_of_two() {
            return Err(ConfigError::BlockSize(config.block_bytes));
        }
        if config.ways == 0 {
            return Err(ConfigError::ZeroWays);
        }
        let num_blocks = (config.size_kb * 1024) / config.block_bytes;
        let num_sets = num_blocks / config.ways as u64;
        if num_sets == 0 {
            return Err(ConfigError::NoSets {
                size_kb: config.size_kb,
                block_bytes: config.block_bytes,
                ways: config.ways as u64,
            });
        }

        let dbp: Box<dyn DeadBlockPredictor> = match config.dbp {
            DeadBlockPolicy::Trace => Box::new(TracePredictor::new()),
            DeadBlockPolicy::RefCount => Box::new(RefCountPredictor::new()),
        };

        let prefetcher = match config.prefetcher {
            Prefetcher::TagCorrelating => Some(TagCorrelatingPrefetcher::new(num_sets as usize)),
            Prefetcher::None => None,
        };

        Ok(Self {
            layout: AddressLayout::new(config.block_bytes, num_sets),
            sets: vec![VecDeque::new(); num_sets as usize],
            ways: config.ways,
            parent,
            dbp,
            prefetcher,
            stats: CacheStats::default(),
        })
    }

    /// The level this one misses and writes back to, if any.
    pub(crate) fn parent(&self) -> Option<LevelId> {
        self.parent
    }

    /// Runs the level-local part of an access: classification, lookup, the
    /// hit or miss path including eviction. Parent propagation and the
    /// prefetch attempt are driven by the hierarchy from the returned
    /// outcome.
    pub(crate) fn access(&mut self, addr: u64, pc: u64, is_write: bool) -> AccessOutcome {
        if is_write {
            self.stats.writes += 1;
        } else {
            self.stats.reads += 1;
        }

        let set_index = self.layout.set_index(addr) as usize;
        let tag = self.layout.tag(addr);
        if set_index >= self.sets.len() {
            // Reachable only with a non-power-of-two set count, where the
            // index mask covers more sets than exist. That is a broken
            // configuration, not a recoverable condition.
            panic!(
                "set index {set_index} out of range for {} sets \
                 (offset bits {}, index bits {}, tag {tag:#x})",
                self.sets.len(),
                self.layout.block_offset_bits(),
                self.layout.set_index_bits(),
            );
        }
        debug_assert!(self.sets[set_index].len() <= self.ways);

        let hit_pos = self.sets[set_index].iter().position(|b| b.tag == tag);
        match hit_pos {
            Some(pos) => {
                self.hit(set_index, pos, tag, pc, is_write);
                AccessOutcome {
                    hit: true,
                    writeback: None,
                }
            }
            None => {
                let writeback = self.miss(set_index, tag, is_write);
                AccessOutcome {
                    hit: false,
                    writeback,
                }
            }
        }
    }

    /// Hit path: reference bookkeeping, misprediction clearing, dead-block
    /// evaluation, LRU touch.
    fn hit(&mut self, set_index: usize, pos: usize, tag: u64, pc: u64, is_write: bool) {
        let mru_pos = self.sets[set_index].len() - 1;
        // A hit extends the current burst iff the block was already the
        // most recently used one. Tags are unique per set, so comparing
        // positions is comparing blocks.
        let burst_boundary = pos != mru_pos;
        let block_addr = self.layout.block_addr(tag, set_index as u64);

        let block = &mut self.sets[set_index][pos];
        block.referenced = true;
        block.dirty = is_write;
        block.reference_count += 1;
        let live_refs = block.reference_count;
        if block.predicted_dead {
            // The predictor wrote this block off and it came back: clear
            // the flag before any new prediction can fire for it.
            block.predicted_dead = false;
            self.stats.mispredictions += 1;
            trace!("misprediction on {block_addr:#x}");
        }

        match self.dbp.observe_hit(block_addr, pc, burst_boundary) {
            Some(Candidate::HitBlock) => {
                if self.dbp.predict(block_addr, live_refs) {
                    self.sets[set_index][pos].predicted_dead = true;
                    self.stats.dead_predictions += 1;
                    trace!("predicted dead: {block_addr:#x}");
                }
            }
            Some(Candidate::DemotedBlock) if burst_boundary => {
                let (demoted_addr, demoted_refs) = {
                    let demoted = &self.sets[set_index][mru_pos];
                    (
                        self.layout.block_addr(demoted.tag, set_index as u64),
                        demoted.reference_count,
                    )
                };
                if self.dbp.predict(demoted_addr, demoted_refs) {
                    self.sets[set_index][mru_pos].predicted_dead = true;
                    self.stats.dead_predictions += 1;
                    trace!("predicted dead: {demoted_addr:#x}");
                }
            }
            _ => {}
        }

        if let Some(block) = self.sets[set_index].remove(pos) {
            self.sets[set_index].push_back(block);
        }
    }

    /// Miss path: predictor/prefetcher table updates, fill, eviction.
    /// Returns the evicted dirty block's base address, if any.
    fn miss(&mut self, set_index: usize, tag: u64, is_write: bool) -> Option<u64> {
        self.stats.misses += 1;
        let block_addr = self.layout.block_addr(tag, set_index as u64);
        self.dbp.update_on_miss(block_addr);
        if let Some(prefetcher) = self.prefetcher.as_mut() {
            prefetcher.observe_miss(set_index, tag);
        }

        let mut writeback = None;
        if self.sets[set_index].len() >= self.ways {
            if let Some(victim) = self.sets[set_index].pop_front() {
                let victim_addr = self.layout.block_addr(victim.tag, set_index as u64);
                if victim.prefetched && !victim.referenced {
                    self.stats.useless_prefetches += 1;
                }
                self.dbp
                    .update_on_eviction(victim_addr, victim.reference_count);
                self.stats.evictions += 1;
                if victim.dirty {
                    writeback = Some(victim_addr);
                }
                trace!(
                    "evict {victim_addr:#x} (dirty={}, refs={})",
                    victim.dirty, victim.reference_count
                );
            }
        }
        self.sets[set_index].push_back(Block::new(tag, is_write));
        writeback
    }

    /// Attempts one tag-correlated prefetch into the set `addr` maps to.
    ///
    /// Runs after the miss that triggered it has fully propagated. The
    /// candidate is dropped unless the set holds a dead-predicted block to
    /// overwrite; live blocks are never displaced. The overwrite keeps the
    /// victim's LRU position, is not an eviction (no write-back, no
    /// finalization) and seeds the candidate's predictor entry as a fresh
    /// miss would.
    pub(crate) fn prefetch_attempt(&mut self, addr: u64) {
        let set_index = self.layout.set_index(addr) as usize;
        let Some(candidate) = self
            .prefetcher
            .as_ref()
            .and_then(|p| p.candidate(set_index))
        else {
            return;
        };
        // A candidate already resident would duplicate a tag in the set.
        if self.sets[set_index].iter().any(|b| b.tag == candidate) {
            return;
        }
        let Some(pos) = self.sets[set_index].iter().position(|b| b.predicted_dead) else {
            return;
        };
        self.sets[set_index][pos] = Block::speculative(candidate);
        let candidate_addr = self.layout.block_addr(candidate, set_index as u64);
        self.dbp.update_on_miss(candidate_addr);
        self.stats.prefetches += 1;
        trace!("prefetch {candidate_addr:#x} into slot {pos}");
    }

    /// Counter snapshot for this level.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Whether the block holding `addr` is resident.
    pub fn contains(&self, addr: u64) -> bool {
        self.peek(addr).is_some()
    }

    /// Non-mutating probe: the state bits of the block holding `addr`, if
    /// resident. Does not touch LRU order or any counter.
    pub fn peek(&self, addr: u64) -> Option<BlockStatus> {
        let set_index = self.layout.set_index(addr) as usize;
        let tag = self.layout.tag(addr);
        self.sets
            .get(set_index)?
            .iter()
            .find(|b| b.tag == tag)
            .map(Block::status)
    }

    /// Number of sets in this level.
    pub fn num_sets(&self) -> usize {
        self.sets.len()
    }

    /// Associativity of this level.
    pub fn ways(&self) -> usize {
        self.ways
    }

    /// The address layout this level decodes with.
    pub fn layout(&self) -> AddressLayout {
        self.layout
    }
}

impl fmt::Debug for CacheLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheLevel")
            .field("sets", &self.sets.len())
            .field("ways", &self.ways)
            .field("layout", &self.layout)
            .field("parent", &self.parent)
            .finish_non_exhaustive()
    }
}
