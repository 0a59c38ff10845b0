//! Reference-Count Dead-Block Prediction.
//!
//! Tracks, per block address, how many references the block received during
//! its previous residency. If two consecutive residencies closed with the
//! same count, the saturation bit is set and the block is predicted dead as
//! soon as the current residency reaches that count again.
//!
//! Unlike the trace policy there is no burst structure to exploit at deeper
//! cache levels, so evaluation happens on every hit against the hit block
//! itself.

use std::collections::HashMap;

use super::{Candidate, DeadBlockPredictor};

/// Per-address reference-count state across residencies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct RefCountEntry {
    /// Reference count the previous residency closed with.
    dead_count: u32,
    /// Set when the last two residencies closed with equal counts.
    saturated: bool,
}

/// Reference-count dead-block predictor state.
///
/// Entries are created lazily on first miss and persist for the run.
#[derive(Debug, Default)]
pub struct RefCountPredictor {
    entries: HashMap<u64, RefCountEntry>,
}

impl RefCountPredictor {
    /// Creates an empty predictor.
    pub fn new() -> Self {
        Self::default()
    }
}

impl DeadBlockPredictor for RefCountPredictor {
    /// Ensures an entry exists for the missed address.
    ///
    /// The live count restarts with the fresh block; the table keeps the
    /// previous residency's `dead_count` and saturation bit, which are the
    /// predictor's memory.
    fn update_on_miss(&mut self, block_addr: u64) {
        let _ = self.entries.entry(block_addr).or_default();
    }

    /// Nominates the hit block itself on every hit.
    fn observe_hit(
        &mut self,
        _block_addr: u64,
        _pc: u64,
        _burst_boundary: bool,
    ) -> Option<Candidate> {
        Some(Candidate::HitBlock)
    }

    /// A block is dead once its live reference count reaches the previous
    /// residency's count and the saturation bit is set.
    fn predict(&self, block_addr: u64, live_refs: u32) -> bool {
        self.entries
            .get(&block_addr)
            .is_some_and(|e| e.saturated && live_refs == e.dead_count)
    }

    /// Closes the residency: saturation is set iff the count repeated, and
    /// the closing count becomes the new reference.
    fn update_on_eviction(&mut self, block_addr: u64, live_refs: u32) {
        let entry = self.entries.entry(block_addr).or_default();
        entry.saturated = live_refs == entry.dead_count;
        entry.dead_count = live_refs;
    }
}
