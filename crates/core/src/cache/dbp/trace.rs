//! Trace-Based Dead-Block Prediction.
//!
//! Tracks, per block address, a digest of the program counters that touched
//! the block during its current residency. A block whose digest at some
//! point equals the digest of its previous full residency has likely
//! finished its useful life; if the last two residencies also agreed with
//! each other (the confidence bit), the block is predicted dead.
//!
//! # Scheme
//!
//! - The digest is a running sum of PCs truncated to 30 bits, folded in once
//!   per burst rather than once per access: only a hit that starts a new
//!   burst contributes its PC.
//! - Eviction finalizes the residency: confidence is set iff the closing
//!   digest matches the previous one, the closing digest becomes the new
//!   reference, and the running digest resets.
//! - A fresh entry can never predict dead: confidence starts false and is
//!   only ever set at eviction time.

use std::collections::HashMap;

use super::{Candidate, DeadBlockPredictor};

/// Truncation mask for the folded-PC digest.
const TRACE_MASK: u64 = (1 << 30) - 1;

/// Per-address digest state across residencies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct TraceEntry {
    /// Digest accumulated during the current residency.
    current: u64,
    /// Digest the previous residency closed with.
    previous: u64,
    /// Set when the last two residencies closed with equal digests.
    confident: bool,
}

/// Trace-based dead-block predictor state.
///
/// Entries are created lazily on first miss and persist for the run; there
/// is no table-level eviction.
#[derive(Debug, Default)]
pub struct TracePredictor {
    entries: HashMap<u64, TraceEntry>,
}

impl TracePredictor {
    /// Creates an empty predictor.
    pub fn new() -> Self {
        Self::default()
    }
}

impl DeadBlockPredictor for TracePredictor {
    /// Starts a residency: the running digest resets, the previous-residency
    /// digest and confidence are kept for comparison.
    fn update_on_miss(&mut self, block_addr: u64) {
        let entry = self.entries.entry(block_addr).or_default();
        entry.current = 0;
    }

    /// Folds `pc` into the hit block's digest when the hit opens a new
    /// burst, and nominates the demoted block for evaluation.
    ///
    /// Hits that extend the current burst carry no new information and are
    /// ignored.
    fn observe_hit(&mut self, block_addr: u64, pc: u64, burst_boundary: bool) -> Option<Candidate> {
        if !burst_boundary {
            return None;
        }
        let entry = self.entries.entry(block_addr).or_default();
        entry.current = entry.current.wrapping_add(pc) & TRACE_MASK;
        Some(Candidate::DemotedBlock)
    }

    /// A block is dead when its running digest has already reached the
    /// previous residency's digest and the confidence bit is set.
    fn predict(&self, block_addr: u64, _live_refs: u32) -> bool {
        self.entries
            .get(&block_addr)
            .is_some_and(|e| e.confident && e.current == e.previous)
    }

    /// Closes the residency: updates confidence, rolls the running digest
    /// into the reference digest and resets the running digest.
    fn update_on_eviction(&mut self, block_addr: u64, _live_refs: u32) {
        let entry = self.entries.entry(block_addr).or_default();
        entry.confident = entry.current == entry.previous;
        entry.previous = entry.current;
        entry.current = 0;
    }
}
