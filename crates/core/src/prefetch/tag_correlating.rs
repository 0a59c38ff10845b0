//! Tag-Correlating Prefetcher.
//!
//! Learns, per cache level, which miss tag tends to follow which pair of
//! miss tags within a set. Every miss both trains the table (the pair seen
//! *before* this miss predicts this miss's tag) and queries it (the pair
//! *including* this miss predicts the next one), giving a first-order Markov
//! predictor over per-set miss streams.
//!
//! The prefetcher only proposes candidates; the cache level decides whether
//! a dead-predicted slot is available to hold one.

use std::collections::{BTreeMap, HashMap};

/// 64-bit avalanche mixer (Murmur3 finalizer constants).
///
/// Tags are low-entropy in their high bits, so raw concatenation would
/// cluster table keys badly.
fn mix64(mut x: u64) -> u64 {
    x ^= x >> 33;
    x = x.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
    x ^= x >> 33;
    x = x.wrapping_mul(0xC4CE_B9FE_1A85_EC53);
    x ^ (x >> 33)
}

/// Order-sensitive key over the two most recent miss tags of a set.
fn correlation_key(first: u64, second: u64) -> u64 {
    mix64(first.rotate_left(32) ^ second)
}

/// The last two miss tags observed in one set, oldest first.
#[derive(Clone, Copy, Debug, Default)]
struct MissHistory {
    tags: [u64; 2],
    valid: [bool; 2],
}

impl MissHistory {
    /// Shifts a new miss tag in, dropping the oldest.
    fn shift(&mut self, tag: u64) {
        self.tags[0] = self.tags[1];
        self.valid[0] = self.valid[1];
        self.tags[1] = tag;
        self.valid[1] = true;
    }

    /// Correlation key over the current pair, once both slots are valid.
    fn key(&self) -> Option<u64> {
        (self.valid[0] && self.valid[1]).then(|| correlation_key(self.tags[0], self.tags[1]))
    }
}

/// Tag-correlating prefetcher state for one cache level.
///
/// Owns a two-deep miss shift register per set and the correlation table
/// mapping a pair-of-tags key to candidate next tags with occurrence
/// counts. The inner table is ordered so that candidate selection is
/// deterministic run to run.
#[derive(Debug)]
pub struct TagCorrelatingPrefetcher {
    history: Vec<MissHistory>,
    table: HashMap<u64, BTreeMap<u64, u32>>,
}

impl TagCorrelatingPrefetcher {
    /// Creates a prefetcher covering `num_sets` sets.
    pub fn new(num_sets: usize) -> Self {
        Self {
            history: vec![MissHistory::default(); num_sets],
            table: HashMap::new(),
        }
    }

    /// Trains on a miss and records it in the set's shift register.
    ///
    /// Training uses the register *before* the shift: the pair of misses
    /// N-2,N-1 gains evidence that `tag` (miss N) follows them.
    pub fn observe_miss(&mut self, set_index: usize, tag: u64) {
        if let Some(key) = self.history[set_index].key() {
            *self.table.entry(key).or_default().entry(tag).or_insert(0) += 1;
        }
        self.history[set_index].shift(tag);
    }

    /// Returns the most likely next miss tag for this set, if the table has
    /// evidence for the set's current miss pair.
    ///
    /// Ties break toward the smaller tag (ascending scan with strict
    /// improvement), keeping replays deterministic.
    pub fn candidate(&self, set_index: usize) -> Option<u64> {
        let key = self.history[set_index].key()?;
        let counts = self.table.get(&key)?;
        let mut best: Option<(u64, u32)> = None;
        for (&tag, &count) in counts {
            match best {
                Some((_, best_count)) if count <= best_count => {}
                _ => best = Some((tag, count)),
            }
        }
        best.map(|(tag, _)| tag)
    }
}
