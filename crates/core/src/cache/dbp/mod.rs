//! Dead-Block Prediction Policies.
//!
//! Implements the schemes that flag resident blocks as unlikely to be
//! referenced again before eviction. A block flagged dead keeps its LRU slot
//! but becomes a legal target for prefetch overwrites.
//!
//! # Policies
//!
//! - `Trace`: folded program-counter digests compared across residencies,
//!   evaluated at burst boundaries. Suited to L1 caches, where accesses
//!   arrive in bursts to the same block.
//! - `RefCount`: per-residency reference counts compared across
//!   residencies, evaluated on every hit. Suited to shared L2 caches, where
//!   burst structure is filtered out by the L1s.

/// Reference-count dead-block predictor.
pub mod refcount;

/// Trace-based (folded-PC digest) dead-block predictor.
pub mod trace;

pub use refcount::RefCountPredictor;
pub use trace::TracePredictor;

/// Which resident block a predictor nominates for evaluation after a hit.
///
/// The two policies disagree on evaluation timing: the trace policy judges a
/// block once its burst ends (when it is demoted from the MRU position),
/// while the refcount policy judges the block being hit. Returning the
/// nominee keeps that timing internal to the policy, so the cache level
/// never branches on the policy kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Candidate {
    /// Evaluate the block that was just hit.
    HitBlock,
    /// Evaluate the block demoted from the most-recently-used position.
    DemotedBlock,
}

/// Trait for dead-block prediction policies.
///
/// One instance is owned by each cache level; entries are keyed by block
/// address and persist for the whole run. `live_refs` carries the block's
/// in-residency reference count, the live signal the refcount policy
/// compares against its table (the trace policy's signal lives entirely in
/// its own entries and ignores it).
pub trait DeadBlockPredictor: Send + Sync {
    /// Initializes or resets the entry for a freshly missed block address.
    fn update_on_miss(&mut self, block_addr: u64);

    /// Observes a hit and nominates a block for dead-block evaluation.
    ///
    /// # Arguments
    ///
    /// * `block_addr` - Base address of the block that was hit.
    /// * `pc` - Program counter of the access.
    /// * `burst_boundary` - Whether a different block was most recently
    ///   used just before this hit.
    ///
    /// # Returns
    ///
    /// The block to run [`predict`](Self::predict) against, if any.
    fn observe_hit(&mut self, block_addr: u64, pc: u64, burst_boundary: bool) -> Option<Candidate>;

    /// Returns whether the block at `block_addr` is predicted dead.
    fn predict(&self, block_addr: u64, live_refs: u32) -> bool;

    /// Finalizes the entry for an evicted block address.
    fn update_on_eviction(&mut self, block_addr: u64, live_refs: u32);
}
