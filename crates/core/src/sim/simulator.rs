//! Simulator: owns the cache hierarchy and routes trace records into it.
//!
//! Keeps the level handles next to the arena they index, so callers drive a
//! whole run through one value instead of threading ids around.

use crate::common::{ConfigError, TraceError};
use crate::config::Config;
use crate::hierarchy::{Hierarchy, LevelId};
use crate::sim::trace::{TraceOp, TraceRecord, TraceReader};
use crate::stats::HierarchyStats;
use std::io::BufRead;

/// Top-level simulator: the three-level hierarchy plus its entry points.
#[derive(Debug)]
pub struct Simulator {
    /// The cache arena holding L2 and the two L1 levels.
    pub hierarchy: Hierarchy,
    /// Handle of the L1 instruction cache.
    pub l1i: LevelId,
    /// Handle of the L1 data cache.
    pub l1d: LevelId,
    /// Handle of the shared L2.
    pub l2: LevelId,
}

impl Simulator {
    /// Creates a simulator with the given per-level geometry and policies.
    ///
    /// The shared L2 is constructed first so both L1 levels can name it as
    /// their parent.
    ///
    /// # Arguments
    ///
    /// * `config` - Geometry, predictor, and prefetcher settings per level.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when any level's geometry is invalid.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let mut hierarchy = Hierarchy::new();
        let l2 = hierarchy.add_level(&config.l2, None)?;
        let l1i = hierarchy.add_level(&config.l1_i, Some(l2))?;
        let l1d = hierarchy.add_level(&config.l1_d, Some(l2))?;
        Ok(Self {
            hierarchy,
            l1i,
            l1d,
            l2,
        })
    }

    /// Applies one trace record to the hierarchy.
    ///
    /// Instruction fetches enter through L1-I; data reads and writes enter
    /// through L1-D. Misses propagate to L2 inside the hierarchy itself.
    pub fn record(&mut self, record: TraceRecord) {
        match record.op {
            TraceOp::InstrFetch => self.hierarchy.access(self.l1i, record.addr, record.pc, false),
            TraceOp::Read => self.hierarchy.access(self.l1d, record.addr, record.pc, false),
            TraceOp::Write => self.hierarchy.access(self.l1d, record.addr, record.pc, true),
        }
    }

    /// Drives the simulator from a trace source until end of input.
    ///
    /// # Returns
    ///
    /// The number of records applied.
    ///
    /// # Errors
    ///
    /// Returns the first [`TraceError`] encountered; records before the
    /// offending line have already been applied.
    pub fn run<R: BufRead>(&mut self, reader: R) -> Result<u64, TraceError> {
        let mut records = 0u64;
        for record in TraceReader::new(reader) {
            self.record(record?);
            records += 1;
        }
        Ok(records)
    }

    /// Snapshot of every level's counters.
    #[must_use]
    pub fn stats(&self) -> HierarchyStats {
        HierarchyStats {
            l1i: self.hierarchy.level(self.l1i).stats(),
            l1d: self.hierarchy.level(self.l1d).stats(),
            l2: self.hierarchy.level(self.l2).stats(),
        }
    }
}
