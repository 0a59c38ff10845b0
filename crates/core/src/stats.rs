//! Simulation statistics collection and reporting.
//!
//! This module tracks the observable outcomes of a simulation run. It provides:
//! 1. **Access counters:** Reads, writes, misses, and evictions per cache level.
//! 2. **Predictor outcomes:** Dead-block predictions and mispredictions.
//! 3. **Prefetcher outcomes:** Issued prefetches and prefetches evicted unused.
//! 4. **Reports:** A sectioned text report and a serializable per-hierarchy document.

use serde::Serialize;

/// Event counters for a single cache level.
///
/// Every counter is monotonically increasing over the lifetime of a level.
/// Derived metrics (`accesses`, `hits`, `miss_rate`) are computed on demand
/// rather than stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Read lookups, including instruction fetches routed to this level.
    pub reads: u64,
    /// Write lookups, including write-backs arriving from a child level.
    pub writes: u64,
    /// Lookups that did not find the requested block resident.
    pub misses: u64,
    /// Blocks displaced from a full set to make room for an incoming block.
    pub evictions: u64,
    /// Times the dead-block predictor marked a resident block dead.
    pub dead_predictions: u64,
    /// Times a block marked dead was referenced again before leaving the cache.
    pub mispredictions: u64,
    /// Blocks installed speculatively by the prefetcher.
    pub prefetches: u64,
    /// Prefetched blocks evicted without ever being referenced.
    pub useless_prefetches: u64,
}

impl CacheStats {
    /// Total lookups at this level (reads plus writes).
    #[must_use]
    pub const fn accesses(&self) -> u64 {
        self.reads + self.writes
    }

    /// Lookups that found the requested block resident.
    #[must_use]
    pub const fn hits(&self) -> u64 {
        self.accesses() - self.misses
    }

    /// Fraction of lookups that missed, in `0.0..=1.0`.
    ///
    /// Returns `0.0` when no lookup has been recorded yet.
    #[must_use]
    pub const fn miss_rate(&self) -> f64 {
        let accesses = self.accesses();
        if accesses == 0 {
            0.0
        } else {
            self.misses as f64 / accesses as f64
        }
    }

    /// Prints one labelled report section for this level to stdout.
    ///
    /// # Arguments
    ///
    /// * `name` - Label for the section header (e.g. `"L1-D"`).
    pub fn print_section(&self, name: &str) {
        let dbp_acc = if self.dead_predictions > 0 {
            100.0 * (1.0 - self.mispredictions as f64 / self.dead_predictions as f64)
        } else {
            0.0
        };
        println!("{name}");
        println!("  accesses               {}", self.accesses());
        println!("  reads                  {}", self.reads);
        println!("  writes                 {}", self.writes);
        println!("  hits                   {}", self.hits());
        println!(
            "  misses                 {} ({:.2}%)",
            self.misses,
            self.miss_rate() * 100.0
        );
        println!("  evictions              {}", self.evictions);
        println!("  dbp.predictions        {}", self.dead_predictions);
        println!("  dbp.mispredicts        {}", self.mispredictions);
        println!("  dbp.accuracy           {dbp_acc:.2}%");
        println!("  prefetch.issued        {}", self.prefetches);
        println!("  prefetch.useless       {}", self.useless_prefetches);
    }
}

/// Counters for every level of a three-level hierarchy.
///
/// Serializes to a JSON document with one object per level, suitable for
/// machine consumption of simulation results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct HierarchyStats {
    /// L1 instruction cache counters.
    pub l1i: CacheStats,
    /// L1 data cache counters.
    pub l1d: CacheStats,
    /// Shared L2 counters.
    pub l2: CacheStats,
}

impl HierarchyStats {
    /// Prints the full report for all three levels to stdout.
    pub fn print(&self) {
        println!("\n==========================================================");
        println!("CACHE HIERARCHY SIMULATION STATISTICS");
        println!("==========================================================");
        self.l1i.print_section("L1-I");
        println!("----------------------------------------------------------");
        self.l1d.print_section("L1-D");
        println!("----------------------------------------------------------");
        self.l2.print_section("L2");
        println!("==========================================================");
    }
}
