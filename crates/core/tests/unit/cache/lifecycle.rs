//! # Dead-Block Lifecycle Tests.
//!
//! Walks whole block lifecycles through a real cache level: residency
//! generations, prediction, misprediction on re-reference, and the flag
//! clearing that follows. Each scenario is a hand-tracked access script
//! with the predictor state worked out step by step in the comments.

use crate::common::{level_config, single_level};
use dbpsim_core::config::{DeadBlockPolicy, Prefetcher};

// ══════════════════════════════════════════════════════════
// 1. Reference-Count Policy In Situ
// ══════════════════════════════════════════════════════════

/// Reference-count prediction through a direct-mapped level, including
/// the misprediction when the dead block is referenced again.
///
/// Geometry: 1 KiB, 64-byte blocks, 1-way → 16 sets; addresses `A = 0`
/// and `B = 1024` both map to set 0, so every miss evicts.
#[test]
fn refcount_lifecycle_with_misprediction() {
    let cfg = level_config(1, 64, 1, DeadBlockPolicy::RefCount, Prefetcher::None);
    let (mut h, id) = single_level(&cfg);
    let a = 0u64;
    let b = 1024u64;

    // Generation 1 of A: one reference, then eviction stores count 1
    // (not yet saturated, the entry started at 0).
    h.access(id, a, a, false); // miss
    h.access(id, a, a, false); // hit, count 1
    h.access(id, b, b, false); // miss, evicts A with count 1

    // Generation 2 of A: one reference again, eviction saturates at 1.
    h.access(id, a, a, false); // miss, evicts B
    h.access(id, a, a, false); // hit, count 1; entry not yet saturated
    assert_eq!(h.level(id).stats().dead_predictions, 0);
    h.access(id, b, b, false); // miss, evicts A: count 1 repeats → saturated

    // Generation 3 of A: the first hit reaches the learned count and the
    // prediction fires on the hit block itself.
    h.access(id, a, a, false); // miss, evicts B
    h.access(id, a, a, false); // hit, count 1 → predicted dead
    let status = h.level(id).peek(a).expect("resident");
    assert!(status.predicted_dead, "prediction fires at learned count");
    assert_eq!(h.level(id).stats().dead_predictions, 1);
    assert_eq!(h.level(id).stats().mispredictions, 0);

    // Referencing the predicted-dead block is a misprediction: the flag
    // clears before any new prediction, and the new count (2) no longer
    // matches the learned count, so the flag stays clear.
    h.access(id, a, a, false);
    let status = h.level(id).peek(a).expect("resident");
    assert!(!status.predicted_dead, "flag cleared on re-reference");
    assert_eq!(h.level(id).stats().mispredictions, 1);
    assert_eq!(h.level(id).stats().dead_predictions, 1);

    // Whole-run counters for the script above.
    let stats = h.level(id).stats();
    assert_eq!(stats.reads, 9);
    assert_eq!(stats.misses, 5);
    assert_eq!(stats.evictions, 4);
}

// ══════════════════════════════════════════════════════════
// 2. Trace Policy In Situ
// ══════════════════════════════════════════════════════════

/// Trace-based prediction through a 2-way level. The victim of the LRU
/// demotion is the block evaluated, one burst-boundary pc fold per
/// generation keeps the digest stable, and the third generation fires.
///
/// Geometry: 1 KiB, 64-byte blocks, 2-way → 8 sets; set-0 stride 512.
/// Blocks: A = 0, B = 512, C = 1024. Distinct pcs per block so digests
/// are attributable.
#[test]
fn trace_lifecycle_with_misprediction() {
    let cfg = level_config(1, 64, 2, DeadBlockPolicy::Trace, Prefetcher::None);
    let (mut h, id) = single_level(&cfg);
    let (a, b, c) = (0u64, 512u64, 1024u64);
    let (pa, pb, pc) = (0x40u64, 0x80u64, 0xC0u64);

    // Generation 1 of A: insert, one boundary hit (digest pa), evicted
    // next generation with previous digest 0 → not confident.
    h.access(id, a, pa, false); // miss            set [A]
    h.access(id, c, pc, false); // miss            set [A, C]
    h.access(id, a, pa, false); // boundary hit    set [C, A], digest(A) = pa

    // Generation 2 of A: same single-fold pattern. Its closing digest
    // matches generation 1, so A's eviction below turns confidence on.
    h.access(id, b, pb, false); // miss, evicts C  set [A, B]
    h.access(id, c, pc, false); // miss, evicts A  set [B, C]   digest rolls over
    h.access(id, a, pa, false); // miss, evicts B  set [C, A]
    h.access(id, c, pc, false); // boundary hit    set [A, C]
    h.access(id, a, pa, false); // boundary hit    set [C, A], digest(A) = pa again

    // Generation 3 of A: eviction confirms the repeat (confident now),
    // re-fetch, one fold, and the next demotion of A fires.
    h.access(id, b, pb, false); // miss, evicts C  set [A, B]
    h.access(id, c, pc, false); // miss, evicts A  set [B, C]   confident = true
    h.access(id, a, pa, false); // miss, evicts B  set [C, A]
    h.access(id, c, pc, false); // boundary hit: A demoted, digest(A) still 0 → no fire
    assert_eq!(h.level(id).stats().dead_predictions, 0);

    h.access(id, a, pa, false); // boundary hit: digest(A) = pa, C demoted (not confident)
    h.access(id, c, pc, false); // boundary hit: A demoted, digest matches → A predicted dead
    let status = h.level(id).peek(a).expect("resident");
    assert!(status.predicted_dead, "demoted block fired");
    assert_eq!(h.level(id).stats().dead_predictions, 1);
    assert_eq!(h.level(id).stats().mispredictions, 0);

    // Touching A again is a misprediction; the flag clears.
    h.access(id, a, pa, false);
    let status = h.level(id).peek(a).expect("resident");
    assert!(!status.predicted_dead);
    assert_eq!(h.level(id).stats().mispredictions, 1);

    let stats = h.level(id).stats();
    assert_eq!(stats.reads, 15);
    assert_eq!(stats.misses, 8);
    assert_eq!(stats.evictions, 6);
}

/// Without a matching digest history the trace policy stays quiet: a
/// scan pattern with changing pcs never predicts anything dead.
#[test]
fn trace_scan_pattern_never_fires() {
    let cfg = level_config(1, 64, 2, DeadBlockPolicy::Trace, Prefetcher::None);
    let (mut h, id) = single_level(&cfg);

    // Sweep 32 distinct blocks across all sets twice, pc varying per access.
    for round in 0..2u64 {
        for k in 0..32u64 {
            let addr = k * 64;
            h.access(id, addr, 0x9000 + round * 64 + k, false);
        }
    }
    assert_eq!(h.level(id).stats().dead_predictions, 0);
    assert_eq!(h.level(id).stats().mispredictions, 0);
}
