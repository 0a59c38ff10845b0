//! # Tag-Correlating Prefetcher Tests.
//!
//! Drives the prefetcher tables directly: miss-history shifting, pair
//! training, candidate selection, and the tie-break rule. Tags here are
//! abstract small integers; no cache is involved.

use dbpsim_core::prefetch::TagCorrelatingPrefetcher;

// ══════════════════════════════════════════════════════════
// 1. History Warm-Up
// ══════════════════════════════════════════════════════════

/// No candidate before the per-set history holds two misses.
#[test]
fn needs_two_misses_before_any_candidate() {
    let mut pf = TagCorrelatingPrefetcher::new(4);
    assert_eq!(pf.candidate(0), None, "empty history");

    pf.observe_miss(0, 1);
    assert_eq!(pf.candidate(0), None, "one miss is not a pair");

    pf.observe_miss(0, 2);
    assert_eq!(pf.candidate(0), None, "pair formed but untrained");
}

// ══════════════════════════════════════════════════════════
// 2. Training and Lookup
// ══════════════════════════════════════════════════════════

/// A miss trains its predecessor pair, and re-forming that pair later
/// yields the trained tag.
#[test]
fn trains_pair_to_next_tag() {
    let mut pf = TagCorrelatingPrefetcher::new(4);
    pf.observe_miss(0, 1);
    pf.observe_miss(0, 2);
    pf.observe_miss(0, 3); // trains (1, 2) → 3; history is now (2, 3)
    assert_eq!(pf.candidate(0), None, "history moved past the pair");

    pf.observe_miss(0, 1); // trains (2, 3) → 1
    pf.observe_miss(0, 2); // trains (3, 1) → 2; history back to (1, 2)
    assert_eq!(pf.candidate(0), Some(3));
}

/// Pairs are ordered: training (1, 2) says nothing about (2, 1).
#[test]
fn pair_order_matters() {
    let mut pf = TagCorrelatingPrefetcher::new(4);
    pf.observe_miss(0, 1);
    pf.observe_miss(0, 2);
    pf.observe_miss(0, 3); // trains (1, 2) → 3

    pf.observe_miss(1, 2);
    pf.observe_miss(1, 1); // set 1 history is (2, 1)
    assert_eq!(pf.candidate(1), None, "(2, 1) was never trained");
}

// ══════════════════════════════════════════════════════════
// 3. Candidate Selection
// ══════════════════════════════════════════════════════════

/// At equal counts the smaller tag wins.
#[test]
fn tie_breaks_toward_smaller_tag() {
    let mut pf = TagCorrelatingPrefetcher::new(4);
    // (1, 2) → 3 once.
    pf.observe_miss(0, 1);
    pf.observe_miss(0, 2);
    pf.observe_miss(0, 3);
    // Re-form (1, 2), then (1, 2) → 0 once.
    pf.observe_miss(0, 1);
    pf.observe_miss(0, 2);
    pf.observe_miss(0, 0);
    // Re-form (1, 2) again: both 0 and 3 have one observation.
    pf.observe_miss(0, 1);
    pf.observe_miss(0, 2);
    assert_eq!(pf.candidate(0), Some(0), "equal counts favor smaller tag");
}

/// A strictly higher count beats the smaller tag.
#[test]
fn higher_count_beats_smaller_tag() {
    let mut pf = TagCorrelatingPrefetcher::new(4);
    // (1, 2) → 3 twice.
    for _ in 0..2 {
        pf.observe_miss(0, 1);
        pf.observe_miss(0, 2);
        pf.observe_miss(0, 3);
    }
    // (1, 2) → 0 once.
    pf.observe_miss(0, 1);
    pf.observe_miss(0, 2);
    pf.observe_miss(0, 0);
    // Re-form (1, 2).
    pf.observe_miss(0, 1);
    pf.observe_miss(0, 2);
    assert_eq!(pf.candidate(0), Some(3), "two observations beat one");
}

// ══════════════════════════════════════════════════════════
// 4. Table Sharing Across Sets
// ══════════════════════════════════════════════════════════

/// Histories are per set, but the correlation table is shared: a pattern
/// learned in one set answers queries from another.
#[test]
fn table_is_shared_history_is_not() {
    let mut pf = TagCorrelatingPrefetcher::new(4);
    pf.observe_miss(0, 1);
    pf.observe_miss(0, 2);
    pf.observe_miss(0, 3); // trains (1, 2) → 3 from set 0

    // Set 1 forms the same pair; the shared table answers.
    pf.observe_miss(1, 1);
    pf.observe_miss(1, 2);
    assert_eq!(pf.candidate(1), Some(3), "learned pattern crosses sets");

    // An untouched set still has no history.
    assert_eq!(pf.candidate(2), None);
}
