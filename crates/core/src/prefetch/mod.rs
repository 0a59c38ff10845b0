//! Prefetch Mechanisms.
//!
//! Speculative block insertion driven by miss-pattern correlation. The one
//! mechanism implemented here never displaces live data: prefetched blocks
//! may only land in slots the dead-block predictor has already written off.
//!
//! # Mechanisms
//!
//! - `TagCorrelating`: first-order Markov prediction of the next miss tag
//!   from the two preceding miss tags in the same set.

/// Tag-correlating (two-miss history) prefetcher.
pub mod tag_correlating;

pub use tag_correlating::TagCorrelatingPrefetcher;
