//! Error types for construction and trace input.
//!
//! The simulation core itself is total once built: `access` cannot fail for
//! well-formed addresses. Everything that can go wrong is front-loaded here:
//! 1. **Configuration errors:** Geometry that cannot describe a real cache.
//! 2. **Trace errors:** I/O failures and malformed trace records, reported
//!    with the offending line so bad traces are easy to fix.

use thiserror::Error;

/// A cache level or hierarchy could not be built from the given parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Block sizes must be powers of two so offset bits can be derived.
    #[error("block size must be a power of two, got {0} bytes")]
    BlockSize(u64),

    /// A set needs at least one way to hold a block.
    #[error("associativity must be at least one way")]
    ZeroWays,

    /// The size / block / ways combination leaves no sets at all.
    #[error("{size_kb} KiB with {block_bytes} B blocks at {ways} ways yields zero sets")]
    NoSets {
        /// Configured total capacity in KiB.
        size_kb: u64,
        /// Configured block size in bytes.
        block_bytes: u64,
        /// Configured associativity.
        ways: u64,
    },

    /// A parent handle referred to a level that has not been added yet.
    ///
    /// Parents must be constructed before their children so that every
    /// child handle points at a live level for the whole run.
    #[error("parent level #{0} does not exist; build parents first")]
    UnknownParent(usize),
}

/// A trace stream could not be read or parsed.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The underlying reader failed.
    #[error("trace read failed: {0}")]
    Io(#[from] std::io::Error),

    /// A line did not match `<I|R|W> <addr> [pc]`.
    #[error("line {line}: malformed trace record {content:?}")]
    Malformed {
        /// 1-based line number in the trace stream.
        line: usize,
        /// The offending line, trimmed.
        content: String,
    },

    /// An address or program-counter field was not valid hexadecimal.
    #[error("line {line}: bad hexadecimal field {value:?}")]
    BadHex {
        /// 1-based line number in the trace stream.
        line: usize,
        /// The field that failed to parse.
        value: String,
    },
}
