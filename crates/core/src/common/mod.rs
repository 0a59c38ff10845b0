//! Common utilities shared across the simulator core.
//!
//! This module provides the fundamental building blocks the cache machinery
//! is assembled from:
//! 1. **Address Arithmetic:** The `tag | set-index | block-offset` split and
//!    its inverse, computed once per level.
//! 2. **Error Handling:** Configuration and trace-input error types.

/// Address decomposition and geometry helpers.
pub mod addr;

/// Configuration and trace error types.
pub mod error;

pub use addr::{AddressLayout, ceil_log2};
pub use error::{ConfigError, TraceError};
