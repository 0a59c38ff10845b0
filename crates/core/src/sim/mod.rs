//! Trace-driven simulation.
//!
//! Provides the trace-file format reader and the top-level [`Simulator`]
//! that feeds parsed records into a cache hierarchy.

pub mod simulator;
pub mod trace;

pub use simulator::Simulator;
pub use trace::{TraceOp, TraceReader, TraceRecord, parse_line};
