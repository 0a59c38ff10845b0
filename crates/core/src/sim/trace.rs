//! Memory-reference trace parsing.
//!
//! This module reads the line-oriented trace format that drives a simulation. It performs:
//! 1. **Record parsing:** One reference per line, `<I|R|W> <hex addr> [hex pc]`.
//! 2. **Comment handling:** Blank lines and lines starting with `#` are skipped.
//! 3. **Error reporting:** Malformed lines are rejected with their line number.
//!
//! The operation letter is case-insensitive and hex values accept an optional
//! `0x` prefix. When the program counter column is absent it defaults to the
//! address itself, which keeps instruction-fetch traces to two columns.

use crate::common::TraceError;
use std::io::BufRead;

/// The kind of memory reference a trace line describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraceOp {
    /// Instruction fetch, routed to the L1 instruction cache.
    InstrFetch,
    /// Data read, routed to the L1 data cache.
    Read,
    /// Data write, routed to the L1 data cache.
    Write,
}

/// A single parsed trace line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceRecord {
    /// Which cache and access kind this reference targets.
    pub op: TraceOp,
    /// Referenced byte address.
    pub addr: u64,
    /// Program counter of the referencing instruction.
    pub pc: u64,
}

fn parse_hex(token: &str, line: usize) -> Result<u64, TraceError> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    u64::from_str_radix(digits, 16).map_err(|_| TraceError::BadHex {
        line,
        value: token.to_string(),
    })
}

/// Parses one trace line into a record.
///
/// Returns `Ok(None)` for blank lines and `#` comments so callers can stream
/// a file without filtering it first.
///
/// # Arguments
///
/// * `line` - The raw line, without its trailing newline.
/// * `line_no` - One-based line number, used in error messages.
///
/// # Errors
///
/// Returns [`TraceError::Malformed`] when the line has the wrong shape and
/// [`TraceError::BadHex`] when a numeric column does not parse.
pub fn parse_line(line: &str, line_no: usize) -> Result<Option<TraceRecord>, TraceError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let mut tokens = trimmed.split_whitespace();
    let malformed = || TraceError::Malformed {
        line: line_no,
        content: trimmed.to_string(),
    };

    let op = match tokens.next().ok_or_else(malformed)? {
        "I" | "i" => TraceOp::InstrFetch,
        "R" | "r" => TraceOp::Read,
        "W" | "w" => TraceOp::Write,
        _ => return Err(malformed()),
    };
    let addr = parse_hex(tokens.next().ok_or_else(malformed)?, line_no)?;
    let pc = match tokens.next() {
        Some(token) => parse_hex(token, line_no)?,
        None => addr,
    };
    if tokens.next().is_some() {
        return Err(malformed());
    }

    Ok(Some(TraceRecord { op, addr, pc }))
}

/// Streaming reader that yields parsed records from any [`BufRead`] source.
///
/// Comment and blank lines are skipped; line numbers still account for them,
/// so errors point at the offending line of the original file.
///
/// ```
/// use dbpsim_core::sim::{TraceOp, TraceReader};
///
/// let input = b"# warmup\nR 0x1000 0x400\nw 2000\n" as &[u8];
/// let records: Vec<_> = TraceReader::new(input).collect::<Result<_, _>>().unwrap();
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[0].op, TraceOp::Read);
/// assert_eq!(records[0].pc, 0x400);
/// assert_eq!(records[1].pc, 0x2000); // pc column absent, defaults to the address
/// ```
#[derive(Debug)]
pub struct TraceReader<R> {
    reader: R,
    line_no: usize,
}

impl<R: BufRead> TraceReader<R> {
    /// Wraps a buffered source of trace text.
    pub fn new(reader: R) -> Self {
        Self { reader, line_no: 0 }
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<TraceRecord, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let mut line = String::new();
            match self.reader.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(TraceError::Io(e))),
            }
            self.line_no += 1;
            match parse_line(&line, self.line_no) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => {}
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
