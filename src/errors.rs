//! Shared error types for the bolometric-corrections bridge.
//!
//! Every fallible operation in this crate returns [`BoloResult`]. Failures are
//! surfaced synchronously to the immediate caller; nothing retries.
//!
//! # Error Types
//!
//! - [`BoloError::Configuration`] - toolkit root missing or invalid
//! - [`BoloError::Lookup`] - unknown system/filter/filter-set name or code
//! - [`BoloError::InvalidTable`] - duplicate or inconsistent registry tables
//! - [`BoloError::Io`] - file read/write failures, with the offending path
//! - [`BoloError::IndexMismatch`] - unequal input array lengths
//! - [`BoloError::Process`] - external program failed or timed out
//! - [`BoloError::Decode`] - malformed selection or results file

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for bridge operations.
pub type BoloResult<T> = Result<T, BoloError>;

/// Standard error types for the bolometric-corrections bridge.
#[derive(Debug, Error)]
pub enum BoloError {
    /// Required toolkit root is not set or does not point at a toolkit.
    ///
    /// Fatal at construction time; no file I/O is attempted once this is
    /// raised.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// A name or code was not found in the registry.
    #[error("Unknown {kind}: '{name}'")]
    Lookup { kind: &'static str, name: String },

    /// Registry tables are internally inconsistent.
    ///
    /// Raised at construction time for duplicate names, duplicate codes, or
    /// filter sets that reference unknown codes or exceed the reserved
    /// output slots. The legacy implementation silently let the last
    /// duplicate win;
    /// here the tables must be collision-free up front.
    #[error("Invalid registry table: {message}")]
    InvalidTable { message: String },

    /// File operation failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Parallel input arrays have different lengths.
    #[error("Input array '{sequence}' has length {actual}, expected {expected}")]
    IndexMismatch {
        sequence: &'static str,
        expected: usize,
        actual: usize,
    },

    /// External program exited abnormally or ran past its time bound.
    ///
    /// Only raised in strict invocation mode; lenient mode reproduces the
    /// legacy fire-and-forget behavior. `status` is `None` when the process
    /// was killed by a signal or by the timeout.
    #[error("External process '{program}' failed (status {status:?}): {stderr}")]
    Process {
        program: String,
        status: Option<i32>,
        stderr: String,
    },

    /// Selection or results file content could not be decoded.
    ///
    /// `line` is 1-based; 0 means the failure is about the file as a whole
    /// (missing, empty, too short).
    #[error("Decode error at line {line}: {message}")]
    Decode { line: usize, message: String },
}

impl BoloError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn lookup(kind: &'static str, name: impl Into<String>) -> Self {
        Self::Lookup {
            kind,
            name: name.into(),
        }
    }

    pub fn invalid_table(message: impl Into<String>) -> Self {
        Self::InvalidTable {
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn index_mismatch(sequence: &'static str, expected: usize, actual: usize) -> Self {
        Self::IndexMismatch {
            sequence,
            expected,
            actual,
        }
    }

    pub fn process(program: impl Into<String>, status: Option<i32>, stderr: impl Into<String>) -> Self {
        Self::Process {
            program: program.into(),
            status,
            stderr: stderr.into(),
        }
    }

    pub fn decode(line: usize, message: impl Into<String>) -> Self {
        Self::Decode {
            line,
            message: message.into(),
        }
    }
}
