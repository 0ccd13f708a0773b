// SPDX-License-Identifier: MIT
//
// Unified error types for Spoolsync.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Top-level error type for all Spoolsync operations.
///
/// Precondition failures (`NotFound`, `UnsupportedFormat`,
/// `PrinterUnavailable`) are surfaced before any external mutation occurs and
/// are never retried.  `EngineFailure` is surfaced only after the open
/// document has been closed.
#[derive(Debug, Error)]
pub enum PrintError {
    // -- Precondition errors --
    #[error("input file not found: {0}")]
    NotFound(PathBuf),

    #[error("document format not supported by the engine: {0}")]
    UnsupportedFormat(String),

    #[error("PDF printer not installed: {0}")]
    PrinterUnavailable(String),

    // -- Mid-operation errors --
    #[error("document engine error: {0}")]
    EngineFailure(String),

    #[error("print queue error: {0}")]
    Spool(String),

    // -- Platform / lifecycle --
    #[error("the document engine integration is only available on Windows")]
    PlatformUnsupported,

    /// A configured wait deadline elapsed before the observed condition held.
    /// Never produced when no deadline is configured (the default).
    #[error("timed out after {elapsed:?} waiting for {condition}")]
    Timeout {
        condition: &'static str,
        elapsed: Duration,
    },

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PrintError>;
