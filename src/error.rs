//! Crate-wide error type.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tracing::error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors surfaced by the relation engine and its command front end.
///
/// Invalid user input (unknown names, duplicate edges, missing relations) is
/// never an error: those operations are silent no-ops. `Corruption` is only
/// produced when an internal cross-reference is found to be inconsistent.
#[derive(Debug, Error)]
pub enum GraphError {
    /// I/O failure while reading commands or writing reports.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// An internal invariant no longer holds.
    #[error("corruption detected: {0}")]
    Corruption(String),
    /// A command line could not be parsed.
    #[error("parse error on line {line}: {message}")]
    Parse {
        /// 1-based input line number.
        line: usize,
        /// What was wrong with the line.
        message: String,
    },
    /// The configuration file could not be loaded.
    #[error("invalid configuration {path}: {message}")]
    Config {
        /// Path of the offending file.
        path: PathBuf,
        /// Loader or parser message.
        message: String,
    },
    /// A report could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GraphError {
    pub(crate) fn corruption(message: impl Into<String>) -> Self {
        let message = message.into();
        error!(%message, "relgraph.corruption");
        GraphError::Corruption(message)
    }

    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        GraphError::Parse {
            line,
            message: message.into(),
        }
    }
}
