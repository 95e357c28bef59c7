//! Error types shared between the feed and the dashboard.
//!
//! The `WatchlistError` enum unifies the transient acquisition failure with the
//! configuration, command and I/O failures of the surrounding tooling, allowing
//! crates to propagate a single error type.
use std::io;
use std::sync::PoisonError;

use thiserror::Error;

/// Unified error type shared by the feed and the client.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WatchlistError {
    /// Transient failure of a data acquisition. Carries only a human-readable message;
    /// the caller recovers by triggering a fresh acquisition.
    #[error("Acquisition failure: {0}")]
    AcquisitionFailure(String),

    /// Feed configuration value outside of its accepted range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Interactive command that could not be parsed.
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// Requested symbol is not part of the current snapshot.
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    /// I/O error originating from the standard library (stdin/stdout).
    #[error("I/O error: {0}")]
    Io(String),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(String),

    /// Error indicating a poisoned mutex/lock was encountered.
    #[error("Mutex Lock Poisoned: {0}")]
    MutexLock(String),
}

impl WatchlistError {
    /// Returns `true` for errors that a fresh attempt may resolve.
    pub fn is_transient(&self) -> bool {
        matches!(self, WatchlistError::AcquisitionFailure(_))
    }
}

impl From<io::Error> for WatchlistError {
    fn from(err: io::Error) -> Self {
        WatchlistError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for WatchlistError {
    fn from(err: serde_json::Error) -> Self {
        WatchlistError::SerdeJson(err.to_string())
    }
}

impl<T> From<PoisonError<T>> for WatchlistError {
    fn from(err: PoisonError<T>) -> Self {
        WatchlistError::MutexLock(err.to_string())
    }
}
