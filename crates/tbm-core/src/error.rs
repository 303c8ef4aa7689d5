//! Error types for the TBM catalog.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Record store errors - any failed remote call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The request never produced a response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The store answered with a non-success status.
    #[error("Store returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be understood.
    #[error("Malformed response: {0}")]
    Decode(String),

    /// The call did not finish in time.
    #[error("Store request timed out after {duration:?}")]
    Timeout { duration: Duration },

    /// No store URL or key configured.
    #[error("Record store is not configured")]
    NotConfigured,
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error.
    #[error("IO error reading {path:?}: {message}")]
    Io { path: PathBuf, message: String },

    /// Parse error.
    #[error("Parse error in {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Engine lifecycle errors.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum EngineError {
    /// `initialize` runs once per engine.
    #[error("Engine already initialized")]
    AlreadyInitialized,

    /// The engine was disposed and accepts no further work.
    #[error("Engine disposed")]
    Disposed,
}
