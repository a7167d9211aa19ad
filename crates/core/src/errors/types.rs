//! Core error type definitions

use std::path::PathBuf;

/// Result type alias for warmstart operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for warmstart operations using thiserror
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A preload file list could not be opened or read
    ListUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File system operations
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    Configuration { message: String },

    /// JSON serialization/deserialization errors
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// The launch-event stream could not be started or read
    EventSource {
        command: String,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },
}
