//! Builder methods for creating errors with context

use super::types::Error;
use std::path::PathBuf;

impl Error {
    /// Create a list-unavailable error for a preload file list
    #[must_use]
    pub fn list_unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::ListUnavailable {
            path: path.into(),
            source,
        }
    }

    /// Create a file system error with context
    #[must_use]
    pub fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Error::FileSystem {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Create an event source error without an underlying IO cause
    #[must_use]
    pub fn event_source(command: impl Into<String>, message: impl Into<String>) -> Self {
        Error::EventSource {
            command: command.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create an event source error caused by an IO failure
    #[must_use]
    pub fn event_source_io(
        command: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Error::EventSource {
            command: command.into(),
            message: message.into(),
            source: Some(source),
        }
    }

    /// Whether this error only means "nothing to preload" rather than a broken setup
    pub fn is_list_unavailable(&self) -> bool {
        matches!(self, Error::ListUnavailable { .. })
    }
}
