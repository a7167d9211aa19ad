//! Display implementations for error types

use super::types::Error;
use std::fmt;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ListUnavailable { path, source } => {
                write!(
                    f,
                    "failed to open file list '{}': {}",
                    path.display(),
                    source
                )
            }
            Error::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "file system {} operation failed for '{}': {}",
                    operation,
                    path.display(),
                    source
                )
            }
            Error::Configuration { message } => {
                write!(f, "configuration error: {message}")
            }
            Error::Json { message, .. } => {
                write!(f, "JSON error: {message}")
            }
            Error::EventSource {
                command,
                message,
                source,
            } => match source {
                Some(source) => write!(f, "event source '{command}' {message}: {source}"),
                None => write!(f, "event source '{command}' {message}"),
            },
        }
    }
}
