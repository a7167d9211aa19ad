//! Error types for warmstart operations

mod builders;
mod conversions;
mod display;
mod types;

pub use types::{Error, Result};

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn list_unavailable_display_names_path() {
        let err = Error::list_unavailable(
            "/data/local/tmp/missing.txt",
            io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
        );
        assert!(err.is_list_unavailable());
        assert_eq!(
            err.to_string(),
            "failed to open file list '/data/local/tmp/missing.txt': No such file or directory"
        );
    }

    #[test]
    fn event_source_display_with_and_without_cause() {
        let bare = Error::event_source("logcat", "produced no stdout");
        assert_eq!(bare.to_string(), "event source 'logcat' produced no stdout");

        let io = Error::event_source_io(
            "logcat",
            "could not be spawned",
            io::Error::new(io::ErrorKind::NotFound, "not found"),
        );
        assert_eq!(
            io.to_string(),
            "event source 'logcat' could not be spawned: not found"
        );
        assert!(!io.is_list_unavailable());
    }

    #[test]
    fn source_chain_is_preserved() {
        use std::error::Error as _;
        let err = Error::file_system(
            "/tmp/x",
            "open",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.source().is_some());
    }
}
