//! Kernel page-cache hints
//!
//! Thin wrappers over `open(O_NOATIME)`, `posix_fadvise(2)` and
//! `readahead(2)`. On targets without these calls the helpers degrade to a
//! plain open, a no-op, and `Unsupported` respectively.

use std::fs::File;
use std::io;
use std::path::Path;

/// Open `path` read-only, preferring not to update its access time.
///
/// Returns the file and whether the no-atime open succeeded. `O_NOATIME` is
/// refused for files the caller does not own, so a plain open is retried.
pub fn open_read_only(path: &Path) -> io::Result<(File, bool)> {
    #[cfg(any(target_os = "linux", target_os = "android"))]
    {
        use std::os::unix::fs::OpenOptionsExt;

        if let Ok(file) = std::fs::OpenOptions::new()
            .read(true)
            .custom_flags(libc::O_NOATIME)
            .open(path)
        {
            return Ok((file, true));
        }
    }

    File::open(path).map(|file| (file, false))
}

/// Hint sequential access for the whole file
#[cfg(any(target_os = "linux", target_os = "android"))]
pub fn fadvise_sequential(file: &File) -> io::Result<()> {
    fadvise(file, 0, 0, libc::POSIX_FADV_SEQUENTIAL)
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
pub fn fadvise_sequential(_file: &File) -> io::Result<()> {
    Ok(())
}

/// Ask the kernel to start caching `[offset, offset + len)`; `len == 0`
/// means to the end of the file
#[cfg(any(target_os = "linux", target_os = "android"))]
pub fn fadvise_willneed(file: &File, offset: u64, len: u64) -> io::Result<()> {
    fadvise(file, offset, len, libc::POSIX_FADV_WILLNEED)
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
pub fn fadvise_willneed(_file: &File, _offset: u64, _len: u64) -> io::Result<()> {
    Ok(())
}

#[cfg(any(target_os = "linux", target_os = "android"))]
fn fadvise(file: &File, offset: u64, len: u64, advice: libc::c_int) -> io::Result<()> {
    use std::os::unix::io::AsRawFd;

    // posix_fadvise returns the error number instead of setting errno
    let rc = unsafe {
        libc::posix_fadvise(
            file.as_raw_fd(),
            offset as libc::off_t,
            len as libc::off_t,
            advice,
        )
    };
    if rc != 0 {
        return Err(io::Error::from_raw_os_error(rc));
    }
    Ok(())
}

/// Non-blocking kernel read-ahead of `[offset, offset + len)`.
///
/// Success only means the request was queued; the pages may still be in
/// flight when this returns.
#[cfg(any(target_os = "linux", target_os = "android"))]
pub fn readahead(file: &File, offset: u64, len: u64) -> io::Result<()> {
    use std::os::unix::io::AsRawFd;

    let rc = unsafe {
        libc::readahead(
            file.as_raw_fd(),
            offset as libc::off64_t,
            len as libc::size_t,
        )
    };
    if rc != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
pub fn readahead(_file: &File, _offset: u64, _len: u64) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "readahead is not available on this platform",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_open_read_only_own_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"warm me").unwrap();

        let (opened, _noatime) = open_read_only(file.path()).unwrap();
        assert_eq!(opened.metadata().unwrap().len(), 7);
    }

    #[test]
    fn test_open_read_only_missing() {
        let err = open_read_only(Path::new("/nonexistent/warmstart/file")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_fadvise_hints_accept_regular_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0u8; 4096]).unwrap();

        assert!(fadvise_sequential(file.as_file()).is_ok());
        assert!(fadvise_willneed(file.as_file(), 0, 0).is_ok());
    }
}
