//! Chunk partitioner: file list in, [`ChunkSet`] out
//!
//! A file list is UTF-8 text with one absolute path per line. Trailing
//! whitespace is trimmed and blank lines are skipped. Files that cannot be
//! opened or stat'ed, are empty, or are not regular files are skipped and
//! counted; only an unreadable list is an error.

use crate::chunk::ChunkSet;
use crate::hints;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use warmstart_core::{constants::DEFAULT_BLOCK_SIZE, Error, Result};

/// Why a listed file was left out of the chunk set
#[derive(Debug)]
pub enum SkipReason {
    /// Neither the no-atime nor the plain read-only open succeeded
    Unopenable(io::Error),
    /// The file opened but its metadata could not be read
    StatFailed(io::Error),
    /// Zero bytes at load time
    Empty,
    /// Not a regular file (directory, device, ...)
    NotAFile,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Unopenable(e) => write!(f, "open failed: {e}"),
            SkipReason::StatFailed(e) => write!(f, "fstat failed: {e}"),
            SkipReason::Empty => write!(f, "empty file"),
            SkipReason::NotAFile => write!(f, "not a regular file"),
        }
    }
}

/// A listed path that was not admitted
#[derive(Debug)]
pub struct SkippedFile {
    /// 1-based line number in the list
    pub line: usize,
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// Outcome counts of one `prepare` call
#[derive(Debug, Default)]
pub struct PrepareSummary {
    /// Lines read from the list, blank ones included
    pub lines: usize,
    pub blank_lines: usize,
    pub opened: usize,
    pub skipped: Vec<SkippedFile>,
    pub chunks: usize,
    pub bytes: u64,
}

impl PrepareSummary {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

impl fmt::Display for PrepareSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} lines, {} files loaded, {} skipped, {} chunks prepared",
            self.lines,
            self.opened,
            self.skipped.len(),
            self.chunks
        )
    }
}

/// Turns file lists into chunk sets of at most `block_size` bytes per chunk
#[derive(Debug, Clone, Copy)]
pub struct Partitioner {
    block_size: u64,
}

impl Default for Partitioner {
    fn default() -> Self {
        Self::new(DEFAULT_BLOCK_SIZE)
    }
}

impl Partitioner {
    pub fn new(block_size: u64) -> Self {
        Self {
            block_size: block_size.max(1),
        }
    }

    pub fn block_size(&self) -> u64 {
        self.block_size
    }

    /// Open every file named in the list at `list_path` and partition it.
    ///
    /// Fails with [`Error::ListUnavailable`] only when the list itself cannot
    /// be opened.
    pub fn prepare(&self, list_path: &Path) -> Result<(ChunkSet, PrepareSummary)> {
        let list = File::open(list_path).map_err(|e| Error::list_unavailable(list_path, e))?;
        Ok(self.prepare_from_reader(BufReader::new(list), list_path))
    }

    /// Partition the files named by an already open list. `origin` only
    /// labels diagnostics.
    pub fn prepare_from_reader<R: BufRead>(
        &self,
        mut reader: R,
        origin: &Path,
    ) -> (ChunkSet, PrepareSummary) {
        let mut chunks = ChunkSet::new();
        let mut summary = PrepareSummary::default();
        let mut line = Vec::new();

        loop {
            line.clear();
            match reader.read_until(b'\n', &mut line) {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(
                        list = %origin.display(),
                        line = summary.lines + 1,
                        error = %e,
                        "stopped reading file list"
                    );
                    break;
                }
            }
            summary.lines += 1;

            let trimmed = trim_trailing_whitespace(&line);
            if trimmed.is_empty() {
                summary.blank_lines += 1;
                tracing::warn!(
                    list = %origin.display(),
                    line = summary.lines,
                    "line is empty, skipping"
                );
                continue;
            }

            let path = path_from_bytes(trimmed);
            match self.admit(&path, &mut chunks) {
                Ok(added) => {
                    summary.opened += 1;
                    summary.chunks += added;
                }
                Err(reason) => {
                    tracing::warn!(path = %path.display(), %reason, "skipping file");
                    summary.skipped.push(SkippedFile {
                        line: summary.lines,
                        path,
                        reason,
                    });
                }
            }
        }

        summary.bytes = chunks.total_bytes();
        tracing::info!(
            list = %origin.display(),
            lines = summary.lines,
            opened = summary.opened,
            skipped = summary.skipped.len(),
            chunks = summary.chunks,
            "file list prepared"
        );
        (chunks, summary)
    }

    /// Open, validate and partition one file
    fn admit(&self, path: &Path, chunks: &mut ChunkSet) -> std::result::Result<usize, SkipReason> {
        let (file, noatime) = hints::open_read_only(path).map_err(SkipReason::Unopenable)?;
        if noatime {
            tracing::debug!(path = %path.display(), "opened");
        } else {
            tracing::debug!(path = %path.display(), "opened without O_NOATIME");
        }

        let metadata = file.metadata().map_err(SkipReason::StatFailed)?;
        if !metadata.is_file() {
            return Err(SkipReason::NotAFile);
        }
        let size = metadata.len();
        if size == 0 {
            return Err(SkipReason::Empty);
        }

        // Best effort, a refused hint does not affect admission
        let _ = hints::fadvise_sequential(&file);
        let _ = hints::fadvise_willneed(&file, 0, 0);

        let added = chunks.push_file(path, file, size, self.block_size, noatime);
        tracing::info!(path = %path.display(), size, chunks = added, "file added");
        Ok(added)
    }
}

fn trim_trailing_whitespace(line: &[u8]) -> &[u8] {
    let end = line
        .iter()
        .rposition(|b| !matches!(b, b' ' | b'\t' | b'\r' | b'\n'))
        .map_or(0, |i| i + 1);
    &line[..end]
}

fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    PathBuf::from(OsStr::from_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_trailing_whitespace() {
        assert_eq!(trim_trailing_whitespace(b"/a/b\r\n"), b"/a/b");
        assert_eq!(trim_trailing_whitespace(b"/a/b \t\n"), b"/a/b");
        assert_eq!(trim_trailing_whitespace(b"  /a/b"), b"  /a/b");
        assert_eq!(trim_trailing_whitespace(b" \r\n"), b"");
        assert_eq!(trim_trailing_whitespace(b""), b"");
    }

    #[test]
    fn test_summary_display() {
        let summary = PrepareSummary {
            lines: 5,
            blank_lines: 1,
            opened: 3,
            skipped: vec![SkippedFile {
                line: 2,
                path: PathBuf::from("/missing"),
                reason: SkipReason::Empty,
            }],
            chunks: 7,
            bytes: 0,
        };
        assert_eq!(
            summary.to_string(),
            "5 lines, 3 files loaded, 1 skipped, 7 chunks prepared"
        );
    }

    #[test]
    fn test_list_from_reader_without_trailing_newline() {
        let (chunks, summary) = Partitioner::default()
            .prepare_from_reader(&b"\n/nonexistent/one"[..], Path::new("inline"));

        assert!(chunks.is_empty());
        assert_eq!(summary.lines, 2);
        assert_eq!(summary.blank_lines, 1);
        assert_eq!(summary.skipped_count(), 1);
        assert_eq!(summary.skipped[0].line, 2);
        assert!(matches!(summary.skipped[0].reason, SkipReason::Unopenable(_)));
    }

    #[test]
    fn test_whitespace_only_line_is_blank_not_skipped() {
        let (chunks, summary) =
            Partitioner::default().prepare_from_reader(&b"   \n\t\r\n"[..], Path::new("inline"));

        assert!(chunks.is_empty());
        assert_eq!(summary.lines, 2);
        assert_eq!(summary.blank_lines, 2);
        assert_eq!(summary.opened, 0);
        assert_eq!(summary.skipped_count(), 0);
    }
}
