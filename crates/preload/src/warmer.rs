//! Page warmers: make one chunk resident in the page cache
//!
//! Two strategies exist. [`ReadaheadWarmer`] queues a non-blocking kernel
//! read-ahead and only reads the range itself when that call is refused.
//! [`ReadWarmer`] always reads the range through a scratch buffer. Which one a
//! session uses is decided once by [`probe`].

use crate::chunk::{Chunk, ChunkSet};
use crate::hints;
use std::fmt;
use std::fs::File;
use std::io;
use warmstart_core::MAX_SCRATCH_SIZE;

/// Page-warming strategy of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarmStrategy {
    /// Kernel `readahead(2)`, zero-copy from the caller's point of view
    Readahead,
    /// Synchronous positional reads into a scratch buffer
    Read,
}

impl fmt::Display for WarmStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarmStrategy::Readahead => write!(f, "readahead"),
            WarmStrategy::Read => write!(f, "read"),
        }
    }
}

/// Per-worker scratch memory, allocated on first use.
///
/// Capacity is clamped to `1..=MAX_SCRATCH_SIZE`.
#[derive(Debug)]
pub struct ScratchBuffer {
    buf: Vec<u8>,
    capacity: usize,
}

impl ScratchBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: Vec::new(),
            capacity: capacity.clamp(1, MAX_SCRATCH_SIZE),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether the backing memory has been allocated yet
    pub fn is_allocated(&self) -> bool {
        !self.buf.is_empty()
    }

    pub fn get(&mut self) -> &mut [u8] {
        if self.buf.is_empty() {
            self.buf = vec![0; self.capacity];
        }
        &mut self.buf
    }
}

/// Makes a chunk's byte range resident in the page cache.
///
/// Implementations never fail: a short read is reported as a smaller byte
/// count, not as an error.
pub trait PageWarmer: Send + Sync {
    fn strategy(&self) -> WarmStrategy;

    /// Warm `chunk`, returning how many of its bytes were made resident
    fn warm(&self, chunk: &Chunk, scratch: &mut ScratchBuffer) -> u64;
}

/// Reads the chunk through the scratch buffer
#[derive(Debug, Default, Clone, Copy)]
pub struct ReadWarmer;

impl PageWarmer for ReadWarmer {
    fn strategy(&self) -> WarmStrategy {
        WarmStrategy::Read
    }

    fn warm(&self, chunk: &Chunk, scratch: &mut ScratchBuffer) -> u64 {
        read_range(chunk.file(), chunk.offset(), chunk.len(), scratch.get())
    }
}

/// Queues kernel read-ahead, reading the chunk when the kernel refuses
#[derive(Debug, Default, Clone, Copy)]
pub struct ReadaheadWarmer {
    fallback: ReadWarmer,
}

impl PageWarmer for ReadaheadWarmer {
    fn strategy(&self) -> WarmStrategy {
        WarmStrategy::Readahead
    }

    fn warm(&self, chunk: &Chunk, scratch: &mut ScratchBuffer) -> u64 {
        match hints::readahead(chunk.file(), chunk.offset(), chunk.len()) {
            Ok(()) => chunk.len(),
            Err(e) => {
                tracing::trace!(offset = chunk.offset(), error = %e, "readahead refused, reading");
                self.fallback.warm(chunk, scratch)
            }
        }
    }
}

/// Read `[offset, offset + len)` of `file` in `buf`-sized steps.
///
/// Stops at end of file or on the first error other than an interruption.
/// Returns the bytes actually read.
fn read_range(file: &File, mut offset: u64, len: u64, buf: &mut [u8]) -> u64 {
    use std::os::unix::fs::FileExt;

    let mut total = 0u64;
    let mut left = len;
    while left > 0 {
        let want = left.min(buf.len() as u64) as usize;
        match file.read_at(&mut buf[..want], offset) {
            Ok(0) => break,
            Ok(n) => {
                offset += n as u64;
                left -= n as u64;
                total += n as u64;
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(_) => break,
        }
    }
    total
}

/// Decide once whether kernel read-ahead works for these chunks.
///
/// A zero-length read-ahead on the first file answers whether the call exists
/// and the file system supports it, without queueing any IO.
pub fn probe(chunks: &ChunkSet) -> WarmStrategy {
    let Some(file) = chunks.first_file() else {
        return WarmStrategy::Read;
    };
    match hints::readahead(file, 0, 0) {
        Ok(()) => WarmStrategy::Readahead,
        Err(e) => {
            tracing::debug!(error = %e, "readahead unavailable, using read fallback");
            WarmStrategy::Read
        }
    }
}

/// Probe and build the warmer a session should use
pub fn select_warmer(chunks: &ChunkSet) -> Box<dyn PageWarmer> {
    match probe(chunks) {
        WarmStrategy::Readahead => Box::new(ReadaheadWarmer::default()),
        WarmStrategy::Read => Box::new(ReadWarmer),
    }
}
