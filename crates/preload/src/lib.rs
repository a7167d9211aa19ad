//! Page-cache preloading engine for warmstart
//!
//! A file list is partitioned once into bounded [`Chunk`]s ([`Partitioner`]).
//! Each [`PreloadSession`] run drains those chunks through a fixed-size
//! [`WorkerPool`], warming every byte range with the [`PageWarmer`] chosen for
//! the session, and returns a [`SessionReport`] with aggregate throughput.
//!
//! Unix only: list paths are raw bytes and fallback reads are positional.

#[cfg(not(unix))]
compile_error!("warmstart-preload supports unix targets only");

pub mod chunk;
pub mod hints;
pub mod partition;
pub mod pool;
pub mod report;
pub mod session;
pub mod warmer;

pub use chunk::{chunk_ranges, Chunk, ChunkSet, PreparedFile};
pub use partition::{Partitioner, PrepareSummary, SkipReason, SkippedFile};
pub use pool::WorkerPool;
pub use report::SessionReport;
pub use session::{PreloadOptions, PreloadSession};
pub use warmer::{
    probe, select_warmer, PageWarmer, ReadWarmer, ReadaheadWarmer, ScratchBuffer, WarmStrategy,
};
