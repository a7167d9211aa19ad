//! Preload session: one application's chunk set, reusable across runs
//!
//! The file list is partitioned once when the session is prepared. Every
//! [`PreloadSession::run`] drains the same chunks through a fresh worker pool
//! and logs the resulting throughput. The open file handles live as long as
//! the session.

use crate::chunk::ChunkSet;
use crate::partition::{Partitioner, PrepareSummary};
use crate::pool::WorkerPool;
use crate::report::SessionReport;
use crate::warmer::{select_warmer, PageWarmer, WarmStrategy};
use std::path::{Path, PathBuf};
use warmstart_core::constants::{DEFAULT_BLOCK_SIZE, DEFAULT_WORKERS};

/// Engine tunables shared by every session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreloadOptions {
    pub block_size: u64,
    pub workers: usize,
}

impl Default for PreloadOptions {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            workers: DEFAULT_WORKERS,
        }
    }
}

/// A prepared chunk set plus the pool and warmer that process it
pub struct PreloadSession {
    label: String,
    list_path: Option<PathBuf>,
    chunks: ChunkSet,
    summary: Option<PrepareSummary>,
    warmer: Box<dyn PageWarmer>,
    pool: WorkerPool,
    runs: u64,
}

impl std::fmt::Debug for PreloadSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreloadSession")
            .field("label", &self.label)
            .field("list_path", &self.list_path)
            .field("chunks", &self.chunks.len())
            .field("strategy", &self.warmer.strategy())
            .field("workers", &self.pool.workers())
            .field("runs", &self.runs)
            .finish()
    }
}

impl PreloadSession {
    /// Partition the file list at `list_path` for the application `label`.
    ///
    /// An unreadable list is logged and yields a session with no chunks, so
    /// every later run is a no-op rather than an error.
    pub fn prepare(label: impl Into<String>, list_path: &Path, options: &PreloadOptions) -> Self {
        let label = label.into();
        let partitioner = Partitioner::new(options.block_size);

        let (chunks, summary) = match partitioner.prepare(list_path) {
            Ok((chunks, summary)) => (chunks, Some(summary)),
            Err(e) => {
                tracing::error!(app = %label, error = %e, "no preload possible");
                (ChunkSet::new(), None)
            }
        };

        let mut session = Self::from_chunks(label, chunks, options);
        session.list_path = Some(list_path.to_path_buf());
        session.summary = summary;
        session
    }

    /// Wrap an already built chunk set
    pub fn from_chunks(
        label: impl Into<String>,
        chunks: ChunkSet,
        options: &PreloadOptions,
    ) -> Self {
        let warmer = select_warmer(&chunks);
        let label = label.into();
        tracing::debug!(
            app = %label,
            chunks = chunks.len(),
            strategy = %warmer.strategy(),
            "preload session ready"
        );

        Self {
            label,
            list_path: None,
            chunks,
            summary: None,
            warmer,
            pool: WorkerPool::new(options.workers),
            runs: 0,
        }
    }

    /// Warm every chunk once, blocking until the pool has finished
    pub fn run(&mut self) -> SessionReport {
        self.runs += 1;
        if self.chunks.is_empty() {
            tracing::info!(app = %self.label, "no chunks to preload");
            return SessionReport::empty();
        }

        let report = self.pool.run(&self.chunks, self.warmer.as_ref());
        tracing::info!(
            app = %self.label,
            gib = report.gib(),
            elapsed_secs = report.elapsed_secs(),
            gib_per_sec = report.gib_per_sec(),
            "{report}"
        );
        report
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn list_path(&self) -> Option<&Path> {
        self.list_path.as_deref()
    }

    pub fn chunks(&self) -> &ChunkSet {
        &self.chunks
    }

    /// Partition outcome, `None` when the list could not be opened or the
    /// session was built from ready-made chunks
    pub fn summary(&self) -> Option<&PrepareSummary> {
        self.summary.as_ref()
    }

    pub fn strategy(&self) -> WarmStrategy {
        self.warmer.strategy()
    }

    pub fn runs(&self) -> u64 {
        self.runs
    }
}
