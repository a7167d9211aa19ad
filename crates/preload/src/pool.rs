//! Fixed-size worker pool draining a shared chunk set
//!
//! Workers claim chunk indices from one cursor behind a single lock and warm
//! each chunk without holding it. Byte counts are kept per worker and merged
//! into the shared total once, when the worker runs out of chunks.

use crate::chunk::{Chunk, ChunkSet};
use crate::report::SessionReport;
use crate::warmer::{PageWarmer, ScratchBuffer};
use parking_lot::Mutex;
use std::thread;
use std::time::Instant;
use warmstart_core::constants::DEFAULT_WORKERS;

/// Cursor and byte total shared by the workers of one run
#[derive(Debug, Default)]
struct Progress {
    next_chunk: usize,
    total_bytes: u64,
}

/// Everything a worker needs, borrowed for the duration of one run
struct SharedContext<'a> {
    chunks: &'a [Chunk],
    progress: Mutex<Progress>,
}

impl<'a> SharedContext<'a> {
    fn new(chunks: &'a [Chunk]) -> Self {
        Self {
            chunks,
            progress: Mutex::new(Progress::default()),
        }
    }

    /// Take the next unprocessed chunk, if any
    fn claim(&self) -> Option<(usize, &'a Chunk)> {
        let mut progress = self.progress.lock();
        let index = progress.next_chunk;
        let chunk = self.chunks.get(index)?;
        progress.next_chunk += 1;
        Some((index, chunk))
    }

    fn merge(&self, bytes: u64) {
        self.progress.lock().total_bytes += bytes;
    }

    fn into_total(self) -> u64 {
        self.progress.into_inner().total_bytes
    }
}

fn worker_loop<F>(ctx: &SharedContext<'_>, scratch_len: usize, work: &F)
where
    F: Fn(usize, &Chunk, &mut ScratchBuffer) -> u64 + Sync,
{
    let mut scratch = ScratchBuffer::new(scratch_len);
    let mut local_bytes = 0u64;
    while let Some((index, chunk)) = ctx.claim() {
        local_bytes += work(index, chunk, &mut scratch);
    }
    ctx.merge(local_bytes);
}

/// A pool of `workers` threads spawned per run and joined before it returns
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    workers: usize,
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new(DEFAULT_WORKERS)
    }
}

impl WorkerPool {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Warm every chunk of `chunks` once with `warmer`
    pub fn run(&self, chunks: &ChunkSet, warmer: &dyn PageWarmer) -> SessionReport {
        self.drain(chunks, |_, chunk, scratch| warmer.warm(chunk, scratch))
    }

    /// Hand every chunk index of `chunks` to `work` exactly once, spread over
    /// the pool's threads, and sum the byte counts it returns.
    ///
    /// Blocks until all workers have joined. An empty set returns a zero
    /// report without spawning anything.
    pub fn drain<F>(&self, chunks: &ChunkSet, work: F) -> SessionReport
    where
        F: Fn(usize, &Chunk, &mut ScratchBuffer) -> u64 + Sync,
    {
        if chunks.is_empty() {
            return SessionReport::empty();
        }

        let scratch_len = usize::try_from(chunks.max_chunk_len()).unwrap_or(usize::MAX);
        let ctx = SharedContext::new(chunks.chunks());
        let started = Instant::now();

        let spawned = thread::scope(|scope| {
            let mut handles = Vec::with_capacity(self.workers);
            for id in 0..self.workers {
                let result = thread::Builder::new()
                    .name(format!("preload-{id}"))
                    .spawn_scoped(scope, || worker_loop(&ctx, scratch_len, &work));
                match result {
                    Ok(handle) => handles.push(handle),
                    Err(e) => {
                        tracing::warn!(worker = id, error = %e, "failed to spawn preload worker")
                    }
                }
            }

            let spawned = handles.len();
            if spawned == 0 {
                // Nothing could be spawned; drain on the calling thread instead
                worker_loop(&ctx, scratch_len, &work);
            }
            for handle in handles {
                if handle.join().is_err() {
                    tracing::error!("preload worker panicked");
                }
            }
            spawned
        });

        let elapsed = started.elapsed();
        SessionReport::new(ctx.into_total(), elapsed, chunks.len(), spawned.max(1))
    }
}
