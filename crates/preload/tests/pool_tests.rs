//! Worker pool distribution and aggregation

use parking_lot::Mutex;
use std::fs::File;
use std::io::Write;
use tempfile::TempDir;
use warmstart_preload::{ChunkSet, Partitioner, ReadWarmer, WorkerPool};

fn chunk_set(bytes: usize, block: u64) -> (TempDir, ChunkSet) {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("data.bin");
    File::create(&data)
        .unwrap()
        .write_all(&vec![7u8; bytes])
        .unwrap();
    let list = dir.path().join("list.txt");
    std::fs::write(&list, format!("{}\n", data.display())).unwrap();

    let (chunks, _) = Partitioner::new(block).prepare(&list).unwrap();
    (dir, chunks)
}

#[test]
fn test_every_chunk_processed_exactly_once() {
    let (_dir, chunks) = chunk_set(97 * 512 + 13, 512);
    assert_eq!(chunks.len(), 98);

    for workers in [1, 2, 4, 7, 16, 200] {
        let visited = Mutex::new(Vec::new());
        let report = WorkerPool::new(workers).drain(&chunks, |index, chunk, _| {
            visited.lock().push(index);
            chunk.len()
        });

        let mut visited = visited.into_inner();
        assert_eq!(visited.len(), chunks.len(), "workers = {workers}");
        visited.sort_unstable();
        visited.dedup();
        assert_eq!(visited, (0..chunks.len()).collect::<Vec<_>>());
        assert_eq!(report.total_bytes, chunks.total_bytes());
    }
}

#[test]
fn test_read_warmer_warms_every_byte() {
    let (_dir, chunks) = chunk_set(1_000_000, 64 * 1024);

    let report = WorkerPool::new(4).run(&chunks, &ReadWarmer);

    assert_eq!(report.total_bytes, 1_000_000);
    assert_eq!(report.chunks, chunks.len());
    assert!(report.gib_per_sec() >= 0.0);
}

#[test]
fn test_empty_set_returns_immediately() {
    let report = WorkerPool::new(4).drain(&ChunkSet::new(), |_, _, _| {
        panic!("no chunk should be handed out")
    });

    assert_eq!(report.total_bytes, 0);
    assert!(report.elapsed.is_zero());
    assert_eq!(report.gib_per_sec(), 0.0);
}

#[test]
fn test_scratch_is_bounded_by_largest_chunk() {
    let (_dir, chunks) = chunk_set(3_000, 16 * 1024 * 1024);

    let capacities = Mutex::new(Vec::new());
    WorkerPool::new(2).drain(&chunks, |_, chunk, scratch| {
        capacities.lock().push(scratch.capacity());
        chunk.len()
    });

    assert_eq!(capacities.into_inner(), vec![3_000]);
}
