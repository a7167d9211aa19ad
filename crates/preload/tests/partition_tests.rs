//! Partitioning real file lists into chunk sets

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use warmstart_preload::{Partitioner, SkipReason};

const MIB: u64 = 1024 * 1024;

/// Create a sparse file of `size` bytes
fn sized_file(dir: &Path, name: &str, size: u64) -> PathBuf {
    let path = dir.join(name);
    File::create(&path).unwrap().set_len(size).unwrap();
    path
}

fn write_list(dir: &Path, lines: &[String]) -> PathBuf {
    let path = dir.join("files.txt");
    let mut list = File::create(&path).unwrap();
    for line in lines {
        writeln!(list, "{line}").unwrap();
    }
    path
}

#[test]
fn test_twenty_and_five_mib_files() {
    let dir = TempDir::new().unwrap();
    let big = sized_file(dir.path(), "big.bin", 20 * MIB);
    let small = sized_file(dir.path(), "small.bin", 5 * MIB);
    let list = write_list(
        dir.path(),
        &[big.display().to_string(), small.display().to_string()],
    );

    let (chunks, summary) = Partitioner::new(16 * MIB).prepare(&list).unwrap();

    let lengths: Vec<u64> = chunks.iter().map(|c| c.len()).collect();
    assert_eq!(lengths, vec![16 * MIB, 4 * MIB, 5 * MIB]);
    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks.total_bytes(), 25 * MIB);
    assert_eq!(summary.opened, 2);
    assert_eq!(summary.chunks, 3);
    assert_eq!(summary.bytes, 25 * MIB);

    let files = chunks.files();
    assert_eq!(files[0].path, big);
    assert_eq!(files[0].chunks, 2);
    assert_eq!(files[1].size, 5 * MIB);
}

#[test]
fn test_chunks_of_each_file_are_contiguous() {
    let dir = TempDir::new().unwrap();
    let sizes = [1u64, 4095, 4096, 4097, 3 * 4096 + 17];
    let paths: Vec<String> = sizes
        .iter()
        .enumerate()
        .map(|(i, size)| {
            sized_file(dir.path(), &format!("f{i}"), *size)
                .display()
                .to_string()
        })
        .collect();
    let list = write_list(dir.path(), &paths);

    let (chunks, _) = Partitioner::new(4096).prepare(&list).unwrap();

    let mut cursor = 0;
    for (file, size) in chunks.files().iter().zip(sizes) {
        let own = &chunks.chunks()[cursor..cursor + file.chunks];
        let mut expected_offset = 0;
        for chunk in own {
            assert_eq!(chunk.offset(), expected_offset);
            assert!(chunk.len() <= 4096);
            expected_offset = chunk.end();
        }
        assert_eq!(expected_offset, size);
        cursor += file.chunks;
    }
    assert_eq!(cursor, chunks.len());
}

#[test]
fn test_valid_and_invalid_paths_are_counted() {
    let dir = TempDir::new().unwrap();
    let empty = sized_file(dir.path(), "empty.bin", 0);
    let lines = vec![
        sized_file(dir.path(), "a.bin", 100).display().to_string(),
        "/nonexistent/warmstart/missing.so".to_string(),
        sized_file(dir.path(), "b.bin", 200).display().to_string(),
        empty.display().to_string(),
        dir.path().display().to_string(),
        sized_file(dir.path(), "c.bin", 300).display().to_string(),
    ];
    let list = write_list(dir.path(), &lines);

    let (chunks, summary) = Partitioner::default().prepare(&list).unwrap();

    assert_eq!(summary.lines, 6);
    assert_eq!(summary.opened, 3);
    assert_eq!(summary.skipped_count(), 3);
    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks.total_bytes(), 600);

    let reasons: Vec<&SkipReason> = summary.skipped.iter().map(|s| &s.reason).collect();
    assert!(matches!(reasons[0], SkipReason::Unopenable(_)));
    assert!(matches!(reasons[1], SkipReason::Empty));
    assert!(matches!(reasons[2], SkipReason::NotAFile));
    assert_eq!(summary.skipped[1].path, empty);
    assert_eq!(summary.skipped[0].line, 2);
}

#[test]
fn test_only_invalid_paths_gives_empty_set() {
    let dir = TempDir::new().unwrap();
    let list = write_list(
        dir.path(),
        &["/nonexistent/one".to_string(), "/nonexistent/two".to_string()],
    );

    let (chunks, summary) = Partitioner::default().prepare(&list).unwrap();

    assert!(chunks.is_empty());
    assert_eq!(summary.opened, 0);
    assert_eq!(summary.skipped_count(), 2);
}

#[test]
fn test_blank_lines_and_crlf_are_tolerated() {
    let dir = TempDir::new().unwrap();
    let file = sized_file(dir.path(), "lib.so", 10);
    let list = dir.path().join("crlf.txt");
    fs::write(&list, format!("\r\n{}  \r\n\n", file.display())).unwrap();

    let (chunks, summary) = Partitioner::default().prepare(&list).unwrap();

    assert_eq!(summary.lines, 3);
    assert_eq!(summary.blank_lines, 2);
    assert_eq!(summary.opened, 1);
    assert_eq!(summary.skipped_count(), 0);
    assert_eq!(chunks.files()[0].path, file);
}

#[test]
fn test_missing_list_is_unavailable() {
    let err = Partitioner::default()
        .prepare(Path::new("/nonexistent/warmstart/list.txt"))
        .unwrap_err();

    assert!(err.is_list_unavailable());
    assert!(err.to_string().contains("/nonexistent/warmstart/list.txt"));
}
