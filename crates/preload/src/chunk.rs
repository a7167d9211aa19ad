//! Chunk descriptors and the immutable set a session works through

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A contiguous byte range of one open file.
///
/// Chunks never cross file boundaries. The file handle is shared read-only by
/// every chunk of that file and closed once the last chunk referring to it is
/// dropped.
#[derive(Debug, Clone)]
pub struct Chunk {
    file: Arc<File>,
    offset: u64,
    len: u64,
}

impl Chunk {
    pub fn new(file: Arc<File>, offset: u64, len: u64) -> Self {
        Self { file, offset, len }
    }

    pub fn file(&self) -> &File {
        &self.file
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// One past the last byte of the range
    pub fn end(&self) -> u64 {
        self.offset + self.len
    }
}

/// Split `[0, size)` into consecutive `(offset, len)` ranges of at most
/// `block_size` bytes. Only the last range may be shorter.
pub fn chunk_ranges(size: u64, block_size: u64) -> impl Iterator<Item = (u64, u64)> {
    let block = block_size.max(1);
    (0..size.div_ceil(block)).map(move |i| {
        let offset = i * block;
        (offset, block.min(size - offset))
    })
}

/// A file admitted into a [`ChunkSet`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedFile {
    pub path: PathBuf,
    pub size: u64,
    pub chunks: usize,
    /// Opened without updating its access time
    pub noatime: bool,
}

/// Ordered chunks of every admitted file, built once and read-only afterwards
#[derive(Debug, Default)]
pub struct ChunkSet {
    chunks: Vec<Chunk>,
    files: Vec<PreparedFile>,
}

impl ChunkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every chunk of an opened file of `size` bytes, returning how
    /// many chunks were added
    pub fn push_file(
        &mut self,
        path: impl AsRef<Path>,
        file: File,
        size: u64,
        block_size: u64,
        noatime: bool,
    ) -> usize {
        let file = Arc::new(file);
        let before = self.chunks.len();
        self.chunks.extend(
            chunk_ranges(size, block_size).map(|(offset, len)| Chunk::new(file.clone(), offset, len)),
        );
        let added = self.chunks.len() - before;

        self.files.push(PreparedFile {
            path: path.as_ref().to_path_buf(),
            size,
            chunks: added,
            noatime,
        });
        added
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Chunk> {
        self.chunks.iter()
    }

    pub fn files(&self) -> &[PreparedFile] {
        &self.files
    }

    /// Sum of all chunk lengths
    pub fn total_bytes(&self) -> u64 {
        self.chunks.iter().map(Chunk::len).sum()
    }

    /// Longest chunk, which bounds the scratch buffer a worker needs
    pub fn max_chunk_len(&self) -> u64 {
        self.chunks.iter().map(Chunk::len).max().unwrap_or(0)
    }

    /// Handle of the first admitted file, used to probe kernel capabilities
    pub fn first_file(&self) -> Option<&File> {
        self.chunks.first().map(Chunk::file)
    }
}

impl<'a> IntoIterator for &'a ChunkSet {
    type Item = &'a Chunk;
    type IntoIter = std::slice::Iter<'a, Chunk>;

    fn into_iter(self) -> Self::IntoIter {
        self.chunks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::tempfile;

    const MIB: u64 = 1024 * 1024;

    #[test]
    fn test_ranges_exact_multiple() {
        let ranges: Vec<_> = chunk_ranges(32 * MIB, 16 * MIB).collect();
        assert_eq!(ranges, vec![(0, 16 * MIB), (16 * MIB, 16 * MIB)]);
    }

    #[test]
    fn test_ranges_with_remainder() {
        let ranges: Vec<_> = chunk_ranges(20 * MIB, 16 * MIB).collect();
        assert_eq!(ranges, vec![(0, 16 * MIB), (16 * MIB, 4 * MIB)]);
    }

    #[test]
    fn test_ranges_empty_and_tiny() {
        assert_eq!(chunk_ranges(0, 16 * MIB).count(), 0);
        assert_eq!(chunk_ranges(1, 16 * MIB).collect::<Vec<_>>(), vec![(0, 1)]);
    }

    #[test]
    fn test_push_file_records_file_and_shares_handle() {
        let mut set = ChunkSet::new();
        let added = set.push_file("/data/app.bin", tempfile().unwrap(), 10, 4, true);

        assert_eq!(added, 3);
        assert_eq!(set.len(), 3);
        assert_eq!(set.total_bytes(), 10);
        assert_eq!(set.max_chunk_len(), 4);
        assert_eq!(set.files()[0].chunks, 3);
        assert!(set.files()[0].noatime);
        assert_eq!(Arc::strong_count(&set.chunks[0].file), 3);
    }

    proptest! {
        #[test]
        fn prop_ranges_cover_file_exactly(size in 0u64..1_000_000, block in 1u64..70_000) {
            let ranges: Vec<_> = chunk_ranges(size, block).collect();

            let total: u64 = ranges.iter().map(|(_, len)| len).sum();
            prop_assert_eq!(total, size);

            let mut expected_offset = 0;
            for (i, (offset, len)) in ranges.iter().enumerate() {
                prop_assert_eq!(*offset, expected_offset);
                prop_assert!(*len <= block);
                prop_assert!(*len > 0);
                if i + 1 < ranges.len() {
                    prop_assert_eq!(*len, block);
                }
                expected_offset += len;
            }
        }
    }
}
