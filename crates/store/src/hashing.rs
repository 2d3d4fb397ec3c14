//! Streaming digest computation
//!
//! Every source shape is funnelled through the same fixed-size block loop.
//! When a mirror is supplied each block is written to it as soon as it has
//! been hashed, which is how `put` fills its staged file in a single pass.

use crate::algorithm::HashAlgorithm;
use crate::source::{ChunkStream, ReadSeek, Source};
use hashstore_core::{Error, Result};
use std::fs::File;
use std::io::{self, Cursor, Read, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::trace;

/// Computes hex digests of byte sources, optionally mirroring the bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigestEngine {
    algorithm: HashAlgorithm,
    block_size: usize,
}

impl DigestEngine {
    pub fn new(algorithm: HashAlgorithm, block_size: usize) -> Self {
        Self {
            algorithm,
            block_size: block_size.max(1),
        }
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Hash everything `reader` yields until end of stream
    pub fn hash_reader<R: Read + ?Sized>(
        &self,
        reader: &mut R,
        mut mirror: Option<&mut dyn Write>,
    ) -> io::Result<String> {
        let mut hasher = self.algorithm.hasher();
        let mut buffer = vec![0u8; self.block_size];
        let mut total = 0u64;

        loop {
            let bytes_read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };

            let block = &buffer[..bytes_read];
            hasher.update(block);
            if let Some(mirror) = mirror.as_mut() {
                mirror.write_all(block)?;
            }
            total += bytes_read as u64;
        }

        trace!(bytes = total, algorithm = %self.algorithm, "hashed stream");
        Ok(hex::encode(hasher.finalize()))
    }

    /// Hash the contents of the file at `path`
    pub fn hash_file(&self, path: &Path, mirror: Option<&mut dyn Write>) -> Result<String> {
        let mut file =
            File::open(path).map_err(|e| Error::file_system(path, "open file for hashing", e))?;
        self.hash_reader(&mut file, mirror)
            .map_err(|e| Error::file_system(path, "read file for hashing", e))
    }

    /// Hash from the handle's current position to its end, then seek it
    /// back to where it started so the caller can keep using it.
    pub fn hash_handle(
        &self,
        handle: &mut dyn ReadSeek,
        mirror: Option<&mut dyn Write>,
    ) -> io::Result<String> {
        let start = handle.stream_position()?;
        let hashed = self.hash_reader(&mut *handle, mirror);
        let restored = handle.seek(SeekFrom::Start(start));

        let digest = hashed?;
        restored?;
        Ok(digest)
    }

    /// Hash a stream of text or byte chunks
    pub fn hash_chunks(
        &self,
        chunks: ChunkStream<'_>,
        mut mirror: Option<&mut dyn Write>,
    ) -> io::Result<String> {
        let mut hasher = self.algorithm.hasher();

        for chunk in chunks {
            let chunk = chunk?;
            // Re-block large chunks so writes stay bounded
            for block in chunk.as_bytes().chunks(self.block_size) {
                hasher.update(block);
                if let Some(mirror) = mirror.as_mut() {
                    mirror.write_all(block)?;
                }
            }
        }

        Ok(hex::encode(hasher.finalize()))
    }

    /// Hash any supported source shape
    pub fn hash_source(&self, source: Source<'_>, mirror: Option<&mut dyn Write>) -> Result<String> {
        let kind = source.kind();
        let stream_error = |e: io::Error| {
            Error::file_system(PathBuf::from(format!("<{kind}>")), "hash source", e)
        };

        match source {
            Source::Bytes(bytes) => self
                .hash_reader(&mut Cursor::new(bytes), mirror)
                .map_err(stream_error),
            Source::Text(text) => self
                .hash_reader(&mut Cursor::new(text.as_bytes()), mirror)
                .map_err(stream_error),
            Source::Path(path) => self.hash_file(path, mirror),
            Source::Handle(handle) => self.hash_handle(handle, mirror).map_err(stream_error),
            Source::Reader(reader) => self.hash_reader(reader, mirror).map_err(stream_error),
            Source::Chunks(chunks) => self.hash_chunks(chunks, mirror).map_err(stream_error),
        }
    }
}
