//! Byte sources accepted by `Store::put`

use std::io::{self, Read, Seek};
use std::path::{Path, PathBuf};

/// A readable handle that can also report and restore its position
pub trait ReadSeek: Read + Seek {}

impl<T: Read + Seek + ?Sized> ReadSeek for T {}

/// One piece of a chunked stream; text is hashed as its UTF-8 bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chunk {
    Text(String),
    Bytes(Vec<u8>),
}

impl Chunk {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Chunk::Text(text) => text.as_bytes(),
            Chunk::Bytes(bytes) => bytes,
        }
    }
}

impl From<String> for Chunk {
    fn from(text: String) -> Self {
        Chunk::Text(text)
    }
}

impl From<&str> for Chunk {
    fn from(text: &str) -> Self {
        Chunk::Text(text.to_string())
    }
}

impl From<Vec<u8>> for Chunk {
    fn from(bytes: Vec<u8>) -> Self {
        Chunk::Bytes(bytes)
    }
}

impl From<&[u8]> for Chunk {
    fn from(bytes: &[u8]) -> Self {
        Chunk::Bytes(bytes.to_vec())
    }
}

/// Boxed iterator of chunks, e.g. a request body
pub type ChunkStream<'a> = Box<dyn Iterator<Item = io::Result<Chunk>> + 'a>;

/// Where the bytes of a `put` come from
pub enum Source<'a> {
    /// In-memory bytes
    Bytes(&'a [u8]),
    /// In-memory text, stored as UTF-8
    Text(&'a str),
    /// Path to an existing regular file outside the store
    Path(&'a Path),
    /// An open handle; its position is restored after hashing
    Handle(&'a mut dyn ReadSeek),
    /// A forward-only reader, consumed to the end
    Reader(&'a mut dyn Read),
    /// A stream of text or byte chunks
    Chunks(ChunkStream<'a>),
}

impl<'a> Source<'a> {
    /// Wrap any iterator of chunk-like items
    pub fn chunks<I, C>(chunks: I) -> Self
    where
        I: IntoIterator<Item = C>,
        I::IntoIter: 'a,
        C: Into<Chunk> + 'a,
    {
        Source::Chunks(Box::new(
            chunks
                .into_iter()
                .map(|chunk| -> io::Result<Chunk> { Ok(chunk.into()) }),
        ))
    }

    /// Short label used in logs and error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Source::Bytes(_) => "bytes",
            Source::Text(_) => "text",
            Source::Path(_) => "path",
            Source::Handle(_) => "handle",
            Source::Reader(_) => "reader",
            Source::Chunks(_) => "chunks",
        }
    }
}

impl std::fmt::Debug for Source<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Source::Text(text) => f.debug_tuple("Text").field(&text.len()).finish(),
            Source::Path(path) => f.debug_tuple("Path").field(path).finish(),
            other => f.debug_tuple(other.kind()).finish(),
        }
    }
}

impl<'a> From<&'a [u8]> for Source<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Source::Bytes(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Source<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        Source::Bytes(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for Source<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        Source::Bytes(bytes)
    }
}

impl<'a> From<&'a str> for Source<'a> {
    fn from(text: &'a str) -> Self {
        Source::Text(text)
    }
}

impl<'a> From<&'a String> for Source<'a> {
    fn from(text: &'a String) -> Self {
        Source::Text(text)
    }
}

impl<'a> From<&'a Path> for Source<'a> {
    fn from(path: &'a Path) -> Self {
        Source::Path(path)
    }
}

impl<'a> From<&'a PathBuf> for Source<'a> {
    fn from(path: &'a PathBuf) -> Self {
        Source::Path(path)
    }
}
