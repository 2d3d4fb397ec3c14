//! Storing content

use crate::address::Address;
use crate::source::{Chunk, Source};
use hashstore_core::{Error, Result};
use std::fs;
use std::io::{self, Read, Seek, Write};
use std::path::Path;
use tracing::{debug, instrument};

use crate::store::types::Store;

impl Store {
    /// Store the bytes of `source` and return where they live.
    ///
    /// Storing content that is already present succeeds with
    /// `is_duplicate` set; the existing file is left untouched.
    #[instrument(skip_all, fields(root = %self.inner.root.display()))]
    pub fn put<'a>(&self, source: impl Into<Source<'a>>) -> Result<Address> {
        let source = source.into();
        if let Source::Path(path) = &source {
            self.check_path_source(path)?;
        }
        let kind = source.kind();

        let mut staged = self.inner.staging.stage()?;
        let digest = self
            .inner
            .engine
            .hash_source(source, Some(&mut staged as &mut dyn Write))?;
        if let Err(e) = staged.finish() {
            return Err(Error::file_system(staged.path(), "sync staged file", e));
        }

        let final_path = self.inner.sharder.join(&self.inner.root, &digest);
        let outcome = self.inner.committer.commit(staged, &final_path)?;

        debug!(
            %digest,
            source = kind,
            duplicate = outcome.is_duplicate(),
            "stored content"
        );

        Ok(Address::new(
            digest,
            final_path,
            outcome.is_duplicate(),
            &self.inner.root,
        ))
    }

    pub fn put_bytes(&self, bytes: &[u8]) -> Result<Address> {
        self.put(Source::Bytes(bytes))
    }

    pub fn put_str(&self, text: &str) -> Result<Address> {
        self.put(Source::Text(text))
    }

    /// Store a copy of the regular file at `path`, which must lie outside
    /// the store root
    pub fn put_file(&self, path: impl AsRef<Path>) -> Result<Address> {
        self.put(Source::Path(path.as_ref()))
    }

    /// Store everything `reader` yields, consuming it
    pub fn put_reader<R: Read>(&self, reader: &mut R) -> Result<Address> {
        self.put(Source::Reader(reader))
    }

    /// Store from the handle's current position to its end and leave the
    /// handle where it was
    pub fn put_handle<H: Read + Seek>(&self, handle: &mut H) -> Result<Address> {
        self.put(Source::Handle(handle))
    }

    /// Store the concatenation of a stream of text or byte chunks
    pub fn put_chunks<'a, I>(&self, chunks: I) -> Result<Address>
    where
        I: IntoIterator<Item = io::Result<Chunk>>,
        I::IntoIter: 'a,
    {
        self.put(Source::Chunks(Box::new(chunks.into_iter())))
    }

    /// Digest `source` would be stored under, without storing it
    pub fn digest_of<'a>(&self, source: impl Into<Source<'a>>) -> Result<String> {
        let source = source.into();
        if let Source::Path(path) = &source {
            ensure_regular_file(path)?;
        }
        self.inner.engine.hash_source(source, None)
    }

    /// Reject path sources that are not regular files or that point back
    /// into the store
    fn check_path_source(&self, path: &Path) -> Result<()> {
        ensure_regular_file(path)?;

        let resolved = match path.canonicalize() {
            Ok(resolved) => resolved,
            Err(e) => return Err(Error::file_system(path, "resolve source path", e)),
        };
        if resolved.starts_with(&self.inner.root) {
            return Err(Error::path_containment(resolved, &self.inner.root));
        }
        Ok(())
    }
}

fn ensure_regular_file(path: &Path) -> Result<()> {
    match fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => Ok(()),
        Ok(_) => Err(Error::malformed_source(format!(
            "'{}' is not a regular file",
            path.display()
        ))),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(Error::malformed_source(format!(
            "'{}' does not exist",
            path.display()
        ))),
        Err(e) => Err(Error::file_system(path, "inspect source path", e)),
    }
}
