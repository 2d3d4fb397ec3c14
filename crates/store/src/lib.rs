//! Content-addressable file storage
//!
//! Files are named by the hex digest of their content and placed in a
//! sharded directory tree under a root:
//!
//! ```text
//! root/2/c/2/2c26b46b68ffc68ff99b453c1d30413413422d706483bfa0f98a5e886266e7ae
//! ```
//!
//! Writes stream into a staged file on the same filesystem and are then
//! hard-linked into place. Because link creation fails when the target
//! exists, concurrent writers of identical content need no locking:
//! exactly one of them creates the file and the rest see a duplicate.
//!
//! ```no_run
//! use hashstore_store::Store;
//!
//! let store = Store::at("/var/lib/hashstore")?;
//! let address = store.put_bytes(b"foo")?;
//! assert!(store.exists(&address.digest)?);
//! # Ok::<(), hashstore_core::Error>(())
//! ```

pub mod address;
pub mod algorithm;
pub mod commit;
pub mod config;
pub mod hashing;
mod permissions;
pub mod shard;
pub mod source;
pub mod staging;
pub mod store;

pub use address::Address;
pub use algorithm::HashAlgorithm;
pub use commit::{CommitOutcome, Committer};
pub use config::{StoreConfig, StoreConfigBuilder};
pub use hashing::DigestEngine;
pub use hashstore_core::{Error, ErrorKind, Result};
pub use shard::{unshard, PathSharder};
pub use source::{Chunk, ChunkStream, ReadSeek, Source};
pub use staging::{StagedFile, StagingArea};
pub use store::{Corrupted, Corruption, Files, Store, SweepReport};
