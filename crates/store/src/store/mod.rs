//! The content-addressable store facade
//!
//! `put` streams a source into a staged file while hashing it, derives the
//! sharded path from the digest and links the staged file into place.
//! Lookups validate the digest and stat the derived path. Enumeration and
//! the corruption scan walk the whole tree on every call; there is no index.

mod builder;
mod operations;
mod scan;
mod sweep;
mod types;

pub use scan::{Corrupted, Corruption, Files};
pub use sweep::SweepReport;
pub use types::Store;

#[cfg(test)]
mod tests;
