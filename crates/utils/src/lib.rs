//! Shared utilities for hashstore
//!
//! This crate provides the ambient pieces used across the workspace:
//! tracing setup, scoped umask changes and XDG default locations.

pub mod tracing;
pub mod umask;
pub mod xdg;

pub use umask::*;
pub use xdg::*;
