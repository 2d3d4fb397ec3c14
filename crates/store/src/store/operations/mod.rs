//! Store operations

mod get;
mod put;
mod remove;
