//! Core errors and constants for the `hashstore` workspace.
//!
//! ## Key Components
//!
//! - **`errors`**: Defines the primary `Error` enum, its fieldless `ErrorKind`
//!   discriminant and the `Result` type alias shared by every crate.
//! - **`constants`**: Default store shape, permission bits and the names of
//!   the environment variables the configuration layer reads.

pub mod constants;
pub mod errors;

pub use self::{
    constants::*,
    errors::{Error, ErrorKind, Result},
};
