//! Pure data types for phosphor: paths, directory entries, errors, chat modes.
//!
//! This crate is a leaf dependency with no async runtime and no I/O. The
//! kernel and the REPL share these types so that neither needs to know how
//! the other represents a path or an error.

pub mod entry;
pub mod error;
pub mod mode;
pub mod path;

// Flat re-exports for convenience
pub use entry::*;
pub use error::*;
pub use mode::*;
pub use path::*;
