//! Virtual filesystem: an immutable in-memory tree behind shell verbs.
//!
//! ```text
//!   "cat docs/log.txt"
//!        │
//!        ▼
//!   VirtualFs::execute ──▶ resolve_path ──▶ read / list ──▶ FsOutput
//!        │                                               (text, new cwd)
//!        └── unknown verb ──▶ None (caller routes elsewhere)
//! ```
//!
//! Nothing here touches the host filesystem.

mod commands;
pub mod fixture;
mod fs;
mod node;

pub use commands::{FsOutput, VERBS};
pub use fs::{Completion, MatchCase, VirtualFs};
pub use node::{Node, NodeKind};
