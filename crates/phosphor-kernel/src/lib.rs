//! phosphor-kernel: the core of the phosphor terminal.
//!
//! This crate provides:
//!
//! - **VFS**: An immutable in-memory tree with `ls`, `cd`, `cat`, `pwd`,
//!   `whoami` and prefix completion
//! - **Stream**: Typewriter pacing for streamed chat replies
//! - **Chat**: The remote chat boundary and offline backends
//! - **Router**: Input classification and per-session state
//! - **Script**: Timed canned sequences (boot, Easter eggs)
//! - **History**: Bounded recall history
//! - **Config**: TOML configuration
//! - **Paths**: XDG-compliant path helpers

pub mod chat;
pub mod config;
pub mod history;
pub mod paths;
pub mod router;
pub mod script;
pub mod stream;
pub mod vfs;

pub use chat::{ChatBackend, EchoBackend, FragmentStream, ModePrompts, relay};
pub use config::PhosphorConfig;
pub use history::{CommandHistory, DEFAULT_HISTORY_LIMIT};
pub use router::{ResetKind, Route, Session};
pub use script::{ScriptCatalog, ScriptStep, ScriptedSequence, Trigger, boot_sequence, play};
pub use stream::{
    BacklogPacing, DEFAULT_TICK_INTERVAL, PacingPolicy, PacingStep, StreamCoordinator,
    StreamOutcome, Tick, drive,
};
pub use vfs::{Completion, FsOutput, MatchCase, Node, NodeKind, VERBS, VirtualFs};

// Shared data types, so front-ends need only this crate
pub use phosphor_types::{
    ChatMode, DirEntry, EntryKind, FsError, FsResult, TransportError, UnknownMode, VfsPath,
};
