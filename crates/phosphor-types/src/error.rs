//! Error taxonomy shared by the filesystem and the chat transport.

use thiserror::Error;

/// Result type for virtual filesystem operations.
pub type FsResult<T> = Result<T, FsError>;

/// Virtual filesystem failures.
///
/// Each variant carries the path as the user typed it, so the rendered
/// message points at what they asked for rather than a normalized form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsError {
    /// A path segment names no child.
    #[error("{0}: No such file or directory")]
    NotFound(String),

    /// A path tried to descend into a file.
    #[error("{0}: Not a directory")]
    NotADirectory(String),

    /// A directory was read as if it were a file.
    #[error("{0}: Is a directory")]
    IsADirectory(String),
}

impl FsError {
    /// The path the error refers to.
    pub fn path(&self) -> &str {
        match self {
            FsError::NotFound(p) | FsError::NotADirectory(p) | FsError::IsADirectory(p) => p,
        }
    }
}

/// Failure of the remote chat call.
///
/// Quota, network and protocol errors all collapse to a message, which the
/// stream coordinator renders inline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
