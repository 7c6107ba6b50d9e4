//! Chat mode selector.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which persona the remote chat call speaks as.
///
/// Opaque to the core: each mode binds a different fixed system prompt,
/// and only the chat backend knows what that prompt says.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
    /// Terse terminal operator.
    #[default]
    Operator,
    /// Cryptic oracle.
    Oracle,
}

impl ChatMode {
    pub const ALL: [ChatMode; 2] = [ChatMode::Operator, ChatMode::Oracle];

    pub fn name(&self) -> &'static str {
        match self {
            ChatMode::Operator => "operator",
            ChatMode::Oracle => "oracle",
        }
    }
}

impl fmt::Display for ChatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a mode name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown mode: {0} (expected operator or oracle)")]
pub struct UnknownMode(pub String);

impl FromStr for ChatMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "operator" => Ok(ChatMode::Operator),
            "oracle" => Ok(ChatMode::Oracle),
            other => Err(UnknownMode(other.to_string())),
        }
    }
}
