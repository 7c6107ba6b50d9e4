//! The remote chat boundary.
//!
//! A [`ChatBackend`] takes a message and a [`ChatMode`] and answers with a
//! lazy stream of text fragments. [`relay`] wires that stream into a
//! [`StreamCoordinator`] so the reply is typed out at a steady pace, and
//! turns any transport failure into an inline `[ERROR: ...]` line.

mod echo;
pub mod testing;

use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use futures::Stream;
use phosphor_types::{ChatMode, TransportError};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::stream::{BacklogPacing, StreamCoordinator, StreamOutcome, drive};

pub use echo::EchoBackend;

/// Incremental model output. Finite and not restartable.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, TransportError>> + Send>>;

/// A remote chat service.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Start a reply to `message` in `mode`.
    ///
    /// An `Err` here means the call never started; failures after that
    /// arrive as `Err` items in the stream.
    async fn send(&self, message: &str, mode: ChatMode) -> Result<FragmentStream, TransportError>;
}

/// The fixed system prompt each mode binds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModePrompts {
    #[serde(default = "default_operator_prompt")]
    pub operator: String,
    #[serde(default = "default_oracle_prompt")]
    pub oracle: String,
}

fn default_operator_prompt() -> String {
    "You are the night operator of a green-screen relay terminal. Answer tersely and precisely."
        .to_string()
}

fn default_oracle_prompt() -> String {
    "You are an oracle living in an old mainframe. Answer in short, oblique riddles.".to_string()
}

impl Default for ModePrompts {
    fn default() -> Self {
        Self {
            operator: default_operator_prompt(),
            oracle: default_oracle_prompt(),
        }
    }
}

impl ModePrompts {
    pub fn for_mode(&self, mode: ChatMode) -> &str {
        match mode {
            ChatMode::Operator => &self.operator,
            ChatMode::Oracle => &self.oracle,
        }
    }
}

/// Send `message` and type the reply out through `on_delta`.
///
/// A failed send shows up as an `[ERROR: ...]` reply rather than an error.
/// Cancelling before the backend answers abandons with nothing revealed.
pub async fn relay<F>(
    backend: &dyn ChatBackend,
    message: &str,
    mode: ChatMode,
    pacing: BacklogPacing,
    interval: Duration,
    cancel: &CancellationToken,
    on_delta: F,
) -> StreamOutcome
where
    F: FnMut(&str),
{
    tracing::debug!(%mode, len = message.len(), "relaying chat message");
    let mut coordinator = StreamCoordinator::with_policy(pacing);

    let sent = tokio::select! {
        biased;
        _ = cancel.cancelled() => return StreamOutcome::Abandoned(String::new()),
        sent = backend.send(message, mode) => sent,
    };
    let fragments: FragmentStream = match sent {
        Ok(fragments) => fragments,
        Err(err) => {
            coordinator.fail(&err);
            Box::pin(futures::stream::empty())
        }
    };

    drive(fragments, &mut coordinator, interval, cancel, on_delta).await
}
