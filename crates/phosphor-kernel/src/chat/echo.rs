//! Offline backend that answers locally.

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use phosphor_types::{ChatMode, TransportError};

use super::{ChatBackend, FragmentStream, ModePrompts};

/// Answers every message with a canned reply that names the active persona
/// and quotes the message back.
///
/// The reply is split into word-sized fragments, optionally spaced by
/// `chunk_delay`, so it exercises the same typewriter path a real network
/// stream would.
#[derive(Debug, Clone, Default)]
pub struct EchoBackend {
    prompts: ModePrompts,
    chunk_delay: Duration,
}

impl EchoBackend {
    pub fn new(prompts: ModePrompts) -> Self {
        Self {
            prompts,
            chunk_delay: Duration::ZERO,
        }
    }

    /// Pause between fragments, to imitate network arrival.
    pub fn with_chunk_delay(mut self, delay: Duration) -> Self {
        self.chunk_delay = delay;
        self
    }

    /// The full reply for `message`.
    pub fn reply(&self, message: &str, mode: ChatMode) -> String {
        let opener = match mode {
            ChatMode::Operator => "Relay offline. Local echo follows.",
            ChatMode::Oracle => "The wire is silent, yet your words return to you.",
        };
        format!(
            "# {mode}\n{opener}\n- persona: {}\n- received: `{}`\n",
            self.prompts.for_mode(mode),
            message.trim()
        )
    }
}

#[async_trait]
impl ChatBackend for EchoBackend {
    async fn send(&self, message: &str, mode: ChatMode) -> Result<FragmentStream, TransportError> {
        let delay = self.chunk_delay;
        let chunks: Vec<String> = self
            .reply(message, mode)
            .split_inclusive(char::is_whitespace)
            .map(str::to_string)
            .collect();

        let fragments = futures::stream::iter(chunks).then(move |chunk| async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            Ok(chunk)
        });
        Ok(Box::pin(fragments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_quotes_message_and_persona() {
        let backend = EchoBackend::new(ModePrompts::default());
        let reply = backend.reply("  status report ", ChatMode::Oracle);
        assert!(reply.starts_with("# oracle\n"));
        assert!(reply.contains("`status report`"));
        assert!(reply.contains(ModePrompts::default().for_mode(ChatMode::Oracle)));
    }

    #[tokio::test(start_paused = true)]
    async fn fragments_reassemble_into_reply() {
        let backend = EchoBackend::default().with_chunk_delay(Duration::from_millis(5));
        let fragments = backend.send("ping", ChatMode::Operator).await.unwrap();
        let collected: Vec<String> = fragments.map(|f| f.unwrap()).collect().await;

        assert!(collected.len() > 1);
        assert_eq!(collected.concat(), backend.reply("ping", ChatMode::Operator));
    }
}
