//! Backends for tests and demos.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use phosphor_types::{ChatMode, TransportError};

use super::{ChatBackend, FragmentStream};

/// Replays a fixed list of fragments for every message and records what it
/// was asked.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    fragments: Vec<Result<String, TransportError>>,
    calls: Mutex<Vec<(String, ChatMode)>>,
}

impl ScriptedBackend {
    pub fn new<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fragments: fragments.into_iter().map(|f| Ok(f.into())).collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// End the stream with a transport error after the fragments.
    pub fn then_fail(mut self, message: impl Into<String>) -> Self {
        self.fragments.push(Err(TransportError::new(message)));
        self
    }

    /// Messages received so far, in order.
    pub fn calls(&self) -> Vec<(String, ChatMode)> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn send(&self, message: &str, mode: ChatMode) -> Result<FragmentStream, TransportError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((message.to_string(), mode));
        Ok(Box::pin(futures::stream::iter(self.fragments.clone())))
    }
}

/// Refuses every message, like an exhausted quota.
#[derive(Debug, Clone)]
pub struct FailingBackend {
    message: String,
}

impl FailingBackend {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl ChatBackend for FailingBackend {
    async fn send(&self, _message: &str, _mode: ChatMode) -> Result<FragmentStream, TransportError> {
        Err(TransportError::new(self.message.clone()))
    }
}
