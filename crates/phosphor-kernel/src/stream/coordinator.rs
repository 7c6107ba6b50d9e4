//! Pending/revealed buffer that paces streamed text.

use phosphor_types::TransportError;

use super::pacing::{BacklogPacing, PacingPolicy};

/// What one tick produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tick {
    /// Characters moved to the revealed text this tick.
    Revealed(String),
    /// Nothing pending yet, but the source is still producing.
    Idle,
    /// Source closed and pending drained. Stays terminal.
    Terminal,
}

/// Decouples remote arrival cadence from on-screen reveal cadence.
///
/// The producer calls [`append`](Self::append) as chunks arrive and
/// [`close_source`](Self::close_source) (or [`fail`](Self::fail)) when done.
/// A fixed-interval ticker calls [`tick`](Self::tick) to move a
/// backlog-sized batch of characters from pending to revealed. The buffer is
/// strictly FIFO and never splits a character: at every point
/// `revealed + pending` equals everything appended so far.
#[derive(Debug, Clone)]
pub struct StreamCoordinator<P = BacklogPacing> {
    pending: String,
    /// Length of `pending` in chars, kept alongside to avoid rescanning.
    pending_chars: usize,
    revealed: String,
    source_active: bool,
    policy: P,
}

impl StreamCoordinator<BacklogPacing> {
    /// Coordinator with the default backlog thresholds.
    pub fn new() -> Self {
        Self::with_policy(BacklogPacing::default())
    }
}

impl Default for StreamCoordinator<BacklogPacing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: PacingPolicy> StreamCoordinator<P> {
    pub fn with_policy(policy: P) -> Self {
        Self {
            pending: String::new(),
            pending_chars: 0,
            revealed: String::new(),
            source_active: true,
            policy,
        }
    }

    /// Queue a chunk from the producer.
    ///
    /// Ignored once the source has closed, so a terminal stream stays
    /// terminal.
    pub fn append(&mut self, chunk: &str) {
        if !self.source_active {
            tracing::debug!(len = chunk.len(), "append after source closed, dropping");
            return;
        }
        self.push_pending(chunk);
    }

    fn push_pending(&mut self, chunk: &str) {
        self.pending.push_str(chunk);
        self.pending_chars += chunk.chars().count();
    }

    /// Mark the producer finished. Pending text keeps draining tick by tick.
    pub fn close_source(&mut self) {
        self.source_active = false;
    }

    /// Convert a transport failure into a trailing `[ERROR: ...]` line and
    /// close the source, so the stream still reaches its terminal state.
    pub fn fail(&mut self, err: &TransportError) {
        if !self.source_active {
            return;
        }
        let tail = self.pending.chars().last().or(self.revealed.chars().last());
        let separator = match tail {
            Some(c) if c != '\n' => "\n",
            _ => "",
        };
        tracing::warn!(error = %err, "chat transport failed");
        self.push_pending(&format!("{separator}[ERROR: {}]", err.message()));
        self.source_active = false;
    }

    /// Advance one reveal step.
    ///
    /// Never blocks: only slices the in-memory buffer.
    pub fn tick(&mut self) -> Tick {
        if self.pending_chars == 0 {
            return if self.source_active {
                Tick::Idle
            } else {
                Tick::Terminal
            };
        }

        let take = self
            .policy
            .chars_per_tick(self.pending_chars)
            .clamp(1, self.pending_chars);
        let split = self
            .pending
            .char_indices()
            .nth(take)
            .map_or(self.pending.len(), |(idx, _)| idx);

        let delta: String = self.pending.drain(..split).collect();
        self.pending_chars -= take;
        self.revealed.push_str(&delta);
        Tick::Revealed(delta)
    }

    pub fn pending(&self) -> &str {
        &self.pending
    }

    pub fn revealed(&self) -> &str {
        &self.revealed
    }

    /// Pending length in characters.
    pub fn backlog(&self) -> usize {
        self.pending_chars
    }

    pub fn is_source_active(&self) -> bool {
        self.source_active
    }

    pub fn is_terminal(&self) -> bool {
        !self.source_active && self.pending_chars == 0
    }

    pub fn into_revealed(self) -> String {
        self.revealed
    }
}
