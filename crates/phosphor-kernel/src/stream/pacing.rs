//! How many characters to reveal per tick.

use serde::{Deserialize, Serialize};

/// Decides the reveal batch size for a given backlog.
///
/// Implemented for plain closures, so a one-off policy is just
/// `|backlog: usize| if backlog > 10 { 4 } else { 1 }`.
pub trait PacingPolicy {
    /// Characters to move from pending to revealed this tick.
    ///
    /// `backlog` is the pending length in characters and is never zero when
    /// this is called. Returning zero is treated as one.
    fn chars_per_tick(&self, backlog: usize) -> usize;
}

impl<F> PacingPolicy for F
where
    F: Fn(usize) -> usize,
{
    fn chars_per_tick(&self, backlog: usize) -> usize {
        self(backlog)
    }
}

/// One threshold of a [`BacklogPacing`] policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacingStep {
    /// Applies when the backlog is strictly greater than this.
    pub above: usize,
    /// Characters per tick while it applies.
    pub chars: usize,
}

/// Threshold policy: the larger the backlog, the bigger the batch.
///
/// Defaults: more than 150 pending → 3 per tick, more than 50 → 2,
/// otherwise 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacklogPacing {
    /// Batch size when no step applies.
    #[serde(default = "default_base")]
    pub base: usize,
    /// Thresholds; the highest matching `above` wins regardless of order.
    #[serde(default = "default_steps")]
    pub steps: Vec<PacingStep>,
}

fn default_base() -> usize {
    1
}

fn default_steps() -> Vec<PacingStep> {
    vec![
        PacingStep { above: 150, chars: 3 },
        PacingStep { above: 50, chars: 2 },
    ]
}

impl Default for BacklogPacing {
    fn default() -> Self {
        Self {
            base: default_base(),
            steps: default_steps(),
        }
    }
}

impl BacklogPacing {
    /// Reveal `chars` per tick regardless of backlog.
    pub fn constant(chars: usize) -> Self {
        Self {
            base: chars,
            steps: Vec::new(),
        }
    }
}

impl PacingPolicy for BacklogPacing {
    fn chars_per_tick(&self, backlog: usize) -> usize {
        self.steps
            .iter()
            .filter(|step| backlog > step.above)
            .max_by_key(|step| step.above)
            .map_or(self.base, |step| step.chars)
    }
}
