//! Async loop that feeds a coordinator from a fragment stream and drains it
//! on a fixed ticker.
//!
//! ```text
//!   fragments (network) ──append──▶ StreamCoordinator ──tick every 20ms──▶ on_delta
//!        │ Err ──fail──▶ "[ERROR: ...]"            │
//!        └ end ──close_source                      └ Terminal ──▶ Completed
//! ```
//!
//! Everything runs in one task via `tokio::select!`; nothing here needs
//! a second thread.

use std::time::Duration;

use futures::{Stream, StreamExt};
use phosphor_types::TransportError;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::coordinator::{StreamCoordinator, Tick};
use super::pacing::PacingPolicy;

/// Default reveal cadence.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(20);

/// How a driven stream ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamOutcome {
    /// Reached the terminal state; carries the full revealed text.
    Completed(String),
    /// Cancelled before draining; carries what had been revealed.
    Abandoned(String),
}

impl StreamOutcome {
    pub fn text(&self) -> &str {
        match self {
            StreamOutcome::Completed(text) | StreamOutcome::Abandoned(text) => text,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, StreamOutcome::Completed(_))
    }
}

/// Drive `coordinator` until it is terminal or `cancel` fires.
///
/// Fragments are appended in arrival order; a fragment error is converted
/// with [`StreamCoordinator::fail`] and stops reading the source. Every
/// revealed delta is passed to `on_delta` in order.
pub async fn drive<S, P, F>(
    mut fragments: S,
    coordinator: &mut StreamCoordinator<P>,
    interval: Duration,
    cancel: &CancellationToken,
    mut on_delta: F,
) -> StreamOutcome
where
    S: Stream<Item = Result<String, TransportError>> + Unpin,
    P: PacingPolicy,
    F: FnMut(&str),
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                tracing::debug!(backlog = coordinator.backlog(), "stream abandoned");
                return StreamOutcome::Abandoned(coordinator.revealed().to_string());
            }
            _ = ticker.tick() => match coordinator.tick() {
                Tick::Revealed(delta) => on_delta(&delta),
                Tick::Idle => {}
                Tick::Terminal => {
                    return StreamOutcome::Completed(coordinator.revealed().to_string());
                }
            },
            fragment = fragments.next(), if coordinator.is_source_active() => match fragment {
                Some(Ok(chunk)) => coordinator.append(&chunk),
                Some(Err(err)) => coordinator.fail(&err),
                None => coordinator.close_source(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn ok(chunks: &[&str]) -> Vec<Result<String, TransportError>> {
        chunks.iter().map(|c| Ok(c.to_string())).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn drains_everything_in_order() {
        let mut coordinator = StreamCoordinator::new();
        let mut seen = String::new();
        let outcome = drive(
            stream::iter(ok(&["hello ", "typed ", "world"])),
            &mut coordinator,
            DEFAULT_TICK_INTERVAL,
            &CancellationToken::new(),
            |delta| seen.push_str(delta),
        )
        .await;

        assert_eq!(outcome, StreamOutcome::Completed("hello typed world".into()));
        assert_eq!(seen, "hello typed world");
        assert!(coordinator.is_terminal());
    }

    #[tokio::test(start_paused = true)]
    async fn reveal_is_paced_by_the_ticker() {
        let mut coordinator = StreamCoordinator::new();
        let start = tokio::time::Instant::now();
        let mut deltas = 0;
        drive(
            stream::iter(ok(&["abcde"])),
            &mut coordinator,
            Duration::from_millis(20),
            &CancellationToken::new(),
            |_| deltas += 1,
        )
        .await;

        // One char per tick at low backlog; first tick fires immediately.
        assert_eq!(deltas, 5);
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn transport_error_becomes_text() {
        let mut coordinator = StreamCoordinator::with_policy(|_: usize| 64);
        let fragments = vec![
            Ok("partial".to_string()),
            Err(TransportError::new("connection reset")),
            Ok("never seen".to_string()),
        ];
        let outcome = drive(
            stream::iter(fragments),
            &mut coordinator,
            DEFAULT_TICK_INTERVAL,
            &CancellationToken::new(),
            |_| {},
        )
        .await;

        assert_eq!(
            outcome,
            StreamOutcome::Completed("partial\n[ERROR: connection reset]".into())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_abandons_without_draining() {
        let mut coordinator = StreamCoordinator::new();
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        let mut revealed = 0;

        let outcome = drive(
            stream::iter(ok(&["a long reply that will not finish"])).chain(stream::pending()),
            &mut coordinator,
            DEFAULT_TICK_INTERVAL,
            &cancel,
            |delta| {
                revealed += delta.len();
                if revealed >= 3 {
                    trigger.cancel();
                }
            },
        )
        .await;

        assert_eq!(outcome, StreamOutcome::Abandoned("a l".into()));
        assert!(!outcome.is_completed());
        assert!(!coordinator.is_terminal());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_source_idles_then_completes() {
        let mut coordinator = StreamCoordinator::new();
        let slow = stream::iter(ok(&["x", "y"])).then(|chunk| async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            chunk
        });
        let outcome = drive(
            Box::pin(slow),
            &mut coordinator,
            DEFAULT_TICK_INTERVAL,
            &CancellationToken::new(),
            |_| {},
        )
        .await;
        assert_eq!(outcome.text(), "xy");
    }
}
