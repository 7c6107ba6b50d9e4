//! Typewriter pacing for streamed replies.
//!
//! Remote text arrives in arbitrary bursts. The [`StreamCoordinator`] holds
//! it in a FIFO buffer and a ticker reveals a backlog-sized batch at a fixed
//! cadence, so the screen never jumps by hundreds of characters at once and
//! never falls far behind after a burst.

mod coordinator;
mod driver;
mod pacing;

pub use coordinator::{StreamCoordinator, Tick};
pub use driver::{DEFAULT_TICK_INTERVAL, StreamOutcome, drive};
pub use pacing::{BacklogPacing, PacingPolicy, PacingStep};
