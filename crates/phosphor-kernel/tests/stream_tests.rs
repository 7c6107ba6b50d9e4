//! Pacing properties of the stream coordinator.

use std::time::Duration;

use futures::stream;
use phosphor_kernel::{
    BacklogPacing, DEFAULT_TICK_INTERVAL, StreamCoordinator, StreamOutcome, Tick, TransportError,
    drive,
};
use rstest::rstest;
use tokio_util::sync::CancellationToken;

fn drain_count(input: &str) -> usize {
    let mut stream = StreamCoordinator::new();
    stream.append(input);
    stream.close_source();
    let mut ticks = 0;
    while let Tick::Revealed(_) = stream.tick() {
        ticks += 1;
    }
    ticks
}

#[test]
fn two_hundred_chars_drain_in_116_ticks() {
    // 17 ticks at 3/tick (200 -> 149), 50 at 2/tick (149 -> 49), 49 at 1/tick
    assert_eq!(drain_count(&"a".repeat(200)), 116);
}

#[rstest]
#[case::empty("", 0)]
#[case::single("x", 1)]
#[case::at_low_threshold(&"b".repeat(50), 50)]
#[case::just_above_low(&"b".repeat(51), 50)]
#[case::just_above_high(&"b".repeat(151), 100)]
fn drain_counts(#[case] input: &str, #[case] expected: usize) {
    assert_eq!(drain_count(input), expected);
}

#[test]
fn revealed_plus_pending_is_everything_appended() {
    let input: String = "the quick brown fox ".repeat(12);
    let mut stream = StreamCoordinator::new();
    let mut appended = String::new();

    for chunk in input.as_bytes().chunks(37) {
        let chunk = std::str::from_utf8(chunk).unwrap();
        stream.append(chunk);
        appended.push_str(chunk);
        stream.tick();
        assert_eq!(format!("{}{}", stream.revealed(), stream.pending()), appended);
    }

    stream.close_source();
    loop {
        let tick = stream.tick();
        assert_eq!(format!("{}{}", stream.revealed(), stream.pending()), input);
        if tick == Tick::Terminal {
            break;
        }
    }
    assert_eq!(stream.revealed(), input);
}

#[test]
fn reveal_rate_never_exceeds_policy() {
    let mut stream = StreamCoordinator::new();
    stream.append(&"z".repeat(400));
    stream.close_source();
    while let Tick::Revealed(delta) = stream.tick() {
        assert!((1..=3).contains(&delta.chars().count()));
    }
}

#[test]
fn terminal_stays_terminal() {
    let mut stream = StreamCoordinator::new();
    stream.append("ok");
    stream.close_source();
    while stream.tick() != Tick::Terminal {}
    for _ in 0..10 {
        assert_eq!(stream.tick(), Tick::Terminal);
    }
    stream.append("late");
    assert_eq!(stream.tick(), Tick::Terminal);
    assert_eq!(stream.revealed(), "ok");
}

#[test]
fn custom_thresholds() {
    let pacing: BacklogPacing = toml::from_str("base = 5\nsteps = []").unwrap();
    let mut stream = StreamCoordinator::with_policy(pacing);
    stream.append(&"c".repeat(20));
    stream.close_source();
    let mut ticks = 0;
    while let Tick::Revealed(delta) = stream.tick() {
        assert_eq!(delta.len(), 5);
        ticks += 1;
    }
    assert_eq!(ticks, 4);
}

#[tokio::test(start_paused = true)]
async fn driving_200_chars_takes_116_intervals() {
    let mut coordinator = StreamCoordinator::new();
    let start = tokio::time::Instant::now();
    let outcome = drive(
        stream::iter(vec![Ok::<_, TransportError>("a".repeat(200))]),
        &mut coordinator,
        DEFAULT_TICK_INTERVAL,
        &CancellationToken::new(),
        |_| {},
    )
    .await;

    assert!(outcome.is_completed());
    assert_eq!(outcome.text().len(), 200);
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(20 * 116), "{elapsed:?}");
    assert!(elapsed <= Duration::from_millis(20 * 117), "{elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn burst_mid_stream_is_absorbed() {
    let mut coordinator = StreamCoordinator::new();
    let burst = "y".repeat(300);
    let fragments = vec![Ok("start ".to_string()), Ok(burst.clone()), Ok(" end".to_string())];
    let mut largest = 0;

    let outcome = drive(
        stream::iter(fragments),
        &mut coordinator,
        DEFAULT_TICK_INTERVAL,
        &CancellationToken::new(),
        |delta| largest = largest.max(delta.chars().count()),
    )
    .await;

    assert_eq!(outcome, StreamOutcome::Completed(format!("start {burst} end")));
    assert_eq!(largest, 3);
}
