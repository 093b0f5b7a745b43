//! Integration tests for the disconnect countdown.
//!
//! Uses paused Tokio time: `sleep_until` resolves as soon as every task is
//! idle, and `Instant::now()` reports logical time, so we can assert on
//! exact durations without waiting for them.

use std::time::Duration;

use tokio::time::Instant;
use twentyone_countdown::{Countdown, CountdownConfig, CountdownEvent};

// =========================================================================
// Helpers
// =========================================================================

/// Drives the countdown until it expires and returns every event seen.
async fn run_to_expiry(c: &mut Countdown) -> Vec<CountdownEvent> {
    let mut events = Vec::new();
    loop {
        let ev = c.wait_for_tick().await;
        events.push(ev);
        if ev == CountdownEvent::Expired {
            return events;
        }
    }
}

// =========================================================================
// Expiry
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_start_returns_initial_value() {
    let mut c = Countdown::default();
    assert_eq!(c.start(), 10);
    assert!(c.is_active());
    assert_eq!(c.remaining(), Some(10));
}

#[tokio::test(start_paused = true)]
async fn test_exactly_ten_ticks_until_expiry() {
    let mut c = Countdown::default();
    let started = Instant::now();
    c.start();

    let events = run_to_expiry(&mut c).await;

    assert_eq!(events.len(), 10);
    let expected: Vec<_> = (1..=9)
        .rev()
        .map(|remaining| CountdownEvent::Tick { remaining })
        .chain(std::iter::once(CountdownEvent::Expired))
        .collect();
    assert_eq!(events, expected);
    assert_eq!(started.elapsed(), Duration::from_secs(10));
    assert!(!c.is_active());
    assert_eq!(c.remaining(), None);
}

#[tokio::test(start_paused = true)]
async fn test_first_tick_after_one_period() {
    let mut c = Countdown::default();
    let started = Instant::now();
    c.start();

    let ev = c.wait_for_tick().await;
    assert_eq!(ev, CountdownEvent::Tick { remaining: 9 });
    assert_eq!(started.elapsed(), Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn test_custom_config() {
    let mut c = Countdown::new(CountdownConfig {
        start_from: 3,
        period: Duration::from_millis(250),
    });
    let started = Instant::now();
    c.start();

    let events = run_to_expiry(&mut c).await;
    assert_eq!(events.len(), 3);
    assert_eq!(started.elapsed(), Duration::from_millis(750));
}

#[tokio::test(start_paused = true)]
async fn test_start_from_one_expires_on_first_step() {
    let mut c = Countdown::new(CountdownConfig::starting_from(1));
    c.start();
    assert_eq!(c.wait_for_tick().await, CountdownEvent::Expired);
}

// =========================================================================
// Inactive / cancelled countdowns pend forever
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_inactive_never_fires() {
    let mut c = Countdown::default();
    let result = tokio::time::timeout(Duration::from_secs(60), c.wait_for_tick()).await;
    assert!(result.is_err(), "inactive countdown should pend forever");
}

#[tokio::test(start_paused = true)]
async fn test_cancel_before_expiry_prevents_expiry() {
    let mut c = Countdown::default();
    c.start();

    for _ in 0..9 {
        c.wait_for_tick().await;
    }
    assert_eq!(c.remaining(), Some(1));

    assert!(c.cancel());
    assert!(!c.is_active());

    let result = tokio::time::timeout(Duration::from_secs(60), c.wait_for_tick()).await;
    assert!(result.is_err(), "cancelled countdown must never expire");
}

#[tokio::test(start_paused = true)]
async fn test_dropped_wait_leaves_state_untouched() {
    let mut c = Countdown::default();
    c.start();

    // Abandon the wait half-way through a period.
    let result = tokio::time::timeout(Duration::from_millis(500), c.wait_for_tick()).await;
    assert!(result.is_err());
    assert_eq!(c.remaining(), Some(10));

    // The step still lands on the first one-second mark.
    let ev = c.wait_for_tick().await;
    assert_eq!(ev, CountdownEvent::Tick { remaining: 9 });
}

// =========================================================================
// Restart replaces instead of stacking
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_restart_replaces_active_run() {
    let mut c = Countdown::default();
    c.start();
    for _ in 0..4 {
        c.wait_for_tick().await;
    }
    assert_eq!(c.remaining(), Some(6));

    let restarted = Instant::now();
    assert_eq!(c.start(), 10);

    let events = run_to_expiry(&mut c).await;
    assert_eq!(events.len(), 10, "only the new run should be counted");
    assert_eq!(restarted.elapsed(), Duration::from_secs(10));
}

#[tokio::test(start_paused = true)]
async fn test_restart_after_expiry() {
    let mut c = Countdown::new(CountdownConfig::starting_from(2));
    c.start();
    run_to_expiry(&mut c).await;

    c.start();
    assert_eq!(c.remaining(), Some(2));
    assert_eq!(c.wait_for_tick().await, CountdownEvent::Tick { remaining: 1 });
}
