//! Cancellable disconnect countdown for the Twenty-One client.
//!
//! When a round ends the client shows "Auto-disconnect in N seconds" and,
//! unless something moves the match on, leaves the room when N reaches 0.
//! [`Countdown`] is that timer: a cooperative, cancellable repeating delay
//! that reports one [`CountdownEvent`] per period.
//!
//! # Integration
//!
//! The countdown is designed to sit inside the client actor's
//! `tokio::select!` loop, next to the socket and the intent queue:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(intent) = intents.recv() => { /* may call countdown.cancel() */ }
//!         frame = conn.recv() => { /* may call countdown.start() */ }
//!         event = countdown.wait_for_tick() => { /* Tick or Expired */ }
//!     }
//! }
//! ```
//!
//! All three branches run on the same task, so a `cancel()` issued while
//! handling a frame can never race with a tick: by the time a handler runs,
//! the pending `wait_for_tick` future has already been dropped.
//!
//! # Testing
//!
//! Timing is driven by `tokio::time`, so tests use
//! `#[tokio::test(start_paused = true)]` and never sleep for real.

use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::{debug, info, trace, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for the disconnect countdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownConfig {
    /// Value shown when the countdown starts. Expiry happens after exactly
    /// this many periods.
    pub start_from: u32,
    /// Time between two steps.
    pub period: Duration,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            start_from: Self::DEFAULT_START_FROM,
            period: Self::DEFAULT_PERIOD,
        }
    }
}

impl CountdownConfig {
    /// Seconds shown after a round ends.
    pub const DEFAULT_START_FROM: u32 = 10;
    /// One step per second.
    pub const DEFAULT_PERIOD: Duration = Duration::from_secs(1);

    /// Create a config counting down from `start_from` once per second.
    pub fn starting_from(start_from: u32) -> Self {
        Self {
            start_from,
            ..Default::default()
        }
    }

    /// Clamp and fix any out-of-range values so the config is safe to use.
    ///
    /// Called automatically by [`Countdown::new`]. Rules:
    /// - `start_from` is at least 1 (a zero countdown would expire without
    ///   ever being shown).
    /// - `period` is non-zero (a zero period would spin the select loop).
    pub fn validated(mut self) -> Self {
        if self.start_from == 0 {
            warn!("countdown start_from is 0, clamping to 1");
            self.start_from = 1;
        }
        if self.period.is_zero() {
            warn!(
                default_ms = Self::DEFAULT_PERIOD.as_millis() as u64,
                "countdown period is zero, using default"
            );
            self.period = Self::DEFAULT_PERIOD;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// What a completed [`Countdown::wait_for_tick`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownEvent {
    /// One period elapsed; `remaining` steps are left (always ≥ 1).
    Tick { remaining: u32 },
    /// The last period elapsed. The countdown is now inactive.
    Expired,
}

// ---------------------------------------------------------------------------
// Countdown
// ---------------------------------------------------------------------------

/// A single, restartable countdown.
///
/// At most one run is active at a time: [`start`](Self::start) on an
/// active countdown replaces the pending run instead of stacking a second
/// one.
pub struct Countdown {
    config: CountdownConfig,
    remaining: Option<u32>,
    /// When the next step is due (Tokio instant for `sleep_until`).
    next_tick: Option<Instant>,
    /// Incremented on every `start`, so logs can tell runs apart.
    run: u64,
}

impl Countdown {
    /// Create an inactive countdown from config.
    pub fn new(config: CountdownConfig) -> Self {
        Self {
            config: config.validated(),
            remaining: None,
            next_tick: None,
            run: 0,
        }
    }

    /// Start (or restart) the countdown. Returns the value to display.
    pub fn start(&mut self) -> u32 {
        if self.is_active() {
            debug!(run = self.run, remaining = ?self.remaining, "replacing active countdown");
        }
        self.run += 1;
        self.remaining = Some(self.config.start_from);
        self.next_tick = Some(Instant::now() + self.config.period);
        info!(run = self.run, from = self.config.start_from, "countdown started");
        self.config.start_from
    }

    /// Stop the countdown without expiring. Returns `true` if one was active.
    ///
    /// Safe to call when inactive (idempotent).
    pub fn cancel(&mut self) -> bool {
        let was_active = self.is_active();
        if was_active {
            debug!(run = self.run, remaining = ?self.remaining, "countdown cancelled");
        }
        self.remaining = None;
        self.next_tick = None;
        was_active
    }

    /// Wait until the next step is due.
    ///
    /// While inactive this future pends forever, so a `tokio::select!` loop
    /// simply keeps serving its other branches.
    ///
    /// Cancel-safe: state only changes after the sleep completes, in the
    /// same poll that returns the event. Dropping the future early leaves
    /// the countdown exactly as it was.
    pub async fn wait_for_tick(&mut self) -> CountdownEvent {
        let (next, remaining) = match (self.next_tick, self.remaining) {
            (Some(next), Some(remaining)) => (next, remaining),
            _ => {
                std::future::pending::<()>().await;
                unreachable!()
            }
        };

        time::sleep_until(next).await;

        let remaining = remaining.saturating_sub(1);
        if remaining == 0 {
            self.remaining = None;
            self.next_tick = None;
            info!(run = self.run, "countdown expired");
            CountdownEvent::Expired
        } else {
            self.remaining = Some(remaining);
            // Keep the cadence: a late wake-up doesn't shift later steps.
            self.next_tick = Some(next + self.config.period);
            trace!(run = self.run, remaining, "countdown tick");
            CountdownEvent::Tick { remaining }
        }
    }

    /// Whether a run is in progress.
    pub fn is_active(&self) -> bool {
        self.remaining.is_some()
    }

    /// Steps left in the current run, or `None` when inactive.
    pub fn remaining(&self) -> Option<u32> {
        self.remaining
    }

    /// The validated configuration.
    pub fn config(&self) -> &CountdownConfig {
        &self.config
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(CountdownConfig::default())
    }
}
