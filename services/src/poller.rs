//! Fixed-interval limits poller with a consecutive-failure budget.
//!
//! The poller owns a [`PollerState`]: `Active` or `Suspended`, plus a counter of
//! tick failures since the last success. Once the counter reaches
//! `max_retries`, the next tick suspends the poller for the rest of the
//! process lifetime. Manual fetches go through [`LimitsIngestor`] directly
//! and never touch this state.

use std::time::Duration;

use db::models::rate_limit::Model as RateLimitModel;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use util::config;

use crate::ingest::{IngestError, LimitsIngestor};

/// Upper bound for `POLL_INTERVAL_MINUTES` (one week).
pub const MAX_INTERVAL_MINUTES: u64 = 7 * 24 * 60;

/// Converts a configured cadence into a tick period, clamped to
/// `1..=MAX_INTERVAL_MINUTES` minutes.
pub fn interval_from_minutes(minutes: u64) -> Duration {
    Duration::from_secs(minutes.clamp(1, MAX_INTERVAL_MINUTES) * 60)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerMode {
    Active,
    Suspended,
}

/// What a tick should do, decided before any I/O happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickDecision {
    /// Already suspended.
    Ignore,
    /// Budget exhausted on this tick; the poller is now suspended.
    Suspend,
    Fetch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollerState {
    mode: PollerMode,
    consecutive_failures: u32,
    max_retries: u32,
}

impl PollerState {
    pub fn new(max_retries: u32) -> Self {
        Self {
            mode: PollerMode::Active,
            consecutive_failures: 0,
            max_retries,
        }
    }

    /// Starts suspended; only manual fetches will run.
    pub fn paused(max_retries: u32) -> Self {
        Self {
            mode: PollerMode::Suspended,
            ..Self::new(max_retries)
        }
    }

    pub fn mode(&self) -> PollerMode {
        self.mode
    }

    pub fn is_suspended(&self) -> bool {
        self.mode == PollerMode::Suspended
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn begin_tick(&mut self) -> TickDecision {
        match self.mode {
            PollerMode::Suspended => TickDecision::Ignore,
            PollerMode::Active if self.consecutive_failures >= self.max_retries => {
                self.mode = PollerMode::Suspended;
                TickDecision::Suspend
            }
            PollerMode::Active => TickDecision::Fetch,
        }
    }

    pub fn record_success(&mut self) {
        self.consecutive_failures = 0;
    }

    pub fn record_failure(&mut self) {
        if self.consecutive_failures < self.max_retries {
            self.consecutive_failures += 1;
        }
    }
}

#[derive(Debug)]
pub enum TickOutcome {
    Skipped,
    Suspended,
    Stored(RateLimitModel),
    Failed {
        consecutive_failures: u32,
        error: IngestError,
    },
}

pub struct Poller {
    state: PollerState,
    ingestor: LimitsIngestor,
    interval: Duration,
}

impl Poller {
    pub fn new(ingestor: LimitsIngestor, interval: Duration, state: PollerState) -> Self {
        Self {
            state,
            ingestor,
            interval,
        }
    }

    /// Builds a poller from `POLL_INTERVAL_MINUTES`, `MAX_RETRIES` and `POLL_PAUSED`.
    pub fn from_config(ingestor: LimitsIngestor) -> Self {
        let interval = interval_from_minutes(config::poll_interval_minutes());
        let max_retries = config::max_retries();
        let state = if config::poll_paused() {
            PollerState::paused(max_retries)
        } else {
            PollerState::new(max_retries)
        };
        Self::new(ingestor, interval, state)
    }

    pub fn state(&self) -> &PollerState {
        &self.state
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Runs one scheduler tick.
    pub async fn tick(&mut self) -> TickOutcome {
        tracing::info!(
            consecutive_failures = self.state.consecutive_failures,
            max_retries = self.state.max_retries,
            "poller tick"
        );

        match self.state.begin_tick() {
            TickDecision::Ignore => {
                tracing::info!("poller suspended, tick ignored");
                TickOutcome::Skipped
            }
            TickDecision::Suspend => {
                tracing::error!(
                    max_retries = self.state.max_retries,
                    "maximum retry limit reached, stopping scheduled fetches"
                );
                TickOutcome::Suspended
            }
            TickDecision::Fetch => match self.ingestor.fetch_and_store().await {
                Ok(row) => {
                    self.state.record_success();
                    TickOutcome::Stored(row)
                }
                Err(error) => {
                    self.state.record_failure();
                    tracing::warn!(
                        error = %error,
                        attempt = self.state.consecutive_failures,
                        max_retries = self.state.max_retries,
                        "scheduled fetch failed"
                    );
                    TickOutcome::Failed {
                        consecutive_failures: self.state.consecutive_failures,
                        error,
                    }
                }
            },
        }
    }

    /// Moves the poller onto its own task. The first tick fires one interval from now.
    pub fn spawn(mut self) -> JoinHandle<()> {
        tokio::spawn(async move {
            tracing::info!(
                interval_secs = self.interval.as_secs(),
                suspended = self.state.is_suspended(),
                "limits poller started"
            );
            let now = Instant::now();
            let first = now.checked_add(self.interval).unwrap_or(now);
            let mut ticker = interval_at(first, self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                self.tick().await;
            }
        })
    }
}
