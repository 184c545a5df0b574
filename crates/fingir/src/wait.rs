//! Poll-until-predicate synchronization.
//!
//! Generic "poll until a predicate holds or a timeout elapses" combinators,
//! parameterized by interval and budget. UI-settle polling is the one place
//! the harness retries anything: DOM mutation and layout can lag a few
//! event-loop turns, so predicates are re-evaluated on a fixed interval.
//! A timed-out wait simply stops polling — whatever it was waiting on may
//! still complete later, and callers must tolerate that.

use crate::result::{FingirError, FingirResult};
use std::time::{Duration, Instant};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default timeout for wait operations (5 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 5_000;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

// =============================================================================
// WAIT OPTIONS
// =============================================================================

/// Options for wait operations
#[derive(Debug, Clone)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

// =============================================================================
// WAIT RESULT
// =============================================================================

/// Result of a successful wait
#[derive(Debug, Clone)]
pub struct WaitResult {
    /// Time spent waiting
    pub elapsed: Duration,
    /// Description of what was waited for
    pub waited_for: String,
}

// =============================================================================
// COMBINATORS
// =============================================================================

/// Poll `predicate` until it holds or the budget elapses.
///
/// Resolves within one poll interval of the condition becoming true. On
/// timeout, fails with the descriptive "waiting for" message — there is no
/// cancellation of whatever the predicate was observing.
pub fn wait_until<F>(
    mut predicate: F,
    description: &str,
    options: &WaitOptions,
) -> FingirResult<WaitResult>
where
    F: FnMut() -> bool,
{
    let start = Instant::now();
    let timeout = options.timeout();
    let poll_interval = options.poll_interval();

    loop {
        if predicate() {
            return Ok(WaitResult {
                elapsed: start.elapsed(),
                waited_for: description.to_string(),
            });
        }
        if start.elapsed() >= timeout {
            return Err(FingirError::timeout(options.timeout_ms, description));
        }
        std::thread::sleep(poll_interval);
    }
}

/// Poll `probe` until `accept` holds for the observed value, returning it.
///
/// The timeout error carries the last observed value so a failing test
/// reports what the harness actually saw, not just that it gave up.
pub fn wait_for_value<T, P, C>(
    mut probe: P,
    accept: C,
    description: &str,
    options: &WaitOptions,
) -> FingirResult<T>
where
    T: std::fmt::Debug,
    P: FnMut() -> T,
    C: Fn(&T) -> bool,
{
    let start = Instant::now();
    let timeout = options.timeout();
    let poll_interval = options.poll_interval();

    loop {
        let value = probe();
        if accept(&value) {
            return Ok(value);
        }
        if start.elapsed() >= timeout {
            return Err(FingirError::Timeout {
                ms: options.timeout_ms,
                waiting_for: description.to_string(),
                last_observed: Some(format!("{value:?}")),
            });
        }
        std::thread::sleep(poll_interval);
    }
}
