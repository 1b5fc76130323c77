//! Per-call timing guard

use crate::clock::Clock;
use registry::{MethodKey, Registry};
use std::time::Duration;

/// Measures one call and records it into a registry when dropped.
///
/// Recording on drop means a call that panics is still timed: the sample is
/// written while the panic unwinds, and the panic itself continues unchanged.
///
/// # Example
///
/// ```rust
/// use proxy::{CallTimer, MonotonicClock};
/// use registry::{MethodKey, Registry};
///
/// let registry = Registry::new();
/// let clock = MonotonicClock::new();
///
/// {
///     let _timer = CallTimer::start(MethodKey::new("Job", "run"), &clock, &registry);
///     // ... timed work ...
/// }
///
/// assert_eq!(registry.sample_count("Job.run"), 1);
/// ```
pub struct CallTimer<'a> {
    key: Option<MethodKey>,
    started: Duration,
    clock: &'a dyn Clock,
    registry: &'a Registry,
}

impl<'a> CallTimer<'a> {
    /// Capture the start reading for a call to `key`.
    #[inline]
    pub fn start(key: MethodKey, clock: &'a dyn Clock, registry: &'a Registry) -> Self {
        Self {
            key: Some(key),
            started: clock.now(),
            clock,
            registry,
        }
    }

    /// The key this timer records under.
    pub fn key(&self) -> Option<&MethodKey> {
        self.key.as_ref()
    }

    /// Record now instead of waiting for drop, returning the sample.
    pub fn finish(mut self) -> Duration {
        self.record().unwrap_or_default()
    }

    fn record(&mut self) -> Option<Duration> {
        let key = self.key.take()?;
        let ended = self.clock.now();

        let elapsed = match ended.checked_sub(self.started) {
            Some(elapsed) => elapsed,
            None => {
                tracing::warn!(
                    target: "proxy",
                    key = %key,
                    started_ns = self.started.as_nanos() as u64,
                    ended_ns = ended.as_nanos() as u64,
                    "clock went backwards, recording zero duration"
                );
                Duration::ZERO
            }
        };

        tracing::trace!(
            target: "proxy",
            key = %key,
            elapsed_us = elapsed.as_secs_f64() * 1_000_000.0,
            "call timed"
        );

        self.registry.record_duration(key, elapsed);
        Some(elapsed)
    }
}

impl Drop for CallTimer<'_> {
    fn drop(&mut self) {
        self.record();
    }
}
