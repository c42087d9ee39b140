use std::time::{Duration, Instant};

/// The two phases of the loading gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Only the loading indicator is shown.
    Loading,
    /// The marketplace is shown.
    Ready,
}

/// A one-shot timed transition from [`Phase::Loading`] to [`Phase::Ready`].
///
/// The gate does not own a timer. The host polls it with the current time
/// and the gate opens on the first poll at or after its deadline. Once
/// [`LoadingGate::disarm`] has been called, polling never changes the phase
/// again, so a poll that arrives after teardown is ignored.
#[derive(Debug, Clone)]
pub struct LoadingGate {
    phase: Phase,
    mounted_at: Instant,
    delay: Duration,
    armed: bool,
}

impl LoadingGate {
    /// Arms a gate that opens `delay` after `mounted_at`.
    #[must_use]
    pub const fn new(delay: Duration, mounted_at: Instant) -> Self {
        Self {
            phase: Phase::Loading,
            mounted_at,
            delay,
            armed: true,
        }
    }

    /// A gate that is already open.
    #[must_use]
    pub fn open() -> Self {
        Self {
            phase: Phase::Ready,
            mounted_at: Instant::now(),
            delay: Duration::ZERO,
            armed: false,
        }
    }

    /// The current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the loading indicator should be shown.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading)
    }

    /// Whether the gate will still react to polls.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.armed
    }

    /// Time left until the gate opens, or `None` if it will not open by
    /// polling anymore.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.armed.then(|| {
            self.delay
                .saturating_sub(now.saturating_duration_since(self.mounted_at))
        })
    }

    /// Advances the gate to `now`.
    ///
    /// Returns `true` exactly once: on the poll that opens the gate.
    pub fn poll(&mut self, now: Instant) -> bool {
        // `mounted_at + delay` may not be representable as an `Instant`.
        if !self.armed || now.saturating_duration_since(self.mounted_at) < self.delay {
            return false;
        }
        self.armed = false;
        self.phase = Phase::Ready;
        tracing::debug!("loading gate opened");
        true
    }

    /// Stops the gate from reacting to any further poll.
    pub fn disarm(&mut self) {
        if self.armed {
            tracing::trace!("loading gate disarmed before opening");
        }
        self.armed = false;
    }
}
