//! Step-aligned stop coordination for the simulation host.
//!
//! A stop can be requested from anywhere (the signal watcher, the duration
//! check in the tick loop) but only takes effect between simulation steps: the
//! tick loop asks [`ShutdownState::should_stop`] before each step and, once it
//! breaks out, seals the state with the last step it completed. Observers have
//! by then received everything the authority published up to that step.

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use tracing::info;

/// Why the simulation is stopping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A termination signal was received
    Signal,
    /// The configured simulated duration elapsed
    DurationElapsed,
}

impl StopReason {
    fn code(self) -> u8 {
        match self {
            StopReason::Signal => 1,
            StopReason::DurationElapsed => 2,
        }
    }

    fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(StopReason::Signal),
            2 => Some(StopReason::DurationElapsed),
            _ => None,
        }
    }
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::Signal => write!(f, "signal"),
            StopReason::DurationElapsed => write!(f, "duration elapsed"),
        }
    }
}

const NOT_SEALED: u64 = u64::MAX;

/// Shared stop state, cloned into every task that may request a stop.
#[derive(Debug, Clone)]
pub struct ShutdownState {
    /// `0` while running, otherwise the [`StopReason`] code of the first request
    reason: Arc<AtomicU8>,
    /// Last completed step, [`NOT_SEALED`] until the tick loop has drained
    final_step: Arc<AtomicU64>,
}

impl ShutdownState {
    pub fn new() -> Self {
        Self {
            reason: Arc::new(AtomicU8::new(0)),
            final_step: Arc::new(AtomicU64::new(NOT_SEALED)),
        }
    }

    /// Requests a stop. Only the first request is kept; returns `true` if this
    /// call was it.
    pub fn request_stop(&self, reason: StopReason) -> bool {
        let first = self
            .reason
            .compare_exchange(0, reason.code(), Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if first {
            info!("🛑 Stop requested ({reason}) - no new simulation steps will run");
        }
        first
    }

    /// Returns true once a stop has been requested.
    pub fn should_stop(&self) -> bool {
        self.reason.load(Ordering::Acquire) != 0
    }

    /// The reason recorded by the first stop request.
    pub fn reason(&self) -> Option<StopReason> {
        StopReason::from_code(self.reason.load(Ordering::Acquire))
    }

    /// Records the last step the tick loop completed. Later calls are ignored.
    pub fn seal(&self, last_step: u64) {
        if self
            .final_step
            .compare_exchange(NOT_SEALED, last_step, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            info!("✅ Simulation drained after step {last_step} - ready for final report");
        }
    }

    /// The step recorded by [`ShutdownState::seal`], if the loop has drained.
    pub fn final_step(&self) -> Option<u64> {
        match self.final_step.load(Ordering::Acquire) {
            NOT_SEALED => None,
            step => Some(step),
        }
    }
}

impl Default for ShutdownState {
    fn default() -> Self {
        Self::new()
    }
}
