//! Time sources for the race clock.
//!
//! Elapsed times are measured on a monotonic [`Instant`]; the wall-clock
//! reading is only used for display stamps (registration time, "running
//! since").

use std::{
    sync::{Arc, Mutex},
    time::{Duration, Instant, SystemTime, UNIX_EPOCH},
};

use crate::types::WallMs;

/// Source of monotonic and wall-clock time.
pub trait Clock: Send + Sync + 'static {
    /// Monotonic now.
    fn now(&self) -> Instant;
    /// Wall-clock milliseconds since the Unix epoch.
    fn wall_ms(&self) -> WallMs;
}

/// Process clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn wall_ms(&self) -> WallMs {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Hand-driven clock for simulations and tests.
///
/// Clones share the same reading, so a test can keep one clone and hand
/// another to the store.
#[derive(Debug, Clone)]
pub struct ManualClock {
    inner: Arc<Mutex<ManualReading>>,
}

#[derive(Debug)]
struct ManualReading {
    mono: Instant,
    wall_ms: WallMs,
}

impl ManualClock {
    /// Starts at the real current instant and the given wall-clock stamp.
    pub fn new(wall_ms: WallMs) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ManualReading {
                mono: Instant::now(),
                wall_ms,
            })),
        }
    }

    /// Moves both readings forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut reading = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        reading.mono += by;
        reading.wall_ms = reading.wall_ms.saturating_add(by.as_millis() as u64);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).mono
    }

    fn wall_ms(&self) -> WallMs {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).wall_ms
    }
}
