//! Time source abstraction.
//!
//! Expiry decisions (reset tokens, CAPTCHA challenges, rate-limit windows)
//! are made against an injected [`Clock`] so tests can drive time
//! deterministically instead of sleeping.

use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, RwLock};

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub type SharedClock = Arc<dyn Clock>;

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually advanced clock for tests.
#[derive(Debug)]
pub struct ManualClock {
    now: RwLock<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(start),
        }
    }

    /// Move the clock forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        let mut now = self.now.write().expect("clock lock poisoned");
        *now = *now + delta;
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        let mut now = self.now.write().expect("clock lock poisoned");
        *now = instant;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read().expect("clock lock poisoned")
    }
}
