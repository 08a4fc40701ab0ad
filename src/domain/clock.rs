//! Clock abstraction for timestamping and staleness checks.

use chrono::{DateTime, Utc};

/// Source of the current time.
///
/// The oracle timestamps reports and measures staleness through this trait
/// so tests can drive time deterministically.
pub trait Clock: Send + Sync {
    /// Current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
