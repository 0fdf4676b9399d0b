/// Wall clock abstraction so countdown code can run against controlled time.
// region:    --- Imports
use chrono::{DateTime, Utc};

// endregion: --- Imports

// region:    --- Clock

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// endregion: --- Clock
