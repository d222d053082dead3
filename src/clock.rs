//! A source of the current date-time that tests can pin to a fixed instant.

use std::{fmt, sync::Arc};

use time::OffsetDateTime;

/// Returns the current date-time.
///
/// Handlers never call [OffsetDateTime::now_utc] directly. They ask the clock
/// in the app state, so tests can simulate any amount of elapsed time.
#[derive(Clone)]
pub struct Clock(Arc<dyn Fn() -> OffsetDateTime + Send + Sync>);

impl Clock {
    /// A clock that reads the system time in UTC.
    pub fn system() -> Self {
        Self(Arc::new(OffsetDateTime::now_utc))
    }

    /// A clock that is stuck at `now`.
    pub fn fixed(now: OffsetDateTime) -> Self {
        Self(Arc::new(move || now))
    }

    /// The current date-time according to this clock.
    pub fn now(&self) -> OffsetDateTime {
        (self.0)()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::system()
    }
}

impl fmt::Debug for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Clock").field(&self.now()).finish()
    }
}
