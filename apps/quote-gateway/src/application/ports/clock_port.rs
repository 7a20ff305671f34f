//! Clock Port (Driven Port)
//!
//! Source of "now" for session expiry decisions.

use chrono::{DateTime, FixedOffset, Utc};

use crate::domain::session::session_cutoff;

/// Wall-clock time source.
///
/// Returns local time with its offset so the daily session cutoff can be
/// computed in the broker's local calendar.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    /// Current local time.
    fn now(&self) -> DateTime<FixedOffset>;

    /// Expiry of a session obtained at `now`.
    ///
    /// The default reads the cutoff in `now`'s fixed offset. Clocks backed
    /// by a real time zone override it so the cutoff follows that zone's
    /// offset changes.
    fn session_expiry(&self, now: &DateTime<FixedOffset>) -> DateTime<Utc> {
        session_cutoff(now)
    }
}
