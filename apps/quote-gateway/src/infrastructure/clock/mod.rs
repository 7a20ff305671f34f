//! System Clock
//!
//! [`Clock`] adapter backed by the host's local time zone.

use chrono::{DateTime, FixedOffset, Local, Utc};

use crate::application::ports::Clock;
use crate::domain::session::session_cutoff;

/// Wall clock in the host's local time zone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }

    fn session_expiry(&self, now: &DateTime<FixedOffset>) -> DateTime<Utc> {
        session_cutoff(&now.with_timezone(&Local))
    }
}
