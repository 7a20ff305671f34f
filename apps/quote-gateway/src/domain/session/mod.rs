//! Session Token Types
//!
//! Holds the broker session token and the instant it stops being valid.
//!
//! # Design
//!
//! The broker rolls every session over at a fixed local time each morning
//! (06:30). A token obtained at any moment is therefore good until the next
//! 06:30 boundary, which is recomputed from the login instant rather than
//! derived from a fixed TTL. This keeps the expiry correct when the gateway
//! restarts or sits idle across the boundary.
//!
//! The token and its expiry always move together: [`TokenCache::set`] and
//! [`TokenCache::reset`] replace the whole [`TokenRecord`] under one lock, so
//! no reader can observe a new token paired with a stale expiry.

use chrono::{DateTime, NaiveTime, Offset, TimeDelta, TimeZone, Utc};
use parking_lot::Mutex;

// =============================================================================
// Constants
// =============================================================================

/// Hour of the daily session rollover (local time).
pub const CUTOFF_HOUR: u32 = 6;

/// Minute of the daily session rollover (local time).
pub const CUTOFF_MINUTE: u32 = 30;

// =============================================================================
// Cutoff Arithmetic
// =============================================================================

/// Compute the expiry for a session obtained at `now`.
///
/// Returns today's 06:30 when `now` is strictly before it, otherwise the
/// next calendar day's 06:30, both read in `now`'s time zone. When that
/// zone changes offset in between, the cutoff takes the offset in force at
/// 06:30. A 06:30 skipped by a forward jump resolves with `now`'s offset;
/// a repeated one resolves to its earlier instant.
///
/// # Example
///
/// ```rust
/// use chrono::{DateTime, FixedOffset};
/// use quote_gateway::domain::session::session_cutoff;
///
/// let now = DateTime::parse_from_rfc3339("2021-03-25T12:00:00+09:00").unwrap();
/// let expiry = session_cutoff(&now);
/// assert_eq!(expiry.to_rfc3339(), "2021-03-25T21:30:00+00:00");
/// ```
#[must_use]
pub fn session_cutoff<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    let local_now = now.naive_local();
    let cutoff_today = local_now.date().and_time(cutoff_time());

    let local_cutoff = if local_now < cutoff_today {
        cutoff_today
    } else {
        cutoff_today + TimeDelta::days(1)
    };

    if let Some(cutoff) = now.timezone().from_local_datetime(&local_cutoff).earliest() {
        return cutoff.with_timezone(&Utc);
    }

    let offset = now.offset().fix();
    let utc_cutoff = local_cutoff - TimeDelta::seconds(i64::from(offset.local_minus_utc()));
    DateTime::<Utc>::from_naive_utc_and_offset(utc_cutoff, Utc)
}

const fn cutoff_time() -> NaiveTime {
    match NaiveTime::from_hms_opt(CUTOFF_HOUR, CUTOFF_MINUTE, 0) {
        Some(time) => time,
        None => NaiveTime::MIN,
    }
}

// =============================================================================
// Token Record
// =============================================================================

/// A session token paired with its expiry instant.
///
/// An empty token means no session. `None` expiry is the zero value and is
/// always expired.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct TokenRecord {
    token: String,
    expires_at: Option<DateTime<Utc>>,
}

impl TokenRecord {
    /// Create a record from a token and its expiry.
    #[must_use]
    pub fn new(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires_at: Some(expires_at),
        }
    }

    /// The token string, empty when absent.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The expiry instant, `None` when never set.
    #[must_use]
    pub const fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Whether the record is expired at `now` (expiry `<=` now).
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_none_or(|expires_at| expires_at <= now)
    }
}

impl std::fmt::Debug for TokenRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let token = if self.token.is_empty() {
            ""
        } else {
            "[REDACTED]"
        };
        f.debug_struct("TokenRecord")
            .field("token", &token)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

// =============================================================================
// Credential
// =============================================================================

/// Broker API password used to open a session.
///
/// `Debug` and `Display` never print the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiCredential {
    password: String,
}

impl ApiCredential {
    /// Wrap an API password.
    #[must_use]
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
        }
    }

    /// The raw password, for building the login request only.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCredential")
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl std::fmt::Display for ApiCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ApiCredential([REDACTED])")
    }
}

// =============================================================================
// Token Cache
// =============================================================================

/// Thread-safe holder of the current [`TokenRecord`].
///
/// Constructed once by the composition root and shared by `Arc`. Every
/// operation takes the same lock and performs no I/O.
///
/// # Example
///
/// ```rust
/// use chrono::{TimeDelta, Utc};
/// use quote_gateway::domain::session::TokenCache;
///
/// let cache = TokenCache::new();
/// let now = Utc::now();
/// assert!(cache.is_expired(now));
///
/// cache.set("token-1", now + TimeDelta::hours(1));
/// assert!(!cache.is_expired(now));
/// assert_eq!(cache.get(), "token-1");
///
/// cache.reset();
/// assert!(cache.get().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct TokenCache {
    record: Mutex<TokenRecord>,
}

impl TokenCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current token, empty if none is set.
    #[must_use]
    pub fn get(&self) -> String {
        self.record.lock().token.clone()
    }

    /// Current expiry instant.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.record.lock().expires_at
    }

    /// Copy of the whole record.
    #[must_use]
    pub fn snapshot(&self) -> TokenRecord {
        self.record.lock().clone()
    }

    /// Replace token and expiry together.
    pub fn set(&self, token: impl Into<String>, expires_at: DateTime<Utc>) {
        let record = TokenRecord::new(token, expires_at);
        *self.record.lock() = record;
    }

    /// Whether the cached record is expired at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.record.lock().is_expired(now)
    }

    /// Clear token and expiry to their empty values.
    pub fn reset(&self) {
        *self.record.lock() = TokenRecord::default();
    }
}

// =============================================================================
// Tests
// =============================================================================
