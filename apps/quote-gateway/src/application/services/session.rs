//! Session Manager
//!
//! Produces a valid broker session token on demand. Every privileged REST
//! call goes through [`SessionManager::get_token`].
//!
//! # Design
//!
//! The manager never keeps a private copy of the token: it reads and replaces
//! it through the shared [`TokenCache`]. A login only happens when the cache
//! reports the token expired at the clock's current time, and the new expiry
//! is the next daily cutoff after that instant.
//!
//! Concurrent callers that all see an expired token queue on an async gate,
//! so only one login is in flight at a time. The caller that acquires the
//! gate next re-checks the cache and reuses the token the first one stored.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::application::ports::{BrokerApiError, Clock, LoginPort};
use crate::domain::session::{ApiCredential, TokenCache};

/// Session manager errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The upstream login call failed. The cache is left as it was.
    #[error("login failed: {0}")]
    Login(#[from] BrokerApiError),
}

/// Hands out a valid session token, logging in when the cached one expired.
pub struct SessionManager {
    cache: Arc<TokenCache>,
    clock: Arc<dyn Clock>,
    login: Arc<dyn LoginPort>,
    credential: ApiCredential,
    gate: Mutex<()>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("cache", &self.cache)
            .field("credential", &self.credential)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Create a session manager over a shared token cache.
    #[must_use]
    pub fn new(
        cache: Arc<TokenCache>,
        clock: Arc<dyn Clock>,
        login: Arc<dyn LoginPort>,
        credential: ApiCredential,
    ) -> Self {
        Self {
            cache,
            clock,
            login,
            credential,
            gate: Mutex::new(()),
        }
    }

    /// Return a valid token, logging in first when the cached one expired.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Login`] when a login was needed and failed.
    /// The failure is not retried; the next call tries again because the
    /// cache is still expired.
    pub async fn get_token(&self) -> Result<String, SessionError> {
        let record = self.cache.snapshot();
        if !record.is_expired(self.now_utc()) {
            return Ok(record.token().to_string());
        }

        let _gate = self.gate.lock().await;
        self.login_if_expired().await
    }

    /// Discard the cached token and log in again.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Login`] when the login fails. The cache stays
    /// empty in that case.
    pub async fn refresh(&self) -> Result<String, SessionError> {
        let _gate = self.gate.lock().await;
        self.cache.reset();
        tracing::info!("Session reset, forcing re-login");
        self.login_if_expired().await
    }

    /// Expiry of the cached token.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.cache.expires_at()
    }

    /// Whether a token is cached and still valid right now.
    #[must_use]
    pub fn has_valid_token(&self) -> bool {
        !self.cache.is_expired(self.now_utc())
    }

    /// Must be called with the gate held.
    async fn login_if_expired(&self) -> Result<String, SessionError> {
        let now = self.clock.now();

        if self.cache.is_expired(now.with_timezone(&Utc)) {
            let token = match self.login.login(&self.credential).await {
                Ok(token) => token,
                Err(e) => {
                    tracing::warn!(error = %e, "Broker login failed");
                    return Err(e.into());
                }
            };

            let expires_at = self.clock.session_expiry(&now);
            self.cache.set(token, expires_at);
            tracing::info!(expires_at = %expires_at, "Broker session established");
        }

        Ok(self.cache.get())
    }

    fn now_utc(&self) -> DateTime<Utc> {
        self.clock.now().with_timezone(&Utc)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::{DateTime, FixedOffset, TimeDelta};

    use super::*;
    use crate::application::ports::MockClock;
    use crate::domain::session::session_cutoff;

    /// Login double returning numbered tokens or a fixed error.
    struct CountingLogin {
        calls: AtomicUsize,
        fail_with: Option<BrokerApiError>,
    }

    impl CountingLogin {
        fn ok() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_with: None,
            }
        }

        fn failing(err: BrokerApiError) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_with: Some(err),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LoginPort for CountingLogin {
        async fn login(&self, credential: &ApiCredential) -> Result<String, BrokerApiError> {
            assert_eq!(credential.expose(), "secret");
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            match &self.fail_with {
                Some(err) => Err(err.clone()),
                None => Ok(format!("token-{n}")),
            }
        }
    }

    fn at(rfc3339: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap()
    }

    fn fixed_clock(now: DateTime<FixedOffset>) -> Arc<MockClock> {
        let mut clock = MockClock::new();
        clock.expect_now().return_const(now);
        clock
            .expect_session_expiry()
            .returning(|now| session_cutoff(now));
        Arc::new(clock)
    }

    fn manager(
        cache: &Arc<TokenCache>,
        now: DateTime<FixedOffset>,
        login: &Arc<CountingLogin>,
    ) -> SessionManager {
        SessionManager::new(
            Arc::clone(cache),
            fixed_clock(now),
            Arc::clone(login) as Arc<dyn LoginPort>,
            ApiCredential::new("secret"),
        )
    }

    fn auth_error() -> BrokerApiError {
        BrokerApiError::AuthenticationFailed {
            message: "bad password".to_string(),
        }
    }

    #[tokio::test]
    async fn get_token_logs_in_when_cache_is_empty() {
        let cache = Arc::new(TokenCache::new());
        let login = Arc::new(CountingLogin::ok());
        let session = manager(&cache, at("2021-03-25T12:00:00+09:00"), &login);

        let token = session.get_token().await.unwrap();

        assert_eq!(token, "token-1");
        assert_eq!(login.calls(), 1);
        assert_eq!(
            session.expires_at(),
            Some(at("2021-03-26T06:30:00+09:00").with_timezone(&Utc))
        );
    }

    #[tokio::test]
    async fn get_token_before_cutoff_expires_same_day() {
        let cache = Arc::new(TokenCache::new());
        let login = Arc::new(CountingLogin::ok());
        let session = manager(&cache, at("2021-03-25T03:00:00+09:00"), &login);

        session.get_token().await.unwrap();

        assert_eq!(
            session.expires_at(),
            Some(at("2021-03-25T06:30:00+09:00").with_timezone(&Utc))
        );
    }

    #[tokio::test]
    async fn get_token_with_valid_token_never_logs_in() {
        let now = at("2021-03-25T12:00:00+09:00");
        let cache = Arc::new(TokenCache::new());
        cache.set("cached", now.with_timezone(&Utc) + TimeDelta::hours(1));
        let login = Arc::new(CountingLogin::ok());
        let session = manager(&cache, now, &login);

        for _ in 0..5 {
            assert_eq!(session.get_token().await.unwrap(), "cached");
        }
        assert_eq!(login.calls(), 0);
        assert!(session.has_valid_token());
    }

    #[tokio::test]
    async fn get_token_relogs_when_expiry_equals_now() {
        let now = at("2021-03-25T12:00:00+09:00");
        let cache = Arc::new(TokenCache::new());
        cache.set("stale", now.with_timezone(&Utc));
        let login = Arc::new(CountingLogin::ok());
        let session = manager(&cache, now, &login);

        assert_eq!(session.get_token().await.unwrap(), "token-1");
        assert_eq!(login.calls(), 1);
    }

    #[tokio::test]
    async fn refresh_always_logs_in_and_replaces_token() {
        let now = at("2021-03-25T12:00:00+09:00");
        let cache = Arc::new(TokenCache::new());
        cache.set("old", now.with_timezone(&Utc) + TimeDelta::hours(5));
        let login = Arc::new(CountingLogin::ok());
        let session = manager(&cache, now, &login);

        let token = session.refresh().await.unwrap();

        assert_eq!(token, "token-1");
        assert_eq!(cache.get(), "token-1");
        assert_eq!(login.calls(), 1);
        assert_eq!(
            cache.expires_at(),
            Some(at("2021-03-26T06:30:00+09:00").with_timezone(&Utc))
        );
    }

    #[tokio::test]
    async fn login_failure_propagates_and_leaves_cache_untouched() {
        let now = at("2021-03-25T12:00:00+09:00");
        let cache = Arc::new(TokenCache::new());
        let expired_at = now.with_timezone(&Utc) - TimeDelta::minutes(1);
        cache.set("expired", expired_at);
        let login = Arc::new(CountingLogin::failing(auth_error()));
        let session = manager(&cache, now, &login);

        let err = session.get_token().await.unwrap_err();

        assert_eq!(err, SessionError::Login(auth_error()));
        assert_eq!(cache.get(), "expired");
        assert_eq!(cache.expires_at(), Some(expired_at));

        // Not retried within the call, but the next call tries again.
        assert_eq!(login.calls(), 1);
        let _ = session.get_token().await;
        assert_eq!(login.calls(), 2);
    }

    #[tokio::test]
    async fn refresh_failure_leaves_cache_empty() {
        let now = at("2021-03-25T12:00:00+09:00");
        let cache = Arc::new(TokenCache::new());
        cache.set("old", now.with_timezone(&Utc) + TimeDelta::hours(1));
        let login = Arc::new(CountingLogin::failing(auth_error()));
        let session = manager(&cache, now, &login);

        assert!(session.refresh().await.is_err());
        assert!(cache.get().is_empty());
        assert_eq!(cache.expires_at(), None);
        assert!(!session.has_valid_token());
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_login() {
        let cache = Arc::new(TokenCache::new());
        let login = Arc::new(CountingLogin::ok());
        let session = Arc::new(manager(&cache, at("2021-03-25T12:00:00+09:00"), &login));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let session = Arc::clone(&session);
            handles.push(tokio::spawn(async move { session.get_token().await }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), "token-1");
        }
        assert_eq!(login.calls(), 1);
    }
}
