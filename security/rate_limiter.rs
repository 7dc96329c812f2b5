//! Login Attempt Limiting
//!
//! Counts failed logins per normalized email and locks the email out once
//! `max_attempts` failures land within the lockout window. State lives in an
//! injected [`AttemptStore`], so tests can start from a clean slate and a
//! shared (server-backed) store can replace the in-process map.
//!
//! This limiter only slows down casual retries. The backend enforces the
//! real limit.

use crate::input_sanitizer::{InputSanitizer, SanitizationError};
use capinhas_core::LoginLimitSettings;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Rate limiter errors
#[derive(Error, Debug)]
pub enum RateLimitError {
    /// The email could not be normalized into a key
    #[error("Invalid login key: {0}")]
    InvalidKey(#[from] SanitizationError),
}

/// Result type for the limiter
pub type Result<T> = std::result::Result<T, RateLimitError>;

/// Login limiter configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginLimitConfig {
    /// Failed attempts allowed before lockout
    pub max_attempts: u32,

    /// Lockout window, measured from the last failed attempt
    pub lockout: Duration,
}

impl Default for LoginLimitConfig {
    fn default() -> Self {
        Self::from(&LoginLimitSettings::default())
    }
}

impl From<&LoginLimitSettings> for LoginLimitConfig {
    fn from(settings: &LoginLimitSettings) -> Self {
        Self {
            max_attempts: settings.max_attempts,
            lockout: Duration::from_secs(settings.lockout_seconds),
        }
    }
}

/// Failed attempts recorded for one key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptRecord {
    /// Failures since the record was created
    pub count: u32,

    /// Time of the most recent failure
    pub last_attempt: DateTime<Utc>,
}

/// Storage for attempt records, keyed by normalized email
///
/// Limiters sharing a store only count every failure when `update` is atomic
/// for its key.
pub trait AttemptStore {
    /// Record for `key`, if any
    fn get(&self, key: &str) -> Option<AttemptRecord>;

    /// Insert or replace the record for `key`
    fn put(&self, key: &str, record: AttemptRecord);

    /// Replace the record for `key` with `f(current)` as one step; `None`
    /// removes it. Returns the stored record.
    fn update(
        &self,
        key: &str,
        f: &mut dyn FnMut(Option<AttemptRecord>) -> Option<AttemptRecord>,
    ) -> Option<AttemptRecord>;

    /// Forget `key`
    fn remove(&self, key: &str);

    /// Forget everything
    fn clear(&self);
}

/// Process-local attempt store
#[derive(Debug, Default)]
pub struct InMemoryAttemptStore {
    entries: Mutex<HashMap<String, AttemptRecord>>,
}

impl InMemoryAttemptStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tracked keys
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether no key is tracked
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl AttemptStore for InMemoryAttemptStore {
    fn get(&self, key: &str) -> Option<AttemptRecord> {
        self.entries.lock().get(key).copied()
    }

    fn put(&self, key: &str, record: AttemptRecord) {
        self.entries.lock().insert(key.to_string(), record);
    }

    fn update(
        &self,
        key: &str,
        f: &mut dyn FnMut(Option<AttemptRecord>) -> Option<AttemptRecord>,
    ) -> Option<AttemptRecord> {
        let mut entries = self.entries.lock();
        match f(entries.get(key).copied()) {
            Some(record) => {
                entries.insert(key.to_string(), record);
                Some(record)
            }
            None => {
                entries.remove(key);
                None
            }
        }
    }

    fn remove(&self, key: &str) {
        self.entries.lock().remove(key);
    }

    fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl<S: AttemptStore + ?Sized> AttemptStore for &S {
    fn get(&self, key: &str) -> Option<AttemptRecord> {
        (**self).get(key)
    }

    fn put(&self, key: &str, record: AttemptRecord) {
        (**self).put(key, record)
    }

    fn update(
        &self,
        key: &str,
        f: &mut dyn FnMut(Option<AttemptRecord>) -> Option<AttemptRecord>,
    ) -> Option<AttemptRecord> {
        (**self).update(key, f)
    }

    fn remove(&self, key: &str) {
        (**self).remove(key)
    }

    fn clear(&self) {
        (**self).clear()
    }
}

/// Limiter decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginDecision {
    /// Login may be attempted
    Allowed {
        /// Failures left before lockout
        remaining: u32,
    },

    /// Too many failures; try again later
    Locked {
        /// Time until the lockout window ends
        retry_after: Duration,
    },
}

impl LoginDecision {
    /// Whether a login may be attempted
    pub fn is_allowed(&self) -> bool {
        matches!(self, LoginDecision::Allowed { .. })
    }
}

/// Login rate limiter over an injected store
#[derive(Debug)]
pub struct LoginRateLimiter<S: AttemptStore = InMemoryAttemptStore> {
    config: LoginLimitConfig,
    store: S,
    sanitizer: InputSanitizer,
}

impl LoginRateLimiter<InMemoryAttemptStore> {
    /// Limiter with a fresh process-local store
    pub fn in_memory(config: LoginLimitConfig) -> Self {
        Self::new(config, InMemoryAttemptStore::new())
    }
}

impl<S: AttemptStore> LoginRateLimiter<S> {
    /// Create new limiter over `store`
    pub fn new(config: LoginLimitConfig, store: S) -> Self {
        Self {
            config,
            store,
            sanitizer: InputSanitizer::new(),
        }
    }

    /// Underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Whether `email` may attempt a login at `now`
    pub fn check(&self, email: &str, now: DateTime<Utc>) -> Result<LoginDecision> {
        let key = self.sanitizer.normalize_email(email)?;
        let record = self.live_record(&key, now);
        Ok(self.decide(record, now))
    }

    /// Record a failed login for `email` at `now`
    pub fn record_failure(&self, email: &str, now: DateTime<Utc>) -> Result<LoginDecision> {
        let key = self.sanitizer.normalize_email(email)?;
        let lockout = self.config.lockout;
        let mut count = 0;
        self.store.update(&key, &mut |current| {
            let live = current.filter(|record| elapsed_since(record.last_attempt, now) < lockout);
            count = live.map_or(0, |record| record.count).saturating_add(1);
            Some(AttemptRecord {
                count,
                last_attempt: now,
            })
        });
        let record = AttemptRecord {
            count,
            last_attempt: now,
        };

        if count >= self.config.max_attempts {
            warn!(key = %key, attempts = count, "Login locked out after repeated failures");
        } else {
            debug!(key = %key, attempts = count, "Failed login recorded");
        }

        Ok(self.decide(Some(record), now))
    }

    /// Forget the failures of `email` after a successful login
    pub fn record_success(&self, email: &str) -> Result<()> {
        let key = self.sanitizer.normalize_email(email)?;
        self.store.remove(&key);
        Ok(())
    }

    /// Forget every record
    pub fn reset(&self) {
        self.store.clear();
        info!("Login rate limiter reset");
    }

    /// Record for `key`, dropping it once its window has passed
    fn live_record(&self, key: &str, now: DateTime<Utc>) -> Option<AttemptRecord> {
        let record = self.store.get(key)?;
        if elapsed_since(record.last_attempt, now) >= self.config.lockout {
            self.store.remove(key);
            return None;
        }
        Some(record)
    }

    fn decide(&self, record: Option<AttemptRecord>, now: DateTime<Utc>) -> LoginDecision {
        match record {
            Some(record) if record.count >= self.config.max_attempts => LoginDecision::Locked {
                retry_after: self
                    .config
                    .lockout
                    .saturating_sub(elapsed_since(record.last_attempt, now)),
            },
            Some(record) => LoginDecision::Allowed {
                remaining: self.config.max_attempts - record.count,
            },
            None => LoginDecision::Allowed {
                remaining: self.config.max_attempts,
            },
        }
    }
}

/// Wall-clock time since `then`; zero if the clock went backwards
fn elapsed_since(then: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    (now - then).to_std().unwrap_or(Duration::ZERO)
}
