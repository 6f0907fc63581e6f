//! Core data types for candidate checking.
//!
//! Defines the per-candidate result records ([`Site`] for reachability,
//! [`Domain`] for registration lookups) and the engine configuration.

use crate::candidate::Candidate;
use crate::error::FailureCause;
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime};

/// Result of a reachability probe against one candidate.
///
/// Created in `Pending` state when the candidate enters the engine;
/// finalized exactly once per batch with a terminal status. Once terminal,
/// the engine never touches it again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    /// The candidate this record describes
    pub candidate: Candidate,

    /// Where this candidate is in its lifecycle
    pub status: SiteStatus,

    /// Time the resolving attempt took, when one completed
    #[serde(
        rename = "response_time_ms",
        with = "duration_ms",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub response_time: Option<Duration>,

    /// HTTP status code of the response, present iff the probe succeeded
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub status_code: Option<u16>,

    /// Classified failure cause, present iff the candidate is offline
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<FailureCause>,

    /// When this record was last updated
    pub observed_at: SystemTime,
}

impl Site {
    /// Initial pending record for a candidate entering the engine.
    pub fn pending(candidate: Candidate) -> Self {
        Self {
            candidate,
            status: SiteStatus::Pending,
            response_time: None,
            status_code: None,
            error: None,
            observed_at: SystemTime::now(),
        }
    }

    /// Whether this record has reached a terminal status.
    pub fn is_terminal(&self) -> bool {
        self.status != SiteStatus::Pending
    }

    /// Whether the candidate answered.
    pub fn is_online(&self) -> bool {
        self.status == SiteStatus::Online
    }
}

/// Lifecycle status of a [`Site`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteStatus {
    /// Probe has not completed yet (or a retry is in flight)
    Pending,
    /// A response was received
    Online,
    /// All attempts failed; `error` carries the last cause
    Offline,
}

impl std::fmt::Display for SiteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SiteStatus::Pending => write!(f, "pending"),
            SiteStatus::Online => write!(f, "online"),
            SiteStatus::Offline => write!(f, "offline"),
        }
    }
}

/// Result of a registration (WHOIS-style) lookup against one candidate.
///
/// Same lifecycle shape as [`Site`]; carries availability and registration
/// metadata instead of HTTP details. `available` stays `None` whenever the
/// lookup could not produce a definitive answer; it is never guessed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Domain {
    /// The candidate this record describes
    pub candidate: Candidate,

    /// Where this lookup is in its lifecycle
    pub status: LookupStatus,

    /// `Some(true)` available, `Some(false)` registered, `None` unknown
    pub available: Option<bool>,

    /// Sponsoring registrar, when the registry reported one
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub registrar: Option<String>,

    /// Registration expiry date as reported, unparsed
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub expiration_date: Option<String>,

    /// Time the resolving attempt took, when one completed
    #[serde(
        rename = "response_time_ms",
        with = "duration_ms",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub response_time: Option<Duration>,

    /// Classified failure cause, present iff the lookup failed
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<FailureCause>,

    /// When this record was last updated
    pub observed_at: SystemTime,
}

impl Domain {
    /// Initial pending record for a candidate entering the engine.
    pub fn pending(candidate: Candidate) -> Self {
        Self {
            candidate,
            status: LookupStatus::Pending,
            available: None,
            registrar: None,
            expiration_date: None,
            response_time: None,
            error: None,
            observed_at: SystemTime::now(),
        }
    }

    /// Whether this record has reached a terminal status.
    pub fn is_terminal(&self) -> bool {
        self.status != LookupStatus::Pending
    }
}

/// Lifecycle status of a [`Domain`] lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupStatus {
    /// Lookup has not completed yet (or a retry is in flight)
    Pending,
    /// Lookup completed; `available` holds the (possibly unknown) answer
    Resolved,
    /// All attempts failed; `error` carries the last cause
    Failed,
}

impl std::fmt::Display for LookupStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupStatus::Pending => write!(f, "pending"),
            LookupStatus::Resolved => write!(f, "resolved"),
            LookupStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Configuration for a checker instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckOptions {
    /// Maximum simultaneous in-flight probes.
    /// Default: 10, clamped to 1-100
    pub concurrency: usize,

    /// Per-attempt deadline; attempts past it are abandoned.
    /// Default: 5 seconds
    #[serde(skip)]
    pub timeout: Duration,

    /// Additional attempts after a retryable failure.
    /// Default: 0
    pub max_retries: u32,

    /// Base delay before the first retry, doubled per attempt.
    /// Default: 250 ms
    #[serde(skip)]
    pub retry_backoff: Duration,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            concurrency: 10,
            timeout: Duration::from_secs(5),
            max_retries: 0,
            retry_backoff: Duration::from_millis(250),
        }
    }
}

impl CheckOptions {
    /// Set the concurrency bound, clamped to 1-100.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.clamp(1, 100);
        self
    }

    /// Set the per-attempt deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the number of retries after a retryable failure.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the base retry backoff delay.
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Backoff before retrying after attempt `attempt` (0-based):
    /// `retry_backoff * 2^attempt`, saturating.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.retry_backoff.saturating_mul(1u32 << attempt.min(16))
    }
}

/// Serialize an optional `Duration` as whole milliseconds.
mod duration_ms {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(
        value: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        value
            .map(|d| d.as_millis() as u64)
            .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        let ms = Option::<u64>::deserialize(deserializer)?;
        Ok(ms.map(Duration::from_millis))
    }
}
