//! Error handling for candidate checking operations.
//!
//! Two layers live here. `ScoutError` is the library's hard-error type:
//! problems that abort a call (invalid batch, broken config file).
//! `FailureCause` is data, not an error: the classified reason a single
//! candidate ended up offline or unresolved. Per-candidate failures are
//! recorded on the result record and never abort the batch.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classified cause of a failed probe attempt.
///
/// Stored on the finished `Site`/`Domain` record. One candidate failing
/// with any of these never affects the rest of the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCause {
    /// Input string could not be coerced into a URL-like token
    InvalidCandidate,
    /// Attempt exceeded the per-attempt deadline
    Timeout,
    /// Hostname did not resolve
    DnsFailure,
    /// Connection refused, reset, or otherwise failed
    ConnectionFailure,
    /// TLS handshake or certificate validation failed
    TlsFailure,
    /// Redirect limit reached while following responses
    TooManyRedirects,
    /// Batch was cancelled before this candidate resolved
    Cancelled,
    /// Registration lookup service unreachable or rate-limited
    ProbeUnavailable,
}

impl FailureCause {
    /// Whether an attempt that failed with this cause is worth retrying.
    ///
    /// Transient network conditions are; malformed input, cancellation,
    /// and deterministic redirect loops are not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FailureCause::Timeout
                | FailureCause::DnsFailure
                | FailureCause::ConnectionFailure
                | FailureCause::TlsFailure
                | FailureCause::ProbeUnavailable
        )
    }
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FailureCause::InvalidCandidate => "invalid candidate",
            FailureCause::Timeout => "timeout",
            FailureCause::DnsFailure => "dns failure",
            FailureCause::ConnectionFailure => "connection failure",
            FailureCause::TlsFailure => "tls failure",
            FailureCause::TooManyRedirects => "too many redirects",
            FailureCause::Cancelled => "cancelled",
            FailureCause::ProbeUnavailable => "probe unavailable",
        };
        f.write_str(text)
    }
}

/// Main error type for namescout operations.
///
/// Only batch-construction and configuration problems surface through this
/// type; everything discoverable per-candidate is a [`FailureCause`] on the
/// candidate's record instead.
#[derive(Debug, Clone)]
pub enum ScoutError {
    /// Input string cannot be turned into a candidate
    InvalidCandidate { input: String, reason: String },

    /// The batch itself is unusable (e.g. empty input list)
    InvalidBatch { reason: String },

    /// A generation pattern is malformed
    InvalidPattern { pattern: String, reason: String },

    /// Configuration store errors (unreadable file, bad TOML, no config dir)
    Config { message: String },

    /// I/O errors outside the config store (file input lists, etc.)
    Io { message: String },
}

impl ScoutError {
    /// Create a new invalid candidate error.
    pub fn invalid_candidate<I: Into<String>, R: Into<String>>(input: I, reason: R) -> Self {
        Self::InvalidCandidate {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create a new invalid batch error.
    pub fn invalid_batch<R: Into<String>>(reason: R) -> Self {
        Self::InvalidBatch {
            reason: reason.into(),
        }
    }

    /// Create a new invalid pattern error.
    pub fn invalid_pattern<P: Into<String>, R: Into<String>>(pattern: P, reason: R) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

impl fmt::Display for ScoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCandidate { input, reason } => {
                write!(f, "invalid candidate '{}': {}", input, reason)
            }
            Self::InvalidBatch { reason } => write!(f, "invalid batch: {}", reason),
            Self::InvalidPattern { pattern, reason } => {
                write!(f, "invalid pattern '{}': {}", pattern, reason)
            }
            Self::Config { message } => write!(f, "configuration error: {}", message),
            Self::Io { message } => write!(f, "i/o error: {}", message),
        }
    }
}

impl std::error::Error for ScoutError {}

impl From<std::io::Error> for ScoutError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ScoutError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config {
            message: format!("malformed config file: {}", err),
        }
    }
}

impl From<toml::ser::Error> for ScoutError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Config {
            message: format!("could not serialize config: {}", err),
        }
    }
}
