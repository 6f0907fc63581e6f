//! Candidate normalization.
//!
//! A [`Candidate`] is the normalized form of one thing to check: the raw
//! input as supplied, a scheme-qualified lower-cased URL, the derived host,
//! and the derived extension. Normalization is a pure function: equal raw
//! inputs (after trim and case-fold) always produce identical candidates,
//! and normalizing an already-normalized URL is a no-op.

use crate::error::ScoutError;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

lazy_static! {
    static ref SCHEME_RE: Regex =
        Regex::new(r"^[a-z][a-z0-9+.-]*://").expect("scheme regex is valid");
}

/// A normalized representation of a single target to check.
///
/// Constructed once at batch-submission time and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Candidate {
    /// The string exactly as supplied by the caller
    pub raw_input: String,

    /// Normalized URL: scheme-qualified and lower-cased
    pub url: String,

    /// Hostname derived from `url` (may be empty in the fallback path)
    pub host: String,

    /// Suffix after the last `.` of `host`, or empty when there is none
    pub extension: String,
}

impl Candidate {
    /// Normalize a raw input string into a candidate.
    ///
    /// Rules: trim surrounding whitespace, lower-case the whole string,
    /// prepend `https://` when no scheme is present, derive the host via
    /// URL parsing with a regex-based strip of scheme and path as the
    /// fallback (the fallback never fails, though the host it produces may
    /// be empty).
    ///
    /// # Errors
    ///
    /// Returns [`ScoutError::InvalidCandidate`] when the input is empty or
    /// contains interior whitespace/control characters, i.e. strings that
    /// cannot be coerced into a URL-like token.
    pub fn parse(raw: &str) -> Result<Self, ScoutError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ScoutError::invalid_candidate(raw, "input is empty"));
        }
        if trimmed.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(ScoutError::invalid_candidate(
                raw,
                "input contains whitespace or control characters",
            ));
        }

        let lowered = trimmed.to_lowercase();
        let url = if SCHEME_RE.is_match(&lowered) {
            lowered
        } else {
            format!("https://{}", lowered)
        };

        let host = match Url::parse(&url) {
            Ok(parsed) => parsed.host_str().unwrap_or_default().to_string(),
            Err(_) => strip_to_host(&url),
        };

        let extension = host
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_string())
            .unwrap_or_default();

        Ok(Self {
            raw_input: raw.to_string(),
            url,
            host,
            extension,
        })
    }

    /// Placeholder candidate for input that failed [`Candidate::parse`].
    ///
    /// Keeps the raw input so the rejected slot still names what was asked
    /// for; url/host/extension stay empty.
    pub(crate) fn rejected(raw: &str) -> Self {
        Self {
            raw_input: raw.to_string(),
            url: String::new(),
            host: String::new(),
            extension: String::new(),
        }
    }

    /// Display label for result rows: the host when one was derived, the
    /// raw input otherwise.
    pub fn label(&self) -> &str {
        if self.host.is_empty() {
            &self.raw_input
        } else {
            &self.host
        }
    }
}

/// Fallback host derivation when URL parsing fails: strip the scheme, then
/// cut everything from the first path/query/fragment separator, drop any
/// userinfo prefix and port suffix.
fn strip_to_host(url: &str) -> String {
    let rest = SCHEME_RE.replace(url, "");
    let rest = rest.split(['/', '?', '#']).next().unwrap_or("");
    let rest = rest.rsplit('@').next().unwrap_or("");
    rest.split(':').next().unwrap_or("").to_string()
}
