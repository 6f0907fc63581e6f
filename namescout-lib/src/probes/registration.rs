//! WHOIS-style registration probe.
//!
//! Queries the system `whois` command for the candidate host and parses the
//! unstructured response into an availability verdict plus registrar
//! metadata. WHOIS responses vary wildly between registries, so parsing
//! works off pattern tables; when the tables cannot produce a definitive
//! answer the verdict is unknown, never a guess. A lookup
//! the service itself sabotages (missing binary, rate limit) fails with
//! `ProbeUnavailable`, which leaves the terminal record unknown as well.

use crate::candidate::Candidate;
use crate::error::FailureCause;
use crate::probes::{Outcome, Probe};
use crate::types::{Domain, LookupStatus};
use std::future::Future;
use std::time::{Duration, Instant, SystemTime};
use tokio::process::Command;

/// Success payload of a registration lookup.
#[derive(Debug, Clone, Default)]
pub struct RegistrationDetail {
    /// `Some(true)` available, `Some(false)` registered, `None` unknown
    pub available: Option<bool>,
    /// Sponsoring registrar, when the response named one
    pub registrar: Option<String>,
    /// Expiry date as reported, unparsed
    pub expiration_date: Option<String>,
}

/// Registration probe backed by the system `whois` command.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistrationProbe;

impl RegistrationProbe {
    pub fn new() -> Self {
        Self
    }
}

impl Probe for RegistrationProbe {
    type Detail = RegistrationDetail;
    type Report = Domain;

    fn probe(
        &self,
        candidate: &Candidate,
        timeout: Duration,
    ) -> impl Future<Output = Outcome<RegistrationDetail>> + Send {
        async move {
            let started = Instant::now();

            // A parseable candidate can still lack a host (fallback path).
            if candidate.host.is_empty() {
                return Outcome::failed(FailureCause::InvalidCandidate);
            }

            let lookup = tokio::time::timeout(timeout, run_whois(&candidate.host)).await;
            let elapsed = started.elapsed();

            match lookup {
                Ok(Ok(output)) => {
                    if is_rate_limited(&output) {
                        tracing::debug!(host = %candidate.host, "whois rate-limited");
                        Outcome::Failure {
                            cause: FailureCause::ProbeUnavailable,
                            elapsed,
                        }
                    } else {
                        let detail = parse_registration(&output);
                        tracing::debug!(
                            host = %candidate.host,
                            available = ?detail.available,
                            elapsed_ms = elapsed.as_millis() as u64,
                            "registration probe completed"
                        );
                        Outcome::Success { detail, elapsed }
                    }
                }
                Ok(Err(cause)) => Outcome::Failure { cause, elapsed },
                Err(_) => Outcome::Failure {
                    cause: FailureCause::Timeout,
                    elapsed,
                },
            }
        }
    }

    fn pending(candidate: Candidate) -> Domain {
        Domain::pending(candidate)
    }

    fn resolve(domain: &mut Domain, outcome: Outcome<RegistrationDetail>) {
        match outcome {
            Outcome::Success { detail, elapsed } => {
                domain.status = LookupStatus::Resolved;
                domain.available = detail.available;
                domain.registrar = detail.registrar;
                domain.expiration_date = detail.expiration_date;
                domain.response_time = Some(elapsed);
                domain.error = None;
            }
            Outcome::Failure { cause, elapsed } => {
                domain.status = LookupStatus::Failed;
                domain.error = Some(cause);
                // Availability stays unknown; a failed lookup proves nothing.
                domain.available = None;
                domain.response_time = (elapsed > Duration::ZERO).then_some(elapsed);
            }
        }
        domain.observed_at = SystemTime::now();
    }
}

/// Run `whois <host>` and capture stdout.
async fn run_whois(host: &str) -> Result<String, FailureCause> {
    let output = Command::new("whois")
        .arg(host)
        .output()
        .await
        .map_err(|_| FailureCause::ProbeUnavailable)?;
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Responses that typically indicate the name is unregistered.
const AVAILABLE_PATTERNS: &[&str] = &[
    "no match",
    "not found",
    "no data found",
    "no entries found",
    "domain not found",
    "domain available",
    "status: available",
    "status: free",
    "not registered",
    "no matching record",
    "domain status: no object found",
    "the queried object does not exist",
    "object does not exist",
    "no matching entry",
    "domain name not found",
    "this domain name has not been registered",
];

/// Field labels that indicate an active registration. A single hit can be
/// boilerplate; two or more means the record is real.
const TAKEN_PATTERNS: &[&str] = &[
    "domain status:",
    "registrar:",
    "creation date:",
    "created:",
    "registry domain id:",
    "registrant:",
    "name server:",
    "nameservers:",
    "expiry date:",
    "expires:",
    "updated date:",
];

const RATE_LIMIT_PATTERNS: &[&str] = &[
    "rate limit exceeded",
    "too many requests",
    "try again later",
    "quota exceeded",
    "limit exceeded",
    "throttled",
    "rate-limited",
];

/// Parse a WHOIS response into an availability verdict plus metadata.
///
/// Verdicts come only from the pattern tables; responses matching neither
/// table resolve to unknown rather than a guess.
fn parse_registration(output: &str) -> RegistrationDetail {
    let lower = output.to_lowercase();

    for pattern in AVAILABLE_PATTERNS {
        if lower.contains(pattern) {
            return RegistrationDetail {
                available: Some(true),
                ..Default::default()
            };
        }
    }

    let taken_hits = TAKEN_PATTERNS
        .iter()
        .filter(|pattern| lower.contains(*pattern))
        .count();

    if taken_hits >= 2 {
        return RegistrationDetail {
            available: Some(false),
            registrar: extract_field(output, &["registrar:"]),
            expiration_date: extract_field(
                output,
                &["registry expiry date:", "expiry date:", "expires:"],
            ),
        };
    }

    RegistrationDetail::default()
}

/// Whether the response is a rate-limit rejection rather than data.
fn is_rate_limited(output: &str) -> bool {
    let lower = output.to_lowercase();
    RATE_LIMIT_PATTERNS
        .iter()
        .any(|pattern| lower.contains(pattern))
}

/// First non-empty value after any of the given labels, scanning
/// line-by-line case-insensitively.
fn extract_field(output: &str, labels: &[&str]) -> Option<String> {
    for line in output.lines() {
        let lower = line.to_lowercase();
        for label in labels {
            if let Some(position) = lower.find(label) {
                let value = line[position + label.len()..].trim();
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_available_patterns() {
        let detail = parse_registration("No matching record found for example-free.com");
        assert_eq!(detail.available, Some(true));

        let detail = parse_registration("Domain not found");
        assert_eq!(detail.available, Some(true));
    }

    #[test]
    fn parses_taken_record_with_metadata() {
        let response = "Domain Status: clientTransferProhibited\n\
                        Registrar: Example Registrar Inc.\n\
                        Registry Expiry Date: 2027-01-01T00:00:00Z\n\
                        Creation Date: 2001-05-05";
        let detail = parse_registration(response);

        assert_eq!(detail.available, Some(false));
        assert_eq!(detail.registrar.as_deref(), Some("Example Registrar Inc."));
        assert_eq!(
            detail.expiration_date.as_deref(),
            Some("2027-01-01T00:00:00Z")
        );
    }

    #[test]
    fn ambiguous_output_resolves_unknown() {
        // One boilerplate hit is not evidence of registration.
        let detail = parse_registration("registrar: \nsome unrelated banner text");
        assert_eq!(detail.available, None);

        let detail = parse_registration("% terse registry banner with no data fields");
        assert_eq!(detail.available, None);
    }

    #[test]
    fn detects_rate_limiting() {
        assert!(is_rate_limited("Rate limit exceeded. Try again later."));
        assert!(is_rate_limited("TOO MANY REQUESTS from your IP"));
        assert!(!is_rate_limited("Domain Status: ok"));
    }

    #[test]
    fn rate_limited_lookup_leaves_availability_unknown() {
        // A rate-limited lookup must never produce a true/false verdict.
        let candidate = Candidate::parse("mybrand.io").unwrap();
        let mut domain = RegistrationProbe::pending(candidate);
        RegistrationProbe::resolve(
            &mut domain,
            Outcome::Failure {
                cause: FailureCause::ProbeUnavailable,
                elapsed: Duration::from_millis(12),
            },
        );

        assert_eq!(domain.status, LookupStatus::Failed);
        assert_eq!(domain.available, None);
        assert_eq!(domain.error, Some(FailureCause::ProbeUnavailable));
    }

    #[test]
    fn resolve_success_records_metadata() {
        let candidate = Candidate::parse("taken.com").unwrap();
        let mut domain = RegistrationProbe::pending(candidate);
        RegistrationProbe::resolve(
            &mut domain,
            Outcome::Success {
                detail: RegistrationDetail {
                    available: Some(false),
                    registrar: Some("Example Registrar".into()),
                    expiration_date: Some("2030-01-01".into()),
                },
                elapsed: Duration::from_millis(80),
            },
        );

        assert_eq!(domain.status, LookupStatus::Resolved);
        assert_eq!(domain.available, Some(false));
        assert_eq!(domain.registrar.as_deref(), Some("Example Registrar"));
        assert!(domain.error.is_none());
    }
}
