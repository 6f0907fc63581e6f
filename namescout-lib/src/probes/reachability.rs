//! HTTP reachability probe.
//!
//! Issues a single HEAD request against the candidate URL, falling back to
//! GET when the server rejects HEAD (405/501). Redirects are followed up to
//! a fixed limit; hitting the limit classifies as `TooManyRedirects`. Any
//! completed response counts as reachable, whatever its status code;
//! classification into online/offline happens in [`Probe::resolve`].

use crate::candidate::Candidate;
use crate::error::FailureCause;
use crate::probes::{Outcome, Probe};
use crate::types::{Site, SiteStatus};
use reqwest::StatusCode;
use std::future::Future;
use std::time::{Duration, Instant, SystemTime};

/// Redirect ceiling before an attempt is classified as a redirect loop.
const MAX_REDIRECTS: usize = 5;

/// Success payload of a reachability attempt.
#[derive(Debug, Clone, Copy)]
pub struct HttpDetail {
    /// Final status code after redirects
    pub status_code: u16,
}

/// Reachability probe backed by a shared HTTP client.
///
/// The client carries no global timeout; each attempt sets its own
/// per-request deadline so the checker's `timeout` option is authoritative.
#[derive(Clone)]
pub struct ReachabilityProbe {
    client: reqwest::Client,
}

impl ReachabilityProbe {
    /// Build the probe and its HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ScoutError::Config`] when the TLS backend cannot be
    /// initialised.
    pub fn new() -> Result<Self, crate::error::ScoutError> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| {
                crate::error::ScoutError::config(format!("failed to build HTTP client: {}", e))
            })?;
        Ok(Self { client })
    }

    async fn request(
        &self,
        candidate: &Candidate,
        timeout: Duration,
    ) -> Result<reqwest::Response, reqwest::Error> {
        let head = self
            .client
            .head(&candidate.url)
            .timeout(timeout)
            .send()
            .await;

        match head {
            // Some servers refuse HEAD outright; retry the same exchange as GET.
            Ok(response)
                if response.status() == StatusCode::METHOD_NOT_ALLOWED
                    || response.status() == StatusCode::NOT_IMPLEMENTED =>
            {
                self.client.get(&candidate.url).timeout(timeout).send().await
            }
            other => other,
        }
    }
}

impl Probe for ReachabilityProbe {
    type Detail = HttpDetail;
    type Report = Site;

    fn probe(
        &self,
        candidate: &Candidate,
        timeout: Duration,
    ) -> impl Future<Output = Outcome<HttpDetail>> + Send {
        async move {
            let started = Instant::now();
            let result = self.request(candidate, timeout).await;
            let elapsed = started.elapsed();

            match result {
                Ok(response) => {
                    let status_code = response.status().as_u16();
                    tracing::debug!(
                        host = %candidate.host,
                        status_code,
                        elapsed_ms = elapsed.as_millis() as u64,
                        "reachability probe completed"
                    );
                    Outcome::Success {
                        detail: HttpDetail { status_code },
                        elapsed,
                    }
                }
                Err(error) => {
                    let cause = classify_reqwest_error(&error);
                    tracing::debug!(
                        host = %candidate.host,
                        %cause,
                        elapsed_ms = elapsed.as_millis() as u64,
                        "reachability probe failed"
                    );
                    Outcome::Failure { cause, elapsed }
                }
            }
        }
    }

    fn pending(candidate: Candidate) -> Site {
        Site::pending(candidate)
    }

    fn resolve(site: &mut Site, outcome: Outcome<HttpDetail>) {
        match outcome {
            Outcome::Success { detail, elapsed } => {
                site.status = SiteStatus::Online;
                site.status_code = Some(detail.status_code);
                site.response_time = Some(elapsed);
                site.error = None;
            }
            Outcome::Failure { cause, elapsed } => {
                site.status = SiteStatus::Offline;
                site.error = Some(cause);
                site.status_code = None;
                site.response_time = (elapsed > Duration::ZERO).then_some(elapsed);
            }
        }
        site.observed_at = SystemTime::now();
    }
}

/// Map a reqwest error onto the failure taxonomy.
///
/// reqwest surfaces most transport problems through a handful of
/// predicates; anything they miss is classified by scanning the error
/// source chain for DNS/TLS markers.
fn classify_reqwest_error(error: &reqwest::Error) -> FailureCause {
    let chain = error_chain_text(error);

    if error.is_timeout() {
        FailureCause::Timeout
    } else if error.is_redirect() {
        FailureCause::TooManyRedirects
    } else if chain.contains("certificate")
        || chain.contains("tls")
        || chain.contains("ssl")
        || chain.contains("handshake")
    {
        FailureCause::TlsFailure
    } else if chain.contains("dns") || chain.contains("resolve") || chain.contains("lookup") {
        FailureCause::DnsFailure
    } else {
        FailureCause::ConnectionFailure
    }
}

/// Lower-cased concatenation of the error and its source chain. reqwest's
/// top-level Display often hides the root cause (e.g. the DNS message),
/// so classification needs the whole chain.
fn error_chain_text(error: &reqwest::Error) -> String {
    let mut text = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(inner) = source {
        text.push_str(": ");
        text.push_str(&inner.to_string());
        source = inner.source();
    }
    text.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site_for(input: &str) -> Site {
        Site::pending(Candidate::parse(input).unwrap())
    }

    #[test]
    fn resolve_success_sets_online() {
        let mut site = site_for("example.com");
        ReachabilityProbe::resolve(
            &mut site,
            Outcome::Success {
                detail: HttpDetail { status_code: 200 },
                elapsed: Duration::from_millis(42),
            },
        );

        assert_eq!(site.status, SiteStatus::Online);
        assert_eq!(site.status_code, Some(200));
        assert_eq!(site.response_time, Some(Duration::from_millis(42)));
        assert!(site.error.is_none());
    }

    #[test]
    fn resolve_success_any_status_code_is_online() {
        // A 404 is still a reachable server.
        let mut site = site_for("example.com");
        ReachabilityProbe::resolve(
            &mut site,
            Outcome::Success {
                detail: HttpDetail { status_code: 404 },
                elapsed: Duration::from_millis(10),
            },
        );
        assert!(site.is_online());
        assert_eq!(site.status_code, Some(404));
    }

    #[test]
    fn resolve_failure_sets_offline_with_cause() {
        let mut site = site_for("example.com");
        ReachabilityProbe::resolve(
            &mut site,
            Outcome::Failure {
                cause: FailureCause::DnsFailure,
                elapsed: Duration::from_millis(5),
            },
        );

        assert_eq!(site.status, SiteStatus::Offline);
        assert_eq!(site.error, Some(FailureCause::DnsFailure));
        assert!(site.status_code.is_none());
    }

    #[test]
    fn resolve_failure_without_measurement_keeps_none() {
        let mut site = site_for("example.com");
        ReachabilityProbe::resolve(&mut site, Outcome::failed(FailureCause::Cancelled));
        assert!(site.response_time.is_none());
        assert_eq!(site.error, Some(FailureCause::Cancelled));
    }
}
