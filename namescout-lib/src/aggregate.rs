//! Read-only summaries over completed batches.
//!
//! Everything here is a pure view for presentation layers: counts by
//! status, counts by failure cause, and a stable response-time ordering.
//! No state, no I/O, no mutation of the engine's output.

use crate::error::FailureCause;
use crate::types::{Domain, LookupStatus, Site, SiteStatus};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Aggregate counts over a completed reachability batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SiteSummary {
    pub total: usize,
    pub online: usize,
    pub offline: usize,
    /// Offline counts grouped by classified cause
    pub by_cause: BTreeMap<FailureCause, usize>,
}

impl SiteSummary {
    pub fn of(sites: &[Site]) -> Self {
        let mut summary = Self {
            total: sites.len(),
            ..Default::default()
        };
        for site in sites {
            match site.status {
                SiteStatus::Online => summary.online += 1,
                SiteStatus::Offline => {
                    summary.offline += 1;
                    if let Some(cause) = site.error {
                        *summary.by_cause.entry(cause).or_insert(0) += 1;
                    }
                }
                SiteStatus::Pending => {}
            }
        }
        summary
    }
}

/// Aggregate counts over a completed registration batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DomainSummary {
    pub total: usize,
    pub available: usize,
    pub taken: usize,
    /// Resolved without a definitive verdict, plus failed lookups
    pub unknown: usize,
    /// Failure counts grouped by classified cause
    pub by_cause: BTreeMap<FailureCause, usize>,
}

impl DomainSummary {
    pub fn of(domains: &[Domain]) -> Self {
        let mut summary = Self {
            total: domains.len(),
            ..Default::default()
        };
        for domain in domains {
            match (domain.status, domain.available) {
                (LookupStatus::Resolved, Some(true)) => summary.available += 1,
                (LookupStatus::Resolved, Some(false)) => summary.taken += 1,
                (LookupStatus::Resolved, None) | (LookupStatus::Failed, _) => {
                    summary.unknown += 1;
                    if let Some(cause) = domain.error {
                        *summary.by_cause.entry(cause).or_insert(0) += 1;
                    }
                }
                (LookupStatus::Pending, _) => {}
            }
        }
        summary
    }
}

/// Order sites by response time ascending, keeping input order among
/// equals. Entries without a successful measurement sort last.
pub fn sort_by_response_time(sites: &[Site]) -> Vec<&Site> {
    let mut ordered: Vec<&Site> = sites.iter().collect();
    ordered.sort_by_key(|site| match (site.is_online(), site.response_time) {
        (true, Some(elapsed)) => (0u8, elapsed),
        _ => (1u8, Duration::MAX),
    });
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::Candidate;
    use std::time::Duration;

    fn online(host: &str, millis: u64) -> Site {
        let mut site = Site::pending(Candidate::parse(host).unwrap());
        site.status = SiteStatus::Online;
        site.status_code = Some(200);
        site.response_time = Some(Duration::from_millis(millis));
        site
    }

    fn offline(host: &str, cause: FailureCause) -> Site {
        let mut site = Site::pending(Candidate::parse(host).unwrap());
        site.status = SiteStatus::Offline;
        site.error = Some(cause);
        site
    }

    #[test]
    fn summary_counts_by_status_and_cause() {
        let sites = vec![
            online("a.com", 10),
            offline("b.com", FailureCause::Timeout),
            offline("c.com", FailureCause::Timeout),
            offline("d.com", FailureCause::DnsFailure),
            online("e.com", 20),
        ];

        let summary = SiteSummary::of(&sites);
        assert_eq!(summary.total, 5);
        assert_eq!(summary.online, 2);
        assert_eq!(summary.offline, 3);
        assert_eq!(summary.by_cause[&FailureCause::Timeout], 2);
        assert_eq!(summary.by_cause[&FailureCause::DnsFailure], 1);
    }

    #[test]
    fn sort_puts_fastest_first_and_errors_last() {
        let sites = vec![
            offline("slow.com", FailureCause::Timeout),
            online("b.com", 300),
            online("a.com", 15),
        ];

        let ordered = sort_by_response_time(&sites);
        assert_eq!(ordered[0].candidate.host, "a.com");
        assert_eq!(ordered[1].candidate.host, "b.com");
        assert_eq!(ordered[2].candidate.host, "slow.com");
    }

    #[test]
    fn sort_is_stable_for_equal_times() {
        let sites = vec![online("first.com", 50), online("second.com", 50)];
        let ordered = sort_by_response_time(&sites);
        assert_eq!(ordered[0].candidate.host, "first.com");
        assert_eq!(ordered[1].candidate.host, "second.com");
    }

    #[test]
    fn domain_summary_counts_unknown() {
        let taken = {
            let mut d = Domain::pending(Candidate::parse("x.com").unwrap());
            d.status = LookupStatus::Resolved;
            d.available = Some(false);
            d
        };
        let unresolved = {
            let mut d = Domain::pending(Candidate::parse("y.com").unwrap());
            d.status = LookupStatus::Failed;
            d.error = Some(FailureCause::ProbeUnavailable);
            d
        };

        let summary = DomainSummary::of(&[taken, unresolved]);
        assert_eq!(summary.taken, 1);
        assert_eq!(summary.unknown, 1);
        assert_eq!(summary.by_cause[&FailureCause::ProbeUnavailable], 1);
    }
}
