//! Engine behaviour tests against a scripted probe.
//!
//! No network: the probe below replays per-host scripts with configurable
//! delays, and the tokio clock is paused so timing assertions are exact.

use futures::StreamExt;
use namescout_lib::{
    CancelToken, CheckOptions, Checker, FailureCause, Outcome, Probe, ScoutError, Site, SiteStatus,
};
use namescout_lib::Candidate;
use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

/// One scripted attempt result.
#[derive(Debug, Clone, Copy)]
enum Step {
    Ok(u16),
    Fail(FailureCause),
}

/// Probe that replays a per-host script, sleeping a per-host delay first.
/// Tracks attempt counts and the peak number of concurrently running
/// attempts.
#[derive(Default)]
struct ScriptedProbe {
    script: Mutex<HashMap<String, VecDeque<Step>>>,
    delays: HashMap<String, Duration>,
    calls: Arc<AtomicUsize>,
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
}

impl ScriptedProbe {
    fn new() -> Self {
        Self::default()
    }

    fn with_script(mut self, host: &str, steps: &[Step]) -> Self {
        self.script
            .get_mut()
            .unwrap()
            .insert(host.to_string(), steps.iter().copied().collect());
        self
    }

    fn with_delay(mut self, host: &str, delay: Duration) -> Self {
        self.delays.insert(host.to_string(), delay);
        self
    }

    /// Handles that stay readable after the probe moves into a checker.
    fn counters(&self) -> (Arc<AtomicUsize>, Arc<AtomicUsize>) {
        (Arc::clone(&self.calls), Arc::clone(&self.peak_in_flight))
    }
}

/// Decrements the in-flight counter even when the attempt future is
/// dropped mid-sleep (timeout abandonment, cancellation).
struct FlightGuard<'a>(&'a AtomicUsize);

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Probe for ScriptedProbe {
    type Detail = u16;
    type Report = Site;

    fn probe(
        &self,
        candidate: &Candidate,
        _timeout: Duration,
    ) -> impl Future<Output = Outcome<u16>> + Send {
        let host = candidate.host.clone();
        async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak_in_flight.fetch_max(current, Ordering::SeqCst);
            let _guard = FlightGuard(&self.in_flight);

            let delay = self
                .delays
                .get(&host)
                .copied()
                .unwrap_or(Duration::from_millis(1));
            tokio::time::sleep(delay).await;

            let step = self
                .script
                .lock()
                .unwrap()
                .get_mut(&host)
                .and_then(|steps| steps.pop_front())
                .unwrap_or(Step::Ok(200));

            match step {
                Step::Ok(code) => Outcome::Success {
                    detail: code,
                    elapsed: delay,
                },
                Step::Fail(cause) => Outcome::Failure {
                    cause,
                    elapsed: delay,
                },
            }
        }
    }

    fn pending(candidate: Candidate) -> Site {
        Site::pending(candidate)
    }

    fn resolve(site: &mut Site, outcome: Outcome<u16>) {
        match outcome {
            Outcome::Success { detail, elapsed } => {
                site.status = SiteStatus::Online;
                site.status_code = Some(detail);
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

fn inputs(hosts: &[&str]) -> Vec<String> {
    hosts.iter().map(|h| h.to_string()).collect()
}

#[tokio::test(start_paused = true)]
async fn output_order_matches_input_order() {
    // The first candidate is far slower than the second; completion order
    // inverts, positional order must not.
    let probe = ScriptedProbe::new()
        .with_delay("slow.com", Duration::from_millis(300))
        .with_delay("fast.com", Duration::from_millis(1));
    let checker = Checker::with_options(
        probe,
        CheckOptions::default().with_concurrency(2),
    );

    let results = checker
        .check_all(&inputs(&["slow.com", "fast.com"]))
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].candidate.host, "slow.com");
    assert_eq!(results[1].candidate.host, "fast.com");
    assert!(results.iter().all(|site| site.is_online()));
}

#[tokio::test(start_paused = true)]
async fn in_flight_probes_never_exceed_concurrency() {
    let hosts: Vec<String> = (0..20).map(|i| format!("host{}.com", i)).collect();
    let mut probe = ScriptedProbe::new();
    for host in &hosts {
        probe = probe.with_delay(host, Duration::from_millis(20));
    }
    let (calls, peak) = probe.counters();
    let checker = Checker::with_options(probe, CheckOptions::default().with_concurrency(3));

    let results = checker.check_all(&hosts).await.unwrap();

    assert_eq!(results.len(), 20);
    assert_eq!(calls.load(Ordering::SeqCst), 20);
    assert!(
        peak.load(Ordering::SeqCst) <= 3,
        "peak in-flight {} exceeded bound 3",
        peak.load(Ordering::SeqCst)
    );
}

#[tokio::test(start_paused = true)]
async fn retry_then_success_ends_online() {
    let probe = ScriptedProbe::new().with_script(
        "flaky.com",
        &[
            Step::Fail(FailureCause::ConnectionFailure),
            Step::Fail(FailureCause::ConnectionFailure),
            Step::Ok(200),
        ],
    );
    let (calls, _) = probe.counters();
    let checker = Checker::with_options(
        probe,
        CheckOptions::default()
            .with_max_retries(2)
            .with_retry_backoff(Duration::from_millis(10)),
    );

    let site = checker.check_one("flaky.com").await.unwrap();

    assert_eq!(site.status, SiteStatus::Online);
    assert_eq!(site.status_code, Some(200));
    assert!(site.error.is_none());
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn retries_exhausted_records_last_cause() {
    let probe = ScriptedProbe::new().with_script(
        "dead.com",
        &[
            Step::Fail(FailureCause::ConnectionFailure),
            Step::Fail(FailureCause::ConnectionFailure),
            Step::Fail(FailureCause::DnsFailure),
        ],
    );
    let checker = Checker::with_options(
        probe,
        CheckOptions::default()
            .with_max_retries(2)
            .with_retry_backoff(Duration::from_millis(10)),
    );

    let site = checker.check_one("dead.com").await.unwrap();

    assert_eq!(site.status, SiteStatus::Offline);
    assert_eq!(site.error, Some(FailureCause::DnsFailure));
}

#[tokio::test(start_paused = true)]
async fn non_retryable_failure_short_circuits() {
    let probe = ScriptedProbe::new()
        .with_script("loop.com", &[Step::Fail(FailureCause::TooManyRedirects)]);
    let (calls, _) = probe.counters();
    let checker = Checker::with_options(
        probe,
        CheckOptions::default()
            .with_max_retries(3)
            .with_retry_backoff(Duration::from_millis(10)),
    );

    let site = checker.check_one("loop.com").await.unwrap();

    assert_eq!(site.status, SiteStatus::Offline);
    assert_eq!(site.error, Some(FailureCause::TooManyRedirects));
    // A deterministic failure is not retried.
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn slow_probe_is_abandoned_at_the_deadline() {
    let probe = ScriptedProbe::new().with_delay("hang.com", Duration::from_secs(600));
    let checker = Checker::with_options(
        probe,
        CheckOptions::default().with_timeout(Duration::from_millis(100)),
    );

    let started = tokio::time::Instant::now();
    let site = checker.check_one("hang.com").await.unwrap();
    let waited = started.elapsed();

    assert_eq!(site.status, SiteStatus::Offline);
    assert_eq!(site.error, Some(FailureCause::Timeout));
    // The batch never waits for the hung operation's true completion.
    assert!(
        waited < Duration::from_secs(1),
        "waited {:?} for a 100ms deadline",
        waited
    );
}

#[tokio::test(start_paused = true)]
async fn cancellation_resolves_every_pending_slot() {
    let probe = ScriptedProbe::new()
        .with_delay("fast.com", Duration::from_millis(10))
        .with_delay("slow1.com", Duration::from_secs(600))
        .with_delay("slow2.com", Duration::from_secs(600))
        .with_delay("slow3.com", Duration::from_secs(600));
    let checker = Checker::with_options(
        probe,
        CheckOptions::default()
            .with_concurrency(4)
            .with_timeout(Duration::from_secs(3600)),
    );

    let token = CancelToken::new();
    let batch = inputs(&["fast.com", "slow1.com", "slow2.com", "slow3.com"]);
    let (results, _) = tokio::join!(checker.check_all_with_cancel(&batch, &token), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        token.cancel();
    });
    let results = results.unwrap();

    assert_eq!(results.len(), 4);
    // The fast candidate resolved before cancellation and keeps its result.
    assert_eq!(results[0].status, SiteStatus::Online);
    for site in &results[1..] {
        assert_eq!(site.status, SiteStatus::Offline);
        assert_eq!(site.error, Some(FailureCause::Cancelled));
    }
    assert!(results.iter().all(|site| site.is_terminal()));
}

#[tokio::test(start_paused = true)]
async fn mixed_batch_with_invalid_candidate() {
    let probe = ScriptedProbe::new();
    let (calls, _) = probe.counters();
    let checker = Checker::with_options(
        probe,
        CheckOptions::default().with_concurrency(2),
    );

    let results = checker
        .check_all(&inputs(&["example.com", "http://Example.COM/", "not a url ???"]))
        .await
        .unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].candidate.url, "https://example.com");
    assert_eq!(results[1].candidate.url, "http://example.com/");
    assert!(results[0].is_online());
    assert!(results[1].is_online());

    // The malformed input resolved without a probe attempt.
    assert_eq!(results[2].status, SiteStatus::Offline);
    assert_eq!(results[2].error, Some(FailureCause::InvalidCandidate));
    assert_eq!(results[2].candidate.raw_input, "not a url ???");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn empty_batch_is_rejected_before_probing() {
    let checker = Checker::with_options(ScriptedProbe::new(), CheckOptions::default());
    let error = checker.check_all(&[]).await.unwrap_err();
    assert!(matches!(error, ScoutError::InvalidBatch { .. }));
}

#[tokio::test(start_paused = true)]
async fn check_one_is_a_batch_of_one() {
    let checker = Checker::with_options(ScriptedProbe::new(), CheckOptions::default());
    let site = checker.check_one("single.com").await.unwrap();
    assert_eq!(site.candidate.host, "single.com");
    assert!(site.is_online());
}

#[tokio::test(start_paused = true)]
async fn stream_yields_every_candidate() {
    let probe = ScriptedProbe::new()
        .with_delay("a.com", Duration::from_millis(50))
        .with_delay("b.com", Duration::from_millis(5));
    let checker = Checker::with_options(
        probe,
        CheckOptions::default().with_concurrency(2),
    );

    let batch = inputs(&["a.com", "b.com", "not a url ???"]);
    let results: Vec<Site> = checker.check_stream(&batch).collect().await;

    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|site| site.is_terminal()));
    // Completion order: the invalid input and the fast host finish before
    // the slow one.
    assert_eq!(results[2].candidate.host, "a.com");
}
