//! The checker engine.
//!
//! [`Checker`] drives a [`Probe`] over a batch of candidates under a
//! bounded concurrency pool, a per-attempt deadline, and a retry policy
//! with exponential backoff. The returned collection always matches the
//! input list positionally, whatever order probes complete in, and every
//! slot is terminal by the time a batch call returns.

use crate::candidate::Candidate;
use crate::error::{FailureCause, ScoutError};
use crate::probes::{Outcome, Probe, ReachabilityProbe, RegistrationProbe};
use futures::stream::{Stream, StreamExt};
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::sync::{watch, Semaphore};

use crate::types::CheckOptions;

/// Checker over the HTTP reachability probe.
pub type SiteChecker = Checker<ReachabilityProbe>;

/// Checker over the WHOIS-style registration probe.
pub type DomainChecker = Checker<RegistrationProbe>;

/// Cancellation signal for a running batch.
///
/// Clonable and cheap; `cancel` is idempotent. On cancellation, in-flight
/// attempts are abandoned as soon as possible, already-resolved slots keep
/// their result, and every still-pending slot resolves with
/// [`FailureCause::Cancelled`].
#[derive(Debug, Clone)]
pub struct CancelToken {
    sender: Arc<watch::Sender<bool>>,
    receiver: watch::Receiver<bool>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (sender, receiver) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
            receiver,
        }
    }

    /// Signal cancellation to every clone of this token.
    pub fn cancel(&self) {
        let _ = self.sender.send(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolve once the token is cancelled; never resolves otherwise.
    pub(crate) async fn cancelled(&self) {
        let mut receiver = self.receiver.clone();
        loop {
            if *receiver.borrow_and_update() {
                return;
            }
            if receiver.changed().await.is_err() {
                // Sender gone means cancellation can no longer happen.
                std::future::pending::<()>().await;
            }
        }
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Bounded-concurrency batch checker over any [`Probe`].
///
/// # Example
///
/// ```rust,no_run
/// use namescout_lib::{CheckOptions, SiteChecker};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let checker = SiteChecker::reachability(CheckOptions::default())?;
///     let sites = checker
///         .check_all(&["example.com".into(), "example.net".into()])
///         .await?;
///     for site in &sites {
///         println!("{}: {}", site.candidate.label(), site.status);
///     }
///     Ok(())
/// }
/// ```
pub struct Checker<P: Probe> {
    probe: P,
    options: CheckOptions,
}

impl SiteChecker {
    /// Reachability checker with the given options.
    pub fn reachability(options: CheckOptions) -> Result<Self, ScoutError> {
        Ok(Self::with_options(ReachabilityProbe::new()?, options))
    }
}

impl DomainChecker {
    /// Registration checker with the given options.
    pub fn registration(options: CheckOptions) -> Self {
        Self::with_options(RegistrationProbe::new(), options)
    }
}

impl<P: Probe> Checker<P> {
    /// Build a checker over an arbitrary probe.
    pub fn with_options(probe: P, options: CheckOptions) -> Self {
        Self { probe, options }
    }

    pub fn options(&self) -> &CheckOptions {
        &self.options
    }

    /// Check every input, returning one record per input in input order.
    ///
    /// Returns only once every candidate is terminal. A single candidate's
    /// failure never aborts the batch; the only hard error is an empty
    /// input list, reported before any probing starts.
    pub async fn check_all(&self, inputs: &[String]) -> Result<Vec<P::Report>, ScoutError> {
        self.check_all_with_cancel(inputs, &CancelToken::new())
            .await
    }

    /// [`Checker::check_all`] with an external cancellation signal.
    pub async fn check_all_with_cancel(
        &self,
        inputs: &[String],
        cancel: &CancelToken,
    ) -> Result<Vec<P::Report>, ScoutError> {
        if inputs.is_empty() {
            return Err(ScoutError::invalid_batch("no candidates supplied"));
        }

        // Every slot exists, pending, in input order, before any work runs.
        // Unparseable inputs resolve immediately without a network call.
        let mut slots: Vec<P::Report> = Vec::with_capacity(inputs.len());
        let mut work: Vec<(usize, Candidate)> = Vec::new();
        for (index, raw) in inputs.iter().enumerate() {
            match Candidate::parse(raw) {
                Ok(candidate) => {
                    slots.push(P::pending(candidate.clone()));
                    work.push((index, candidate));
                }
                Err(error) => {
                    tracing::debug!(input = raw.as_str(), %error, "candidate rejected");
                    let mut report = P::pending(Candidate::rejected(raw));
                    P::resolve(&mut report, Outcome::failed(FailureCause::InvalidCandidate));
                    slots.push(report);
                }
            }
        }

        tracing::debug!(
            total = inputs.len(),
            probing = work.len(),
            concurrency = self.options.concurrency,
            "starting batch"
        );

        let slots = Arc::new(Mutex::new(slots));
        let pool = Arc::new(Semaphore::new(self.options.concurrency));

        let workers = work.into_iter().map(|(index, candidate)| {
            let slots = Arc::clone(&slots);
            let pool = Arc::clone(&pool);
            let cancel = cancel.clone();
            async move {
                let outcome = self.run_candidate(&candidate, &pool, &cancel).await;
                // One finalizing write per slot; each worker touches only
                // the index it owns.
                let mut guard = slots.lock().expect("result slots poisoned");
                P::resolve(&mut guard[index], outcome);
            }
        });
        futures::future::join_all(workers).await;

        let slots = match Arc::try_unwrap(slots) {
            Ok(owned) => owned.into_inner().expect("result slots poisoned"),
            // All workers are done, but be defensive about stray clones.
            Err(shared) => shared.lock().expect("result slots poisoned").clone(),
        };
        Ok(slots)
    }

    /// Check a single input: a batch of size one.
    pub async fn check_one(&self, input: &str) -> Result<P::Report, ScoutError> {
        let mut batch = self.check_all(&[input.to_string()]).await?;
        Ok(batch.pop().expect("batch of one yields one report"))
    }

    /// Check every input, yielding records in completion order as they
    /// finish. Invalid inputs yield immediately; an empty input list yields
    /// an empty stream. Use [`Checker::check_all`] when input-order results
    /// are needed.
    pub fn check_stream<'a>(
        &'a self,
        inputs: &'a [String],
    ) -> Pin<Box<dyn Stream<Item = P::Report> + Send + 'a>> {
        let pool = Arc::new(Semaphore::new(self.options.concurrency));
        let cancel = CancelToken::new();

        let attempts = inputs.iter().map(move |raw| {
            let pool = Arc::clone(&pool);
            let cancel = cancel.clone();
            async move {
                match Candidate::parse(raw) {
                    Ok(candidate) => {
                        let mut report = P::pending(candidate.clone());
                        let outcome = self.run_candidate(&candidate, &pool, &cancel).await;
                        P::resolve(&mut report, outcome);
                        report
                    }
                    Err(_) => {
                        let mut report = P::pending(Candidate::rejected(raw));
                        P::resolve(&mut report, Outcome::failed(FailureCause::InvalidCandidate));
                        report
                    }
                }
            }
        });

        Box::pin(futures::stream::iter(attempts).buffer_unordered(self.options.concurrency.max(1)))
    }

    /// Drive one candidate to a terminal outcome: acquire a pool slot, run
    /// an attempt under the deadline, retry transient failures with
    /// exponential backoff. The pool slot is held only while an attempt is
    /// actually in flight, never across a backoff sleep.
    async fn run_candidate(
        &self,
        candidate: &Candidate,
        pool: &Semaphore,
        cancel: &CancelToken,
    ) -> Outcome<P::Detail> {
        let mut attempt: u32 = 0;
        loop {
            let permit = tokio::select! {
                permit = pool.acquire() => permit.expect("probe pool closed"),
                _ = cancel.cancelled() => return Outcome::failed(FailureCause::Cancelled),
            };

            let started = Instant::now();
            let outcome = tokio::select! {
                attempt_result = tokio::time::timeout(
                    self.options.timeout,
                    self.probe.probe(candidate, self.options.timeout),
                ) => match attempt_result {
                    Ok(outcome) => outcome,
                    // Deadline hit: the attempt future is dropped here,
                    // releasing whatever it held, and nothing waits for the
                    // slow operation's true completion.
                    Err(_) => Outcome::Failure {
                        cause: FailureCause::Timeout,
                        elapsed: started.elapsed(),
                    },
                },
                _ = cancel.cancelled() => {
                    drop(permit);
                    return Outcome::failed(FailureCause::Cancelled);
                }
            };
            drop(permit);

            let retryable = matches!(
                outcome.cause(),
                Some(cause) if cause.is_retryable()
            );
            if retryable && attempt < self.options.max_retries {
                let delay = self.options.backoff_for(attempt);
                tracing::debug!(
                    host = %candidate.host,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "retrying after backoff"
                );
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = cancel.cancelled() => return Outcome::failed(FailureCause::Cancelled),
                }
                attempt += 1;
                continue;
            }

            return outcome;
        }
    }
}
