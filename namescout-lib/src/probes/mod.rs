//! Probe implementations.
//!
//! A probe is a stateless strategy performing exactly one network operation
//! against one candidate. Retry policy, deadlines, and concurrency belong
//! to the checker; a probe's only job is one attempt, with every resource
//! it acquires released on every exit path.

pub mod reachability;
pub mod registration;

pub use reachability::{HttpDetail, ReachabilityProbe};
pub use registration::{RegistrationDetail, RegistrationProbe};

use crate::candidate::Candidate;
use crate::error::FailureCause;
use std::future::Future;
use std::time::Duration;

/// Raw result of a single probe attempt.
#[derive(Debug, Clone)]
pub enum Outcome<D> {
    /// The attempt completed and produced probe-specific detail
    Success {
        detail: D,
        /// Wall time the attempt took
        elapsed: Duration,
    },
    /// The attempt failed with a classified cause
    Failure {
        cause: FailureCause,
        /// Wall time until the failure was observed
        elapsed: Duration,
    },
}

impl<D> Outcome<D> {
    /// Failure outcome with no elapsed measurement, for cases where no
    /// attempt actually ran (input rejection, cancellation).
    pub(crate) fn failed(cause: FailureCause) -> Self {
        Outcome::Failure {
            cause,
            elapsed: Duration::ZERO,
        }
    }

    /// The failure cause, when this outcome is a failure.
    pub fn cause(&self) -> Option<FailureCause> {
        match self {
            Outcome::Success { .. } => None,
            Outcome::Failure { cause, .. } => Some(*cause),
        }
    }
}

/// A strategy performing one network check against one candidate.
///
/// The checker depends only on this capability set, never on a concrete
/// probe type. An implementation supplies three things: the attempt itself
/// ([`Probe::probe`]), the initial pending record for a candidate entering
/// a batch ([`Probe::pending`]), and the single finalizing write that folds
/// a terminal outcome into that record ([`Probe::resolve`]). Workers
/// compute outcomes locally and resolve a slot exactly once; records are
/// never mutated field-by-field while other workers can observe them.
pub trait Probe: Send + Sync {
    /// Success payload of one attempt.
    type Detail: Send;

    /// Finalized per-candidate record ([`crate::Site`] or [`crate::Domain`]).
    type Report: Send + Clone;

    /// Run one attempt against `candidate`, bounded by `timeout`.
    ///
    /// Must not retry internally, and must not leak the underlying
    /// connection past its own return: the network operation's lifetime is
    /// scoped to this call on every exit path.
    fn probe(
        &self,
        candidate: &Candidate,
        timeout: Duration,
    ) -> impl Future<Output = Outcome<Self::Detail>> + Send;

    /// Initial pending record for a candidate entering the engine.
    fn pending(candidate: Candidate) -> Self::Report;

    /// Fold a terminal outcome into the record. Called exactly once per
    /// candidate per batch, after which the record is immutable.
    fn resolve(report: &mut Self::Report, outcome: Outcome<Self::Detail>);
}
