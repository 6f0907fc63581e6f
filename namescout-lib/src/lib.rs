//! # Namescout Library
//!
//! Concurrent reachability and registration checking for domain-name
//! variants.
//!
//! The core of the library is the [`Checker`] engine: give it a list of
//! candidate URLs or domains and it probes each one (HTTP reachability or
//! WHOIS-style registration lookup) under a bounded concurrency pool,
//! per-attempt timeouts, and an exponential-backoff retry policy. Results
//! come back as one record per input, in input order, with every failure
//! classified rather than thrown.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use namescout_lib::{CheckOptions, SiteChecker};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let checker = SiteChecker::reachability(CheckOptions::default())?;
//!     let site = checker.check_one("example.com").await?;
//!
//!     println!("{}: {}", site.candidate.label(), site.status);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Bounded concurrency**: a 10,000-candidate batch with concurrency 10
//!   never has more than 10 probes in flight
//! - **Order preservation**: output order always equals input order
//! - **Classified failures**: timeouts, DNS, TLS, connection, and redirect
//!   problems are data on the record, never batch-aborting errors
//! - **Cancellation**: a batch can be cancelled mid-flight without leaving
//!   any record pending

pub use aggregate::{sort_by_response_time, DomainSummary, SiteSummary};
pub use candidate::Candidate;
pub use checker::{CancelToken, Checker, DomainChecker, SiteChecker};
pub use config::{ExtensionStore, DEFAULT_EXTENSIONS};
pub use error::{FailureCause, ScoutError};
pub use generate::{
    apply_affixes, estimate_pattern_count, expand_pattern, generate_names, GenerateOptions,
};
pub use probes::{
    HttpDetail, Outcome, Probe, ReachabilityProbe, RegistrationDetail, RegistrationProbe,
};
pub use types::{CheckOptions, Domain, LookupStatus, Site, SiteStatus};
pub use utils::expand_inputs;

mod aggregate;
mod candidate;
mod checker;
mod config;
mod error;
mod generate;
mod probes;
mod types;
mod utils;

/// Type alias for convenience
pub type Result<T> = std::result::Result<T, ScoutError>;

// Library version for display purposes
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
