//! Namescout CLI.
//!
//! Thin front-end over `namescout-lib`: parses arguments, resolves the
//! active extension list, expands targets, runs the checker, and prints
//! results. All checking logic lives in the library.

mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Parser, ValueEnum};
use futures::StreamExt;
use namescout_lib::{
    expand_inputs, generate_names, sort_by_response_time, CheckOptions, DomainChecker,
    DomainSummary, ExtensionStore, GenerateOptions, ScoutError, SiteChecker, SiteSummary,
};
use std::io::BufRead;
use std::process;
use std::time::{Duration, Instant};

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// Which probe a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// HTTP reachability (is the site answering?)
    Http,
    /// WHOIS-style registration lookup (is the name available?)
    Whois,
}

/// CLI arguments for namescout
#[derive(Parser, Debug)]
#[command(name = "namescout")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Check which domain-name variants are reachable or available")]
#[command(
    long_about = "Check domain-name variants for HTTP reachability or WHOIS-style registration availability.\n\nBase names are crossed with the active extension list; results come back in input order with every failure classified."
)]
#[command(styles = STYLES)]
pub struct Args {
    /// Names or URLs to check (base names are crossed with extensions)
    #[arg(value_name = "TARGETS", help_heading = "Target Selection")]
    pub targets: Vec<String>,

    /// Extensions to cross base names with (comma-separated or repeated)
    #[arg(short = 'e', long = "ext", value_name = "EXT", value_delimiter = ',', action = clap::ArgAction::Append, help_heading = "Target Selection")]
    pub extensions: Option<Vec<String>>,

    /// Input file with targets (one per line, '#' comments)
    #[arg(
        short = 'f',
        long = "file",
        value_name = "FILE",
        help_heading = "Target Selection"
    )]
    pub file: Option<String>,

    /// Probe kind to run
    #[arg(
        short = 'm',
        long = "mode",
        value_enum,
        default_value = "http",
        help_heading = "Checking"
    )]
    pub mode: Mode,

    /// Max concurrent probes (1-100)
    #[arg(
        short = 'c',
        long = "concurrency",
        default_value = "10",
        help_heading = "Checking"
    )]
    pub concurrency: usize,

    /// Per-attempt timeout in seconds
    #[arg(
        long = "timeout",
        value_name = "SECS",
        default_value = "5",
        help_heading = "Checking"
    )]
    pub timeout: u64,

    /// Retries after a transient failure
    #[arg(long = "retries", default_value = "0", help_heading = "Checking")]
    pub retries: u32,

    /// Base backoff before a retry in milliseconds, doubled per attempt
    #[arg(
        long = "retry-backoff",
        value_name = "MS",
        default_value = "250",
        help_heading = "Checking"
    )]
    pub retry_backoff: u64,

    /// Pattern for name generation (\w=letter, \d=digit, ?=either)
    #[arg(
        long = "pattern",
        value_name = "PATTERN",
        value_delimiter = ',',
        help_heading = "Name Generation"
    )]
    pub patterns: Option<Vec<String>>,

    /// Prefixes to prepend to base names (comma-separated)
    #[arg(
        long = "prefix",
        value_name = "PREFIX",
        value_delimiter = ',',
        help_heading = "Name Generation"
    )]
    pub prefixes: Option<Vec<String>>,

    /// Suffixes to append to base names (comma-separated)
    #[arg(
        long = "suffix",
        value_name = "SUFFIX",
        value_delimiter = ',',
        help_heading = "Name Generation"
    )]
    pub suffixes: Option<Vec<String>>,

    /// Preview expanded targets without checking anything
    #[arg(long = "dry-run", help_heading = "Name Generation")]
    pub dry_run: bool,

    /// Output results in JSON format
    #[arg(short = 'j', long = "json", help_heading = "Output")]
    pub json: bool,

    /// Show results as they complete instead of in input order
    #[arg(long = "streaming", help_heading = "Output")]
    pub streaming: bool,

    /// Sort collected results by response time, fastest first
    #[arg(long = "sort-time", help_heading = "Output")]
    pub sort_time: bool,

    /// Add an extension to the persisted active list and exit
    #[arg(long = "add-ext", value_name = "EXT", help_heading = "Extension Store")]
    pub add_ext: Option<String>,

    /// Remove an extension from the persisted active list and exit
    #[arg(
        long = "remove-ext",
        value_name = "EXT",
        help_heading = "Extension Store"
    )]
    pub remove_ext: Option<String>,

    /// List the active extensions and exit
    #[arg(long = "list-ext", help_heading = "Extension Store")]
    pub list_ext: bool,

    /// Reset the extension store to its defaults and exit
    #[arg(long = "reset-ext", help_heading = "Extension Store")]
    pub reset_ext: bool,

    /// Use a specific config file instead of the default location
    #[arg(
        long = "config",
        value_name = "FILE",
        help_heading = "Extension Store"
    )]
    pub config: Option<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if let Err(error) = run(args).await {
        eprintln!("{} {}", console::style("error:").red().bold(), error);
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), ScoutError> {
    if handle_store_command(&args)? {
        return Ok(());
    }

    let targets = collect_targets(&args)?;
    // The checker never reads the store itself; extensions are resolved
    // here and passed down as plain strings.
    let extensions = match &args.extensions {
        Some(list) => list.clone(),
        None => open_store(&args)?.active_extensions(),
    };
    let expanded = expand_inputs(&targets, &extensions);

    if expanded.is_empty() {
        return Err(ScoutError::invalid_batch(
            "no targets to check; pass names, --file, or --pattern",
        ));
    }

    if args.dry_run {
        for target in &expanded {
            println!("{}", target);
        }
        eprintln!(
            "{}",
            console::style(format!("{} targets (dry run, nothing checked)", expanded.len()))
                .dim()
        );
        return Ok(());
    }

    let options = CheckOptions::default()
        .with_concurrency(args.concurrency)
        .with_timeout(Duration::from_secs(args.timeout))
        .with_max_retries(args.retries)
        .with_retry_backoff(Duration::from_millis(args.retry_backoff));

    match args.mode {
        Mode::Http => run_reachability(&args, &expanded, options).await,
        Mode::Whois => run_registration(&args, &expanded, options).await,
    }
}

fn open_store(args: &Args) -> Result<ExtensionStore, ScoutError> {
    match &args.config {
        Some(path) => ExtensionStore::open(path),
        None => ExtensionStore::open_default(),
    }
}

/// Handle the store subcommand flags. Returns true when one ran and the
/// process should exit without checking anything.
fn handle_store_command(args: &Args) -> Result<bool, ScoutError> {
    if args.add_ext.is_none() && args.remove_ext.is_none() && !args.reset_ext && !args.list_ext {
        return Ok(false);
    }
    let mut store = open_store(args)?;

    if let Some(extension) = &args.add_ext {
        let added = store.add_extension(extension)?;
        ui::print_extensions(&store.active_extensions());
        if !added {
            eprintln!("{}", console::style("already present").dim());
        }
        return Ok(true);
    }
    if let Some(extension) = &args.remove_ext {
        let removed = store.remove_extension(extension)?;
        ui::print_extensions(&store.active_extensions());
        if !removed {
            eprintln!("{}", console::style("was not present").dim());
        }
        return Ok(true);
    }
    if args.reset_ext {
        store.reset()?;
        ui::print_extensions(&store.active_extensions());
        return Ok(true);
    }
    if args.list_ext {
        ui::print_extensions(&store.active_extensions());
        return Ok(true);
    }
    Ok(false)
}

/// Positional targets, file lines, and generated names, in that order.
fn collect_targets(args: &Args) -> Result<Vec<String>, ScoutError> {
    let mut targets = args.targets.clone();

    if let Some(path) = &args.file {
        let file = std::fs::File::open(path)?;
        for line in std::io::BufReader::new(file).lines() {
            let line = line?;
            let trimmed = line.trim();
            if !trimmed.is_empty() && !trimmed.starts_with('#') {
                targets.push(trimmed.to_string());
            }
        }
    }

    let generating = args.patterns.is_some() || args.prefixes.is_some() || args.suffixes.is_some();
    if generating {
        // Generation consumes bare names as keywords; fully-qualified
        // targets stay as-is alongside the generated set.
        let (bare, qualified): (Vec<String>, Vec<String>) = targets
            .into_iter()
            .partition(|t| !t.contains('.') && !t.contains("://"));
        let generated = generate_names(&GenerateOptions {
            keywords: bare,
            patterns: args.patterns.clone().unwrap_or_default(),
            prefixes: args.prefixes.clone().unwrap_or_default(),
            suffixes: args.suffixes.clone().unwrap_or_default(),
            include_bare: false,
        })?;
        targets = generated;
        targets.extend(qualified);
    }

    Ok(targets)
}

async fn run_reachability(
    args: &Args,
    targets: &[String],
    options: CheckOptions,
) -> Result<(), ScoutError> {
    let checker = SiteChecker::reachability(options)?;
    let started = Instant::now();

    if args.streaming && !args.json {
        ui::print_header(targets.len(), checker.options().concurrency, "http");
        let total = targets.len();
        let mut completed = 0usize;
        let mut sites = Vec::with_capacity(total);
        let mut stream = checker.check_stream(targets);
        while let Some(site) = stream.next().await {
            completed += 1;
            ui::print_site(&site, Some((completed, total)));
            sites.push(site);
        }
        ui::print_site_summary(&SiteSummary::of(&sites), started.elapsed());
        return Ok(());
    }

    let sites = checker.check_all(targets).await?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&sites)
                .map_err(|e| ScoutError::config(format!("could not encode results: {}", e)))?
        );
        return Ok(());
    }

    ui::print_header(sites.len(), checker.options().concurrency, "http");
    if args.sort_time {
        for site in sort_by_response_time(&sites) {
            ui::print_site(site, None);
        }
    } else {
        for site in &sites {
            ui::print_site(site, None);
        }
    }
    ui::print_site_summary(&SiteSummary::of(&sites), started.elapsed());
    Ok(())
}

async fn run_registration(
    args: &Args,
    targets: &[String],
    options: CheckOptions,
) -> Result<(), ScoutError> {
    let checker = DomainChecker::registration(options);
    let started = Instant::now();

    if args.streaming && !args.json {
        ui::print_header(targets.len(), checker.options().concurrency, "whois");
        let total = targets.len();
        let mut completed = 0usize;
        let mut domains = Vec::with_capacity(total);
        let mut stream = checker.check_stream(targets);
        while let Some(domain) = stream.next().await {
            completed += 1;
            ui::print_domain(&domain, Some((completed, total)));
            domains.push(domain);
        }
        ui::print_domain_summary(&DomainSummary::of(&domains), started.elapsed());
        return Ok(());
    }

    let domains = checker.check_all(targets).await?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&domains)
                .map_err(|e| ScoutError::config(format!("could not encode results: {}", e)))?
        );
        return Ok(());
    }

    ui::print_header(domains.len(), checker.options().concurrency, "whois");
    for domain in &domains {
        ui::print_domain(domain, None);
    }
    ui::print_domain_summary(&DomainSummary::of(&domains), started.elapsed());
    Ok(())
}
