//! Terminal presentation for namescout results.
//!
//! Colored, column-aligned result lines plus summary blocks. Uses only the
//! `console` crate; everything here is formatting over finished records,
//! no checking logic.

use console::{pad_str, style, Alignment};
use namescout_lib::{Domain, DomainSummary, Site, SiteSummary};
use std::time::Duration;

const LABEL_WIDTH: usize = 32;

/// Styled header printed before a run's result lines.
pub fn print_header(target_count: usize, concurrency: usize, mode: &str) {
    println!(
        "{} {} {}",
        style("namescout").bold(),
        style(format!("v{}", env!("CARGO_PKG_VERSION"))).dim(),
        style(format!(
            "— checking {} target{}",
            target_count,
            if target_count == 1 { "" } else { "s" }
        ))
        .dim(),
    );
    println!(
        "{}",
        style(format!("mode: {} | concurrency: {}", mode, concurrency)).dim()
    );
    println!();
}

fn counter_prefix(counter: Option<(usize, usize)>) -> String {
    match counter {
        Some((current, total)) => format!("{} ", style(format!("[{}/{}]", current, total)).dim()),
        None => String::new(),
    }
}

/// One reachability result line.
pub fn print_site(site: &Site, counter: Option<(usize, usize)>) {
    let label = pad_str(site.candidate.label(), LABEL_WIDTH, Alignment::Left, Some(".."));
    let prefix = counter_prefix(counter);

    if site.is_online() {
        let detail = match (site.status_code, site.response_time) {
            (Some(code), Some(elapsed)) => format!("{} in {}ms", code, elapsed.as_millis()),
            (Some(code), None) => code.to_string(),
            _ => String::new(),
        };
        println!(
            "  {}{}  {}  {}",
            prefix,
            style(&label).white(),
            style("ONLINE").green().bold(),
            style(detail).dim(),
        );
    } else {
        let cause = site
            .error
            .map(|c| c.to_string())
            .unwrap_or_else(|| "unresolved".to_string());
        println!(
            "  {}{}  {}  {}",
            prefix,
            style(&label).white(),
            style("OFFLINE").red().bold(),
            style(cause).dim(),
        );
    }
}

/// One registration result line.
pub fn print_domain(domain: &Domain, counter: Option<(usize, usize)>) {
    let label = pad_str(
        domain.candidate.label(),
        LABEL_WIDTH,
        Alignment::Left,
        Some(".."),
    );
    let prefix = counter_prefix(counter);

    match domain.available {
        Some(true) => {
            println!(
                "  {}{}  {}",
                prefix,
                style(&label).white(),
                style("AVAILABLE").green().bold(),
            );
        }
        Some(false) => {
            let mut detail = String::new();
            if let Some(registrar) = &domain.registrar {
                detail.push_str(registrar);
            }
            if let Some(expiry) = &domain.expiration_date {
                if !detail.is_empty() {
                    detail.push_str(", ");
                }
                detail.push_str("expires ");
                detail.push_str(expiry);
            }
            println!(
                "  {}{}  {}  {}",
                prefix,
                style(&label).white(),
                style("TAKEN").red().bold(),
                style(detail).dim(),
            );
        }
        None => {
            let cause = domain
                .error
                .map(|c| c.to_string())
                .unwrap_or_else(|| "ambiguous response".to_string());
            println!(
                "  {}{}  {}  {}",
                prefix,
                style(&label).white(),
                style("UNKNOWN").yellow().bold(),
                style(cause).dim(),
            );
        }
    }
}

/// Summary block for a reachability run.
pub fn print_site_summary(summary: &SiteSummary, elapsed: Duration) {
    println!();
    println!(
        "{} {} checked in {:.1}s — {} online, {} offline",
        style("summary:").bold(),
        summary.total,
        elapsed.as_secs_f64(),
        style(summary.online).green(),
        style(summary.offline).red(),
    );
    for (cause, count) in &summary.by_cause {
        println!("  {}", style(format!("{} × {}", count, cause)).dim());
    }
}

/// Summary block for a registration run.
pub fn print_domain_summary(summary: &DomainSummary, elapsed: Duration) {
    println!();
    println!(
        "{} {} checked in {:.1}s — {} available, {} taken, {} unknown",
        style("summary:").bold(),
        summary.total,
        elapsed.as_secs_f64(),
        style(summary.available).green(),
        style(summary.taken).red(),
        style(summary.unknown).yellow(),
    );
    for (cause, count) in &summary.by_cause {
        println!("  {}", style(format!("{} × {}", count, cause)).dim());
    }
}

/// Active extension list, one styled line.
pub fn print_extensions(extensions: &[String]) {
    println!(
        "{} {}",
        style("active extensions:").bold(),
        extensions.join(", ")
    );
}
