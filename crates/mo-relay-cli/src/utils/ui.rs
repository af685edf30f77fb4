// CLI output formatting with consistent styling using indicatif and colored.
// Textual output goes through println!/eprintln!; tracing is reserved for
// diagnostics enabled with MO_RELAY_LOG.

use crate::core::RelayIssue;
use colored::Colorize as _;
use indicatif::{ProgressBar, ProgressStyle};
use miette::{GraphicalReportHandler, GraphicalTheme};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const PD_TICK: Duration = Duration::from_millis(100);

/// Environment variable holding the log filter, e.g. `MO_RELAY_LOG=debug`.
pub const LOG_ENV: &str = "MO_RELAY_LOG";

static E2E_MODE: AtomicBool = AtomicBool::new(false);

/// Enable E2E mode for deterministic output (no colors, hidden progress bars).
pub fn set_e2e_mode(enabled: bool) {
    E2E_MODE.store(enabled, Ordering::SeqCst);
    if enabled {
        colored::control::set_override(false);
    }
}

pub fn is_e2e() -> bool {
    E2E_MODE.load(Ordering::SeqCst)
}

/// Install the stderr log subscriber, filtered by `MO_RELAY_LOG` (default `warn`).
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub fn create_progress_bar(len: u64, msg: &str) -> ProgressBar {
    if is_e2e() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len);
    if let Ok(style) =
        ProgressStyle::default_bar().template("{spinner:.green} {msg} [{bar:40.cyan/blue}] {pos}/{len}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(PD_TICK);
    pb
}

pub fn print_header() {
    println!("{}", "mo-relay".dimmed());
}

pub fn print_reference(path: &Path, snapshot_found: bool, changed: usize) {
    println!(
        "{} {}",
        "Reference".dimmed(),
        path.display().to_string().green()
    );
    if !snapshot_found {
        println!("{}", "No snapshot of the reference, every entry counts as new".yellow());
    }
    if changed == 0 {
        println!("{}", "No new or changed entries".dimmed());
    } else {
        println!("{} {} entry(ies)", "Changed".dimmed(), changed.to_string().cyan());
    }
}

pub fn print_change(key: &str, previous: Option<&str>, value: &str) {
    match previous {
        Some(previous) => println!(
            "  {} {:?}: {:?} {} {:?}",
            "~".yellow(),
            key,
            previous,
            "->".dimmed(),
            value
        ),
        None => println!("  {} {:?}: {:?}", "+".green(), key, value),
    }
}

pub fn print_bootstrapped(code: &str) {
    println!(
        "{} {}",
        "Bootstrapped placeholder for".dimmed(),
        code.cyan()
    );
}

pub fn print_updated(code: &str, updated: usize, output: &Path) {
    println!(
        "{} {} ({} entry(ies)) -> {}",
        "Compiled".green(),
        code.cyan(),
        updated,
        output.display()
    );
}

pub fn print_would_update(code: &str, updated: usize) {
    println!(
        "{} {} ({} entry(ies))",
        "Would update".yellow(),
        code.cyan(),
        updated
    );
}

pub fn print_issue(issue: &RelayIssue) {
    let handler = if is_e2e() {
        GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor())
            .with_links(false)
            .with_width(200)
    } else {
        GraphicalReportHandler::new()
    };

    let mut out = String::new();
    if handler.render_report(&mut out, issue).is_err() {
        out = format!("{issue}\n");
    }
    eprint!("{out}");
}

pub fn print_fan_out_skipped() {
    eprintln!(
        "{}",
        "Nothing propagated: the reference or its snapshot could not be read".yellow()
    );
}

pub fn print_summary(completed: usize, issues: usize, dry_run: bool) {
    let label = if dry_run { "Dry run:".yellow() } else { "Done:".green() };
    if issues == 0 {
        println!("{} {} catalog(s) processed", label, completed);
    } else {
        println!(
            "{} {} catalog(s) processed, {}",
            label,
            completed,
            format!("{issues} skipped").red()
        );
    }
}

pub fn print_diff(old: &str, new: &str) {
    use similar::{ChangeTag, TextDiff};

    let diff = TextDiff::from_lines(old, new);

    for (idx, group) in diff.grouped_ops(3).iter().enumerate() {
        if idx > 0 {
            println!("{}", "  ...".dimmed());
        }
        for op in group {
            for change in diff.iter_changes(op) {
                let sign = match change.tag() {
                    ChangeTag::Delete => "-",
                    ChangeTag::Insert => "+",
                    ChangeTag::Equal => " ",
                };
                let line = format!("{} {}", sign, change);
                match change.tag() {
                    ChangeTag::Delete => print!("{}", line.red()),
                    ChangeTag::Insert => print!("{}", line.green()),
                    ChangeTag::Equal => print!("{}", line.dimmed()),
                }
            }
        }
    }
}
