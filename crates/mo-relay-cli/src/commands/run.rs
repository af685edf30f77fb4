//! Propagate reference changes into every language catalog.

use crate::bridge;
use crate::core::{CliError, RelayContext, TargetOutcome};
use crate::relay::Relay;
use crate::translate::BaiduTranslator;
use crate::utils::ui;
use anyhow::bail;
use clap::Parser;
use mo_relay_toml::RelayConfig;
use std::path::{Path, PathBuf};

/// Arguments for a relay run.
#[derive(Debug, Parser)]
pub struct RunArgs {
    /// Directory holding the reference catalog (defaults to the current directory).
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Configuration file to use instead of `relay.toml` in that directory.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Dry run - show what every catalog would become without writing anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Deterministic output without colors or progress bars.
    #[arg(long, hide = true)]
    pub e2e: bool,
}

fn resolve_base_dir(path: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    let path = path.unwrap_or_else(|| PathBuf::from("."));
    if !path.is_dir() {
        bail!("{} is not a directory", path.display());
    }
    Ok(path)
}

fn load_config(base_dir: &Path, config: Option<&Path>) -> Result<RelayConfig, CliError> {
    let config = match config {
        Some(path) => RelayConfig::read_from_path(path)?,
        None => RelayConfig::from_base_dir(base_dir)?,
    };
    Ok(config.with_env_overrides())
}

fn print_outcome(outcome: &TargetOutcome, dry_run: bool) {
    match (&outcome.diff, &outcome.output) {
        (Some(diff), _) if dry_run => {
            ui::print_would_update(&outcome.code, outcome.updated);
            diff.print();
        },
        (_, Some(output)) => ui::print_updated(&outcome.code, outcome.updated, output),
        _ => {},
    }
}

/// Run the relay.
pub fn run(args: RunArgs) -> Result<(), CliError> {
    if args.e2e {
        ui::set_e2e_mode(true);
    }

    let base_dir = resolve_base_dir(args.path)?;
    let config = load_config(&base_dir, args.config.as_deref())?;
    tracing::debug!(
        reference = %config.reference_language,
        bridge = ?config.bridge,
        "loaded configuration"
    );

    let ctx = RelayContext::new(&base_dir, &config).with_dry_run(args.dry_run);
    let bridge = bridge::from_config(&config, &base_dir);
    let translator = BaiduTranslator::new(&config.translator)?;
    let relay = Relay::new(&ctx, bridge.as_ref(), &translator);

    ui::print_header();

    let plan = relay.prepare()?;

    for issue in &plan.issues {
        ui::print_issue(issue);
    }

    let Some(changes) = &plan.changes else {
        ui::print_fan_out_skipped();
        ui::print_summary(0, plan.issues.len(), args.dry_run);
        return Ok(());
    };

    ui::print_reference(&plan.reference_path, plan.snapshot_found, changes.len());
    for (key, change) in changes.changes() {
        ui::print_change(key, change.previous.as_deref(), &change.value);
    }
    for code in &plan.bootstrapped {
        ui::print_bootstrapped(code);
    }

    let mut completed = 0;
    let mut issues = plan.issues.len();

    let pb = ui::create_progress_bar(plan.targets.len() as u64, "Relaying catalogs...");

    for target in &plan.targets {
        pb.set_message(format!("Processing {}", target.code));

        let result = relay.process_target(target, changes);
        pb.suspend(|| match &result {
            Ok(outcome) => print_outcome(outcome, args.dry_run),
            Err(issue) => ui::print_issue(issue),
        });

        match result {
            Ok(_) => completed += 1,
            Err(_) => issues += 1,
        }
        pb.inc(1);
    }

    pb.finish_and_clear();

    ui::print_summary(completed, issues, args.dry_run);
    Ok(())
}
