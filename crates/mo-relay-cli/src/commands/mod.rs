//! CLI command implementations.

mod dry_run;
mod run;

pub use dry_run::DryRunDiff;
pub use run::{RunArgs, run};
