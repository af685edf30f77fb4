use super::RelayIssue;
use crate::commands::DryRunDiff;
use mo_relay_catalog::Catalog;
use mo_relay_toml::{Language, RelayConfig};
use std::path::{Path, PathBuf};

/// Everything a run needs to know about where catalogs live.
///
/// Built once from the base directory and the configuration, then passed
/// down explicitly. Nothing below the command layer looks at the process
/// working directory.
#[derive(Clone, Debug)]
pub struct RelayContext {
    /// Directory holding the reference catalog.
    pub base_dir: PathBuf,
    /// Language the reference catalog is written in.
    pub reference: Language,
    /// Directory holding the per-language catalogs (e.g. `tl/`).
    pub snapshot_dir: PathBuf,
    /// Directory receiving compiled results (e.g. `tl_output/`).
    pub output_dir: PathBuf,
    /// Languages bootstrapped with a placeholder when absent.
    pub generate_missing: Vec<Language>,
    /// When set, no file below `base_dir` is created or modified.
    pub dry_run: bool,
}

impl RelayContext {
    pub fn new(base_dir: &Path, config: &RelayConfig) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
            reference: config.reference_language,
            snapshot_dir: config.snapshot_dir_from_base(base_dir),
            output_dir: config.output_dir_from_base(base_dir),
            generate_missing: config.generate_missing.clone(),
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// The hand-edited reference catalog, e.g. `zh-Hans.po`.
    pub fn reference_po(&self) -> PathBuf {
        self.base_dir.join(format!("{}.po", self.reference.code()))
    }

    /// Compiled form of the reference, e.g. `zh-Hans.mo`, used to derive
    /// the editable one when it is missing.
    pub fn reference_mo(&self) -> PathBuf {
        self.base_dir.join(format!("{}.mo", self.reference.code()))
    }

    pub fn snapshot_po(&self, code: &str) -> PathBuf {
        self.snapshot_dir.join(format!("{code}.po"))
    }

    pub fn snapshot_mo(&self, code: &str) -> PathBuf {
        self.snapshot_dir.join(format!("{code}.mo"))
    }

    pub fn output_mo(&self, code: &str) -> PathBuf {
        self.output_dir.join(format!("{code}.mo"))
    }
}

/// Where a target's current content comes from.
#[derive(Clone, Debug)]
pub enum TargetSource {
    /// An editable catalog on disk (decompiled, pre-existing or bootstrapped).
    File(PathBuf),
    /// A placeholder that was not written because of a dry run.
    Placeholder(Catalog),
}

/// One language catalog that changes are propagated into.
#[derive(Clone, Debug)]
pub struct TargetFile {
    /// Language code taken from the file name.
    pub code: String,
    /// File name of the editable catalog inside the snapshot directory.
    pub file_name: String,
    pub source: TargetSource,
}

impl TargetFile {
    pub fn from_file(code: &str, file_name: String, path: PathBuf) -> Self {
        Self {
            code: code.to_string(),
            file_name,
            source: TargetSource::File(path),
        }
    }

    pub fn placeholder(code: &str, catalog: Catalog) -> Self {
        Self {
            code: code.to_string(),
            file_name: format!("{code}.po"),
            source: TargetSource::Placeholder(catalog),
        }
    }

    /// Path used when reporting on this target.
    pub fn display_path(&self, snapshot_dir: &Path) -> PathBuf {
        match &self.source {
            TargetSource::File(path) => path.clone(),
            TargetSource::Placeholder(_) => snapshot_dir.join(&self.file_name),
        }
    }
}

/// Result of propagating changes into one target.
#[derive(Debug)]
pub struct TargetOutcome {
    pub code: String,
    /// Number of entries written from the change set.
    pub updated: usize,
    /// Compiled catalog, unless this was a dry run.
    pub output: Option<PathBuf>,
    /// What the editable catalog would become, for dry runs.
    pub diff: Option<DryRunDiff>,
}

/// Totals over a whole run.
#[derive(Debug, Default)]
pub struct RelaySummary {
    /// Entries in the reference that were new or changed.
    pub changed_entries: usize,
    /// Targets that were processed to the end.
    pub completed: Vec<TargetOutcome>,
    /// Languages that were bootstrapped with a placeholder.
    pub bootstrapped: Vec<String>,
    pub issues: Vec<RelayIssue>,
    /// Set when the reference or its snapshot was unreadable, so nothing
    /// was propagated.
    pub fan_out_skipped: bool,
}
