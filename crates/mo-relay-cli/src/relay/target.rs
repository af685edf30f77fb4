use crate::bridge::FormatBridge;
use crate::core::{RelayContext, RelayIssue, Stage, TargetFile};
use fs_err as fs;
use mo_relay_catalog::{Catalog, serialize};
use mo_relay_toml::language_code_from_path;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension().is_some_and(|e| e == ext)
}

/// Editable file name for a catalog file, e.g. `ja.mo` gives `ja.po`.
fn po_file_name(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    Some(format!("{stem}.po"))
}

/// Find every language catalog in the snapshot directory.
///
/// Each `.mo` file is decompiled into `work_dir`; a failure is recorded and
/// that language is left out. A `.po` file without a compiled sibling (for
/// instance a placeholder from an earlier run) is used as it is. Targets are
/// returned in file name order.
pub fn discover(
    ctx: &RelayContext,
    bridge: &dyn FormatBridge,
    work_dir: &Path,
    issues: &mut Vec<RelayIssue>,
) -> Vec<TargetFile> {
    if !ctx.snapshot_dir.is_dir() {
        tracing::debug!("{} does not exist yet", ctx.snapshot_dir.display());
        return Vec::new();
    }

    let files: Vec<PathBuf> = WalkDir::new(&ctx.snapshot_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .collect();

    let mut targets = Vec::new();

    for mo in files.iter().filter(|path| has_extension(path, "mo")) {
        let (Some(code), Some(file_name)) = (language_code_from_path(mo), po_file_name(mo)) else {
            tracing::debug!("ignoring {}", mo.display());
            continue;
        };
        let po = work_dir.join(&file_name);

        match bridge.decompile(mo, &po) {
            Ok(()) => targets.push(TargetFile::from_file(code, file_name, po)),
            Err(e) => issues.push(RelayIssue::new(mo, Stage::Decompile, e)),
        }
    }

    for po in files.iter().filter(|path| has_extension(path, "po")) {
        if po.with_extension("mo").exists() {
            continue;
        }
        let (Some(code), Some(file_name)) = (language_code_from_path(po), po_file_name(po)) else {
            continue;
        };
        targets.push(TargetFile::from_file(code, file_name, po.clone()));
    }

    targets.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    targets
}

/// Create a placeholder for every configured language that has no catalog.
///
/// The placeholder maps every reference key to itself. Outside dry runs it
/// is written to the snapshot directory straight away, so it survives even
/// if translating into it fails. Returns the bootstrapped language codes.
pub fn bootstrap_missing(
    ctx: &RelayContext,
    reference: &Catalog,
    targets: &mut Vec<TargetFile>,
    issues: &mut Vec<RelayIssue>,
) -> Vec<String> {
    let mut bootstrapped = Vec::new();

    for language in &ctx.generate_missing {
        let code = language.code();
        if *language == ctx.reference
            || targets.iter().any(|target| target.code == code)
            || ctx.snapshot_po(code).exists()
            || ctx.snapshot_mo(code).exists()
        {
            continue;
        }

        let placeholder = reference.identity();

        if ctx.dry_run {
            targets.push(TargetFile::placeholder(code, placeholder));
        } else {
            let path = ctx.snapshot_po(code);
            if let Err(e) = fs::write(&path, serialize(&placeholder)) {
                issues.push(RelayIssue::new(&path, Stage::Bootstrap, e));
                continue;
            }
            targets.push(TargetFile::from_file(code, format!("{code}.po"), path));
        }

        tracing::info!(language = code, "bootstrapped placeholder catalog");
        bootstrapped.push(code.to_string());
    }

    bootstrapped
}
