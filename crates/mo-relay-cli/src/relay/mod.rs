//! The propagation pipeline.
//!
//! [`Relay::prepare`] makes sure the reference catalog exists, decompiles
//! every language in the snapshot directory, computes the change set and
//! bootstraps missing languages. [`Relay::process_target`] then merges the
//! change set into one language and compiles it. Only a missing reference is
//! fatal; every other failure is a [`RelayIssue`] that skips one catalog.

mod merge;
mod target;

pub use merge::merge_changes;

use crate::bridge::FormatBridge;
use crate::commands::DryRunDiff;
use crate::core::{
    CliError, MalformedLiteralError, MissingTemplateError, RelayContext, RelayFailure, RelayIssue,
    RelaySummary, Stage, TargetFile, TargetOutcome, TargetSource,
};
use crate::translate::Translator;
use fs_err as fs;
use mo_relay_catalog::{Catalog, ChangeSet, parse, serialize};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Read and parse an editable catalog, keeping its text.
pub fn load_catalog(path: &Path) -> Result<(String, Catalog), RelayFailure> {
    let content = fs::read_to_string(path)?;
    match parse(&content) {
        Ok(catalog) => Ok((content, catalog)),
        Err(e) => Err(MalformedLiteralError::new(path, content, &e).into()),
    }
}

/// Everything known after the preparation phase.
#[derive(Debug)]
pub struct RelayPlan {
    /// The editable reference catalog that was diffed.
    pub reference_path: PathBuf,
    /// Whether a snapshot of the reference was found.
    pub snapshot_found: bool,
    /// `None` when the reference or its snapshot could not be parsed; no
    /// target is processed then.
    pub changes: Option<ChangeSet>,
    pub targets: Vec<TargetFile>,
    pub bootstrapped: Vec<String>,
    pub issues: Vec<RelayIssue>,
    /// Holds decompiled catalogs during dry runs.
    _scratch: Option<TempDir>,
}

pub struct Relay<'a> {
    ctx: &'a RelayContext,
    bridge: &'a dyn FormatBridge,
    translator: &'a dyn Translator,
}

impl<'a> Relay<'a> {
    pub fn new(
        ctx: &'a RelayContext,
        bridge: &'a dyn FormatBridge,
        translator: &'a dyn Translator,
    ) -> Self {
        Self {
            ctx,
            bridge,
            translator,
        }
    }

    /// Locate the reference catalog, deriving it from its compiled snapshot
    /// when only that exists. During a dry run a derived reference goes to
    /// `scratch`.
    fn ensure_reference(&self, scratch: Option<&Path>) -> Result<PathBuf, MissingTemplateError> {
        let po = self.ctx.reference_po();
        if po.is_file() {
            return Ok(po);
        }

        let mo = self.ctx.reference_mo();
        let missing = |causes| MissingTemplateError {
            po: po.clone(),
            mo: mo.clone(),
            causes,
        };

        if !mo.is_file() {
            return Err(missing(Vec::new()));
        }

        let derived = match (scratch, po.file_name()) {
            (Some(dir), Some(name)) => dir.join(name),
            _ => po.clone(),
        };

        tracing::info!("deriving {} from {}", derived.display(), mo.display());
        match self.bridge.decompile(&mo, &derived) {
            Ok(()) => Ok(derived),
            Err(e) => Err(missing(vec![e])),
        }
    }

    pub fn prepare(&self) -> Result<RelayPlan, CliError> {
        let scratch = if self.ctx.dry_run {
            Some(tempfile::Builder::new().prefix("mo-relay-").tempdir()?)
        } else {
            None
        };
        let scratch_dir = scratch.as_ref().map(|dir| dir.path());

        let reference_path = self.ensure_reference(scratch_dir)?;

        if !self.ctx.dry_run {
            fs::create_dir_all(&self.ctx.snapshot_dir)?;
            fs::create_dir_all(&self.ctx.output_dir)?;
        }

        let work_dir = scratch_dir.unwrap_or(&self.ctx.snapshot_dir).to_path_buf();
        let mut issues = Vec::new();
        let mut targets = target::discover(self.ctx, self.bridge, &work_dir, &mut issues);

        let mut plan = RelayPlan {
            reference_path,
            snapshot_found: false,
            changes: None,
            targets: Vec::new(),
            bootstrapped: Vec::new(),
            issues: Vec::new(),
            _scratch: scratch,
        };

        let reference = match load_catalog(&plan.reference_path) {
            Ok((_, catalog)) => catalog,
            Err(failure) => {
                issues.push(RelayIssue::new(&plan.reference_path, Stage::Parse, failure));
                plan.issues = issues;
                return Ok(plan);
            },
        };

        let reference_code = self.ctx.reference.code();
        let snapshot_name = format!("{reference_code}.po");
        let snapshot_path = targets
            .iter()
            .find(|target| target.file_name == snapshot_name)
            .and_then(|target| match &target.source {
                TargetSource::File(path) => Some(path.clone()),
                TargetSource::Placeholder(_) => None,
            });

        let snapshot = match &snapshot_path {
            Some(path) => match load_catalog(path) {
                Ok((_, catalog)) => catalog,
                Err(failure) => {
                    issues.push(RelayIssue::new(path, Stage::Parse, failure));
                    plan.issues = issues;
                    return Ok(plan);
                },
            },
            None if self.ctx.snapshot_mo(reference_code).exists()
                || self.ctx.snapshot_po(reference_code).exists() =>
            {
                // Present but unreadable; its decompile issue is already recorded.
                tracing::warn!("snapshot of {reference_code} could not be read, nothing propagated");
                plan.issues = issues;
                return Ok(plan);
            },
            None => {
                tracing::info!("no snapshot of {reference_code}, every entry counts as changed");
                Catalog::new()
            },
        };

        let changes = ChangeSet::between(&snapshot, &reference);
        tracing::info!(
            changed = changes.len(),
            reference = reference.message_count(),
            snapshot = snapshot.message_count(),
            "computed change set"
        );

        plan.bootstrapped = target::bootstrap_missing(self.ctx, &reference, &mut targets, &mut issues);
        plan.snapshot_found = snapshot_path.is_some();
        plan.changes = Some(changes);
        plan.targets = targets;
        plan.issues = issues;
        Ok(plan)
    }

    /// Merge `changes` into one target, then persist and compile it.
    ///
    /// Nothing is written for the target unless the merge succeeded. During
    /// a dry run nothing is written at all and the outcome carries a diff.
    pub fn process_target(
        &self,
        target: &TargetFile,
        changes: &ChangeSet,
    ) -> Result<TargetOutcome, RelayIssue> {
        let path = target.display_path(&self.ctx.snapshot_dir);

        let (before, mut catalog) = match &target.source {
            TargetSource::File(file) => {
                load_catalog(file).map_err(|f| RelayIssue::new(&path, Stage::Parse, f))?
            },
            TargetSource::Placeholder(placeholder) => (serialize(placeholder), placeholder.clone()),
        };

        let updated = merge_changes(
            &mut catalog,
            changes,
            self.ctx.reference,
            &target.code,
            self.translator,
        )
        .map_err(|f| RelayIssue::new(&path, Stage::Translate, f))?;

        let after = serialize(&catalog);

        if self.ctx.dry_run {
            return Ok(TargetOutcome {
                code: target.code.clone(),
                updated,
                output: None,
                diff: Some(DryRunDiff::new(before, after)),
            });
        }

        let po = self.ctx.snapshot_dir.join(&target.file_name);
        fs::write(&po, &after).map_err(|e| RelayIssue::new(&po, Stage::Write, e))?;

        let mo = self.ctx.output_mo(&target.code);
        self.bridge
            .compile(&po, &mo)
            .map_err(|e| RelayIssue::new(&po, Stage::Compile, e))?;

        tracing::debug!(language = %target.code, updated, "compiled {}", mo.display());
        Ok(TargetOutcome {
            code: target.code.clone(),
            updated,
            output: Some(mo),
            diff: None,
        })
    }

    /// Prepare and process every target without any progress reporting.
    pub fn run(&self) -> Result<RelaySummary, CliError> {
        let plan = self.prepare()?;
        let mut summary = RelaySummary {
            bootstrapped: plan.bootstrapped.clone(),
            issues: Vec::new(),
            ..Default::default()
        };

        let Some(changes) = &plan.changes else {
            summary.fan_out_skipped = true;
            summary.issues = plan.issues;
            return Ok(summary);
        };
        summary.changed_entries = changes.len();

        for target in &plan.targets {
            match self.process_target(target, changes) {
                Ok(outcome) => summary.completed.push(outcome),
                Err(issue) => summary.issues.push(issue),
            }
        }

        let mut issues = plan.issues;
        issues.append(&mut summary.issues);
        summary.issues = issues;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::NativeBridge;
    use crate::translate::testing::RecordingTranslator;
    use mo_relay_catalog::mo;
    use mo_relay_toml::{Language, RelayConfig};
    use tempfile::TempDir;

    fn catalog(entries: &[(&str, &str)]) -> Catalog {
        entries.iter().copied().collect()
    }

    fn write_po(path: &Path, entries: &[(&str, &str)]) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, serialize(&catalog(entries))).unwrap();
    }

    fn write_mo(path: &Path, entries: &[(&str, &str)]) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, mo::compile(&catalog(entries))).unwrap();
    }

    fn read_po(path: &Path) -> Catalog {
        parse(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    fn read_mo(path: &Path) -> Catalog {
        mo::decompile(&std::fs::read(path).unwrap()).unwrap()
    }

    fn context(temp: &TempDir, generate_missing: Vec<Language>) -> RelayContext {
        let config = RelayConfig {
            generate_missing,
            ..Default::default()
        };
        RelayContext::new(temp.path(), &config)
    }

    /// `quit` changed and `load` is new since the snapshot.
    fn standard_layout(temp: &TempDir) {
        let base = temp.path();
        write_po(
            &base.join("zh-Hans.po"),
            &[("", "header"), ("start", "开始"), ("quit", "退出游戏"), ("load", "读取")],
        );
        write_mo(
            &base.join("tl/zh-Hans.mo"),
            &[("", "header"), ("start", "开始"), ("quit", "退出")],
        );
        write_mo(
            &base.join("tl/ja.mo"),
            &[("", "header"), ("start", "スタート"), ("quit", "終了")],
        );
        write_mo(
            &base.join("tl/ko.mo"),
            &[("", "header"), ("start", "시작"), ("quit", "종료")],
        );
    }

    fn completed_codes(summary: &RelaySummary) -> Vec<&str> {
        summary
            .completed
            .iter()
            .map(|outcome| outcome.code.as_str())
            .collect()
    }

    #[test]
    fn test_propagates_changes_to_every_language() {
        let temp = TempDir::new().unwrap();
        standard_layout(&temp);
        let ctx = context(&temp, vec![]);
        let translator = RecordingTranslator::default();

        let summary = Relay::new(&ctx, &NativeBridge, &translator).run().unwrap();

        assert!(summary.issues.is_empty(), "{:?}", summary.issues);
        assert_eq!(summary.changed_entries, 2);
        assert_eq!(completed_codes(&summary), vec!["ja", "ko", "zh-Hans"]);

        let ja = read_mo(&temp.path().join("tl_output/ja.mo"));
        assert_eq!(ja.get(""), Some("header"));
        assert_eq!(ja.get("start"), Some("スタート"));
        assert_eq!(ja.get("quit"), Some("[ja] 退出游戏"));
        assert_eq!(ja.get("load"), Some("[ja] 读取"));

        let zh = read_mo(&temp.path().join("tl_output/zh-Hans.mo"));
        assert_eq!(zh.get("quit"), Some("退出游戏"));
        assert_eq!(zh.get("load"), Some("读取"));

        assert_eq!(
            read_po(&temp.path().join("tl/ko.po")).get("quit"),
            Some("[ko] 退出游戏")
        );
    }

    #[test]
    fn test_one_translation_per_change_and_none_for_reference() {
        let temp = TempDir::new().unwrap();
        standard_layout(&temp);
        let ctx = context(&temp, vec![]);
        let translator = RecordingTranslator::default();

        Relay::new(&ctx, &NativeBridge, &translator).run().unwrap();

        let calls = translator.calls.borrow();
        assert_eq!(
            *calls,
            vec![
                ("退出游戏".to_string(), Language::ZhHans, Language::Ja),
                ("读取".to_string(), Language::ZhHans, Language::Ja),
                ("退出游戏".to_string(), Language::ZhHans, Language::Ko),
                ("读取".to_string(), Language::ZhHans, Language::Ko),
            ]
        );
    }

    #[test]
    fn test_no_op_run_keeps_targets() {
        let temp = TempDir::new().unwrap();
        let entries = [("", "header"), ("start", "开始")];
        let ja_entries = [("", "header"), ("start", "スタート")];
        write_po(&temp.path().join("zh-Hans.po"), &entries);
        write_mo(&temp.path().join("tl/zh-Hans.mo"), &entries);
        write_mo(&temp.path().join("tl/ja.mo"), &ja_entries);
        let ctx = context(&temp, vec![]);
        let translator = RecordingTranslator::default();

        let summary = Relay::new(&ctx, &NativeBridge, &translator).run().unwrap();

        assert_eq!(summary.changed_entries, 0);
        assert!(translator.calls.borrow().is_empty());
        assert_eq!(read_po(&temp.path().join("tl/ja.po")), catalog(&ja_entries));
        assert_eq!(read_mo(&temp.path().join("tl_output/ja.mo")), catalog(&ja_entries));
    }

    #[test]
    fn test_bootstraps_missing_language() {
        let temp = TempDir::new().unwrap();
        standard_layout(&temp);
        let ctx = context(&temp, vec![Language::En, Language::ZhHans]);
        let translator = RecordingTranslator::default();

        let summary = Relay::new(&ctx, &NativeBridge, &translator).run().unwrap();

        assert_eq!(summary.bootstrapped, vec!["en"]);
        assert_eq!(completed_codes(&summary), vec!["ja", "ko", "zh-Hans", "en"]);

        let en = read_mo(&temp.path().join("tl_output/en.mo"));
        assert_eq!(en.get("start"), Some("start"));
        assert_eq!(en.get("quit"), Some("[en] 退出游戏"));
        assert_eq!(en.get("load"), Some("[en] 读取"));

        // The placeholder is now a regular catalog and is not bootstrapped again.
        let summary = Relay::new(&ctx, &NativeBridge, &translator).run().unwrap();
        assert!(summary.bootstrapped.is_empty());
        assert_eq!(completed_codes(&summary), vec!["en", "ja", "ko", "zh-Hans"]);
    }

    #[test]
    fn test_first_run_without_snapshot_translates_everything() {
        let temp = TempDir::new().unwrap();
        write_po(
            &temp.path().join("zh-Hans.po"),
            &[("", ""), ("start", "开始"), ("quit", "退出")],
        );
        let ctx = context(&temp, vec![Language::En]);
        let translator = RecordingTranslator::default();

        let summary = Relay::new(&ctx, &NativeBridge, &translator).run().unwrap();

        assert_eq!(summary.changed_entries, 2);
        assert!(temp.path().join("tl/en.po").is_file());
        let en = read_mo(&temp.path().join("tl_output/en.mo"));
        assert_eq!(en.get("start"), Some("[en] 开始"));
        assert_eq!(en.get("quit"), Some("[en] 退出"));
    }

    #[test]
    fn test_missing_template_is_fatal_and_touches_nothing() {
        let temp = TempDir::new().unwrap();
        let ja = temp.path().join("tl/ja.mo");
        write_mo(&ja, &[("", ""), ("start", "スタート")]);
        let before = std::fs::read(&ja).unwrap();
        let ctx = context(&temp, vec![Language::En]);
        let translator = RecordingTranslator::default();

        let err = Relay::new(&ctx, &NativeBridge, &translator).run().unwrap_err();

        match err {
            CliError::MissingTemplate(e) => {
                assert_eq!(e.po, temp.path().join("zh-Hans.po"));
                assert_eq!(e.mo, temp.path().join("zh-Hans.mo"));
                assert!(e.causes.is_empty());
            },
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(std::fs::read(&ja).unwrap(), before);
        assert!(!temp.path().join("tl/ja.po").exists());
        assert!(!temp.path().join("tl/en.po").exists());
        assert!(!temp.path().join("tl_output").exists());
    }

    #[test]
    fn test_unreadable_compiled_reference_is_fatal() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("zh-Hans.mo"), b"garbage").unwrap();
        let ctx = context(&temp, vec![]);
        let translator = RecordingTranslator::default();

        let err = Relay::new(&ctx, &NativeBridge, &translator).run().unwrap_err();

        match err {
            CliError::MissingTemplate(e) => assert_eq!(e.causes.len(), 1),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!temp.path().join("tl_output").exists());
    }

    #[test]
    fn test_reference_is_derived_from_compiled_form() {
        let temp = TempDir::new().unwrap();
        write_mo(&temp.path().join("zh-Hans.mo"), &[("", ""), ("start", "开始")]);
        let ctx = context(&temp, vec![]);
        let translator = RecordingTranslator::default();

        Relay::new(&ctx, &NativeBridge, &translator).run().unwrap();

        let derived = read_po(&temp.path().join("zh-Hans.po"));
        assert_eq!(derived.get("start"), Some("开始"));
    }

    #[test]
    fn test_conversion_failure_skips_one_language() {
        let temp = TempDir::new().unwrap();
        standard_layout(&temp);
        std::fs::write(temp.path().join("tl/ko.mo"), b"not a catalog at all").unwrap();
        let ctx = context(&temp, vec![]);
        let translator = RecordingTranslator::default();

        let summary = Relay::new(&ctx, &NativeBridge, &translator).run().unwrap();

        assert_eq!(completed_codes(&summary), vec!["ja", "zh-Hans"]);
        assert_eq!(summary.issues.len(), 1);
        let issue = &summary.issues[0];
        assert_eq!(issue.stage, Stage::Decompile);
        assert_eq!(issue.path, temp.path().join("tl/ko.mo"));
        assert!(matches!(issue.failure, RelayFailure::Conversion(_)));
        assert!(!temp.path().join("tl_output/ko.mo").exists());
    }

    #[test]
    fn test_malformed_target_is_skipped() {
        let temp = TempDir::new().unwrap();
        standard_layout(&temp);
        std::fs::write(temp.path().join("tl/en.po"), "msgid \"start\nmsgstr \"\"\n").unwrap();
        let ctx = context(&temp, vec![Language::En]);
        let translator = RecordingTranslator::default();

        let summary = Relay::new(&ctx, &NativeBridge, &translator).run().unwrap();

        assert_eq!(completed_codes(&summary), vec!["ja", "ko", "zh-Hans"]);
        assert!(summary.bootstrapped.is_empty());
        assert_eq!(summary.issues.len(), 1);
        let issue = &summary.issues[0];
        assert_eq!(issue.stage, Stage::Parse);
        match &issue.failure {
            RelayFailure::MalformedLiteral(e) => assert_eq!(e.line, 1),
            other => panic!("unexpected failure: {other:?}"),
        }
        assert!(!temp.path().join("tl_output/en.mo").exists());
    }

    #[test]
    fn test_translation_failure_leaves_target_untouched() {
        let temp = TempDir::new().unwrap();
        standard_layout(&temp);
        let ctx = context(&temp, vec![]);
        let translator = RecordingTranslator {
            fail_to: Some(Language::Ko),
            ..Default::default()
        };

        let summary = Relay::new(&ctx, &NativeBridge, &translator).run().unwrap();

        assert_eq!(completed_codes(&summary), vec!["ja", "zh-Hans"]);
        assert_eq!(summary.issues.len(), 1);
        assert_eq!(summary.issues[0].stage, Stage::Translate);
        assert_eq!(summary.issues[0].path, temp.path().join("tl/ko.po"));
        assert_eq!(read_po(&temp.path().join("tl/ko.po")).get("quit"), Some("종료"));
        assert!(!temp.path().join("tl_output/ko.mo").exists());
    }

    #[test]
    fn test_unsupported_language_with_changes() {
        let temp = TempDir::new().unwrap();
        standard_layout(&temp);
        write_mo(&temp.path().join("tl/fr.mo"), &[("", ""), ("start", "Démarrer")]);
        let ctx = context(&temp, vec![]);
        let translator = RecordingTranslator::default();

        let summary = Relay::new(&ctx, &NativeBridge, &translator).run().unwrap();

        assert_eq!(completed_codes(&summary), vec!["ja", "ko", "zh-Hans"]);
        assert_eq!(summary.issues.len(), 1);
        assert!(matches!(
            summary.issues[0].failure,
            RelayFailure::UnsupportedLanguage(_)
        ));
    }

    #[test]
    fn test_malformed_reference_skips_fan_out() {
        let temp = TempDir::new().unwrap();
        standard_layout(&temp);
        std::fs::write(temp.path().join("zh-Hans.po"), "msgid \"start\"\nmsgstr \"\\t\"\n").unwrap();
        let ctx = context(&temp, vec![Language::En]);
        let translator = RecordingTranslator::default();

        let summary = Relay::new(&ctx, &NativeBridge, &translator).run().unwrap();

        assert!(summary.fan_out_skipped);
        assert!(summary.completed.is_empty());
        assert_eq!(summary.issues.len(), 1);
        assert_eq!(summary.issues[0].stage, Stage::Parse);
        assert_eq!(summary.issues[0].path, temp.path().join("zh-Hans.po"));
        assert!(translator.calls.borrow().is_empty());
        assert!(!temp.path().join("tl/en.po").exists());
        assert_eq!(std::fs::read_dir(temp.path().join("tl_output")).unwrap().count(), 0);
    }

    #[test]
    fn test_unreadable_snapshot_skips_fan_out() {
        let temp = TempDir::new().unwrap();
        standard_layout(&temp);
        write_mo(
            &temp.path().join("tl/ja.mo"),
            &[("", "header"), ("start", "スタート(手直し)"), ("quit", "終了")],
        );
        std::fs::write(temp.path().join("tl/zh-Hans.mo"), b"corrupted snapshot").unwrap();
        let ctx = context(&temp, vec![Language::En]);
        let translator = RecordingTranslator::default();

        let summary = Relay::new(&ctx, &NativeBridge, &translator).run().unwrap();

        assert!(summary.fan_out_skipped);
        assert!(summary.completed.is_empty());
        assert_eq!(summary.issues.len(), 1);
        assert_eq!(summary.issues[0].stage, Stage::Decompile);
        assert_eq!(summary.issues[0].path, temp.path().join("tl/zh-Hans.mo"));
        assert!(translator.calls.borrow().is_empty());
        assert_eq!(
            read_po(&temp.path().join("tl/ja.po")).get("start"),
            Some("スタート(手直し)")
        );
        assert!(!temp.path().join("tl/en.po").exists());
        assert!(!temp.path().join("tl_output/ja.mo").exists());
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let temp = TempDir::new().unwrap();
        standard_layout(&temp);
        let ctx = context(&temp, vec![Language::En]).with_dry_run(true);
        let translator = RecordingTranslator::default();

        let summary = Relay::new(&ctx, &NativeBridge, &translator).run().unwrap();

        assert!(summary.issues.is_empty(), "{:?}", summary.issues);
        assert_eq!(summary.bootstrapped, vec!["en"]);
        assert_eq!(completed_codes(&summary), vec!["ja", "ko", "zh-Hans", "en"]);
        for outcome in &summary.completed {
            assert!(outcome.output.is_none());
            assert!(outcome.diff.as_ref().unwrap().has_changes());
        }

        let mut files: Vec<_> = std::fs::read_dir(temp.path().join("tl"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        files.sort();
        assert_eq!(files, vec!["ja.mo", "ko.mo", "zh-Hans.mo"]);
        assert!(!temp.path().join("tl_output").exists());
        // Translation still happens so the diff is realistic.
        assert_eq!(translator.calls.borrow().len(), 6);
    }
}
