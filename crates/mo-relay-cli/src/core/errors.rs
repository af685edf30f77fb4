//! CLI error types using miette for Rust-style diagnostics.
//!
//! Only [`CliError`] stops a run. Everything that goes wrong with a single
//! catalog is a [`RelayIssue`]: it is reported, the catalog is skipped and
//! the remaining languages are still processed.

// Fields in these structs are read by miette's Diagnostic derive macro
#![allow(unused)]

use miette::{Diagnostic, NamedSource, SourceSpan};
use mo_relay_catalog::ParseError;
use mo_relay_toml::RelayConfigError;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Neither the reference catalog nor its compiled form is usable.
#[derive(Debug, Diagnostic, Error)]
#[error("no reference catalog: {po} is missing and cannot be derived from {mo}")]
#[diagnostic(
    code(mo_relay::template::missing),
    help(
        "Put the hand-edited reference catalog, or its compiled form, \
         next to the snapshot directory"
    )
)]
pub struct MissingTemplateError {
    /// Where the editable reference catalog was expected.
    pub po: PathBuf,

    /// Where its compiled form was looked up.
    pub mo: PathBuf,

    /// Why deriving the reference from `mo` failed, if it was attempted.
    #[related]
    pub causes: Vec<ConversionError>,
}

/// A `.mo` / `.po` conversion failed.
#[derive(Debug, Diagnostic, Error)]
#[error("could not convert {input} into {output}")]
#[diagnostic(code(mo_relay::bridge::conversion))]
pub struct ConversionError {
    pub input: PathBuf,
    pub output: PathBuf,

    /// What the converter reported.
    #[help]
    pub help: String,
}

impl ConversionError {
    pub fn new(input: &Path, output: &Path, help: impl Into<String>) -> Self {
        Self {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            help: help.into(),
        }
    }
}

/// An editable catalog holds a literal that cannot be decoded.
#[derive(Debug, Diagnostic, Error)]
#[error("malformed string literal on line {line}")]
#[diagnostic(
    code(mo_relay::catalog::malformed_literal),
    help("Literals must be closed on their own line; only \\\", \\\\ and \\n escapes are recognized")
)]
pub struct MalformedLiteralError {
    /// The source content of the catalog.
    #[source_code]
    pub src: NamedSource<String>,

    /// The offending line.
    #[label("{reason}")]
    pub span: SourceSpan,

    /// 1-based line number.
    pub line: usize,

    pub reason: String,
}

impl MalformedLiteralError {
    pub fn new(path: &Path, content: String, error: &ParseError) -> Self {
        let ParseError::MalformedLiteral { line, reason } = error;
        let span = line_span(&content, *line);

        Self {
            src: NamedSource::new(path.display().to_string(), content),
            span,
            line: *line,
            reason: reason.to_string(),
        }
    }
}

/// A catalog file is named after a language outside the supported set.
#[derive(Debug, Diagnostic, Error)]
#[error("language '{code}' is not supported by the translator")]
#[diagnostic(
    code(mo_relay::translate::unsupported_language),
    help("Supported languages: {supported}")
)]
pub struct LanguageNotSupportedError {
    pub code: String,

    /// Comma-separated list of supported codes.
    pub supported: String,
}

/// The remote translation service could not translate a value.
#[derive(Debug, Diagnostic, Error)]
#[error("translation from {from} to {to} failed: {reason}")]
#[diagnostic(code(mo_relay::translate::service))]
pub struct TranslationServiceError {
    pub from: String,
    pub to: String,
    pub reason: String,

    #[help]
    pub help: Option<String>,
}

/// The step of the pipeline an issue interrupted.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Stage {
    Decompile,
    Parse,
    Bootstrap,
    Translate,
    Write,
    Compile,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Stage::Decompile => "decompile",
            Stage::Parse => "parse",
            Stage::Bootstrap => "bootstrap",
            Stage::Translate => "translate",
            Stage::Write => "write",
            Stage::Compile => "compile",
        };
        f.write_str(verb)
    }
}

/// The cause of a [`RelayIssue`].
#[derive(Debug, Diagnostic, Error)]
pub enum RelayFailure {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    MalformedLiteral(#[from] MalformedLiteralError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    UnsupportedLanguage(#[from] LanguageNotSupportedError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Translation(#[from] TranslationServiceError),

    #[error("IO error: {0}")]
    #[diagnostic(code(mo_relay::io))]
    Io(#[from] std::io::Error),
}

/// A per-catalog failure. The catalog is skipped, the run goes on.
#[derive(Debug, Diagnostic, Error)]
#[error("could not {stage} {path}")]
#[diagnostic(code(mo_relay::relay::skipped), severity(Warning))]
pub struct RelayIssue {
    pub path: PathBuf,
    pub stage: Stage,

    #[source]
    #[diagnostic_source]
    pub failure: RelayFailure,
}

impl RelayIssue {
    pub fn new(path: &Path, stage: Stage, failure: impl Into<RelayFailure>) -> Self {
        Self {
            path: path.to_path_buf(),
            stage,
            failure: failure.into(),
        }
    }
}

#[derive(Debug, Diagnostic, Error)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    MissingTemplate(#[from] MissingTemplateError),

    #[error("{0}")]
    #[diagnostic(
        code(mo_relay::config),
        help("Check relay.toml; every field is optional")
    )]
    Config(#[from] RelayConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Translation(#[from] TranslationServiceError),

    #[error("IO error: {0}")]
    #[diagnostic(code(mo_relay::io))]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    #[diagnostic(code(mo_relay::other))]
    Other(String),
}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::Other(format!("{err:#}"))
    }
}

/// Span covering a whole 1-based line of `source`, without its line break.
pub fn line_span(source: &str, line: usize) -> SourceSpan {
    let mut offset = 0;
    for (i, content) in source.split_inclusive('\n').enumerate() {
        if i + 1 == line {
            let len = content.trim_end_matches(['\r', '\n']).len();
            return SourceSpan::new(offset.into(), len);
        }
        offset += content.len();
    }
    SourceSpan::new(source.len().into(), 0)
}
