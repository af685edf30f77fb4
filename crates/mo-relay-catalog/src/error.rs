use thiserror::Error;

/// Why a quoted literal segment could not be decoded.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LiteralError {
    #[error("expected a string literal starting with '\"'")]
    MissingOpeningQuote,

    #[error("string literal is not terminated")]
    Unterminated,

    #[error("unsupported escape sequence '\\{0}' (only \\\", \\\\ and \\n are allowed)")]
    InvalidEscape(char),

    #[error("unexpected content after the closing quote: '{0}'")]
    TrailingContent(String),
}

/// Errors produced while parsing an editable catalog.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// A `msgid`, `msgstr` or continuation line holds an undecodable literal.
    #[error("malformed string literal on line {line}")]
    MalformedLiteral {
        /// 1-based line number in the document.
        line: usize,
        /// What was wrong with the literal.
        #[source]
        reason: LiteralError,
    },
}

impl ParseError {
    /// The 1-based line the error points at.
    pub fn line(&self) -> usize {
        match self {
            ParseError::MalformedLiteral { line, .. } => *line,
        }
    }
}

/// Errors produced while reading a compiled `.mo` catalog.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MoError {
    #[error("not a compiled gettext catalog (magic number {0:#010x})")]
    BadMagic(u32),

    #[error("unsupported .mo format revision {0:#x}")]
    UnsupportedRevision(u32),

    #[error("compiled catalog is truncated while reading the {0}")]
    Truncated(&'static str),

    #[error("string at byte offset {offset} is not valid UTF-8")]
    InvalidUtf8 {
        /// Offset of the string inside the file.
        offset: usize,
    },
}
