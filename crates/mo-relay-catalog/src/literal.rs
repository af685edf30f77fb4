//! Quoted string literals as they appear after `msgid`, `msgstr` and on
//! continuation lines.
//!
//! The escape set is deliberately small and symmetric: `\"`, `\\` and `\n`.
//! [`encode`] produces exactly these escapes and [`decode`] accepts nothing
//! else, so `decode(&encode(s)) == s` for every string.

use crate::error::LiteralError;

/// Decode one quoted literal segment such as `"Say \"hi\"\n"`.
///
/// Whitespace around the literal is ignored. Anything after the closing
/// quote is an error, as is any escape other than `\"`, `\\` and `\n`.
pub fn decode(segment: &str) -> Result<String, LiteralError> {
    let body = segment
        .trim()
        .strip_prefix('"')
        .ok_or(LiteralError::MissingOpeningQuote)?;

    let mut out = String::with_capacity(body.len());
    let mut chars = body.char_indices();

    while let Some((idx, c)) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some((_, 'n')) => out.push('\n'),
                Some((_, '"')) => out.push('"'),
                Some((_, '\\')) => out.push('\\'),
                Some((_, other)) => return Err(LiteralError::InvalidEscape(other)),
                None => return Err(LiteralError::Unterminated),
            },
            '"' => {
                let rest = &body[idx + c.len_utf8()..];
                if !rest.is_empty() {
                    return Err(LiteralError::TrailingContent(rest.to_string()));
                }
                return Ok(out);
            },
            other => out.push(other),
        }
    }

    Err(LiteralError::Unterminated)
}

/// Encode `text` as a single-line quoted literal.
pub fn encode(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}
