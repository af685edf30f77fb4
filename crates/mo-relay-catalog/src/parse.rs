use crate::catalog::Catalog;
use crate::error::ParseError;
use crate::literal;

/// Marker that opens a new record.
pub const MSGID: &str = "msgid ";
/// Marker that opens the value of the current record.
pub const MSGSTR: &str = "msgstr ";

/// Which half of the current record continuation lines extend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Field {
    /// No `msgid` or `msgstr` has been seen yet.
    None,
    Id,
    Value,
}

/// Parse an editable catalog document.
///
/// Records start at a `msgid ` line; `msgstr ` switches to the value and
/// lines starting with `"` continue whichever half is open. All other lines
/// (comments, blank lines, `msgctxt`, plural forms) are ignored. A record is
/// committed when the next one starts, and the last one is committed after
/// the final line no matter what, so an empty document yields a single
/// `"" -> ""` entry. Duplicate ids keep the last value.
pub fn parse(document: &str) -> Result<Catalog, ParseError> {
    let mut catalog = Catalog::new();
    let mut id = String::new();
    let mut value = String::new();
    let mut field = Field::None;

    for (idx, line) in document.lines().enumerate() {
        let line_no = idx + 1;

        if let Some(rest) = line.strip_prefix(MSGID) {
            if field != Field::None {
                catalog.insert(std::mem::take(&mut id), std::mem::take(&mut value));
            }
            field = Field::Id;
            id.push_str(&decode_line(rest, line_no)?);
        } else if let Some(rest) = line.strip_prefix(MSGSTR) {
            field = Field::Value;
            value.push_str(&decode_line(rest, line_no)?);
        } else if line.starts_with('"') {
            match field {
                Field::Id => id.push_str(&decode_line(line, line_no)?),
                Field::Value => value.push_str(&decode_line(line, line_no)?),
                Field::None => {},
            }
        }
    }

    catalog.insert(id, value);
    Ok(catalog)
}

fn decode_line(segment: &str, line: usize) -> Result<String, ParseError> {
    literal::decode(segment).map_err(|reason| ParseError::MalformedLiteral { line, reason })
}
