use crate::catalog::Catalog;
use crate::literal;
use crate::parse::{MSGID, MSGSTR};

/// Serialize a catalog as editable text.
///
/// Every entry becomes a `msgid` line, a `msgstr` line and a blank separator,
/// in catalog order. Strings are always written on a single line; embedded
/// newlines are escaped rather than wrapped.
pub fn serialize(catalog: &Catalog) -> String {
    let mut out = String::new();
    for (key, value) in catalog.iter() {
        out.push_str(MSGID);
        out.push_str(&literal::encode(key));
        out.push('\n');
        out.push_str(MSGSTR);
        out.push_str(&literal::encode(value));
        out.push_str("\n\n");
    }
    out
}
