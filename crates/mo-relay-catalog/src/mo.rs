//! Native reader and writer for compiled gettext catalogs (`.mo`).
//!
//! Layout (all words are `u32` in the file's byte order):
//!
//! | offset | field                                   |
//! |--------|-----------------------------------------|
//! | 0      | magic `0x950412de`                      |
//! | 4      | format revision                         |
//! | 8      | number of strings `N`                   |
//! | 12     | offset of the original string table     |
//! | 16     | offset of the translation string table  |
//! | 20     | hash table size                         |
//! | 24     | hash table offset                       |
//!
//! Each table holds `N` `(length, offset)` pairs pointing at NUL-terminated
//! strings; the length excludes the terminator. Originals are sorted so that
//! readers can binary search them.

use crate::catalog::Catalog;
use crate::error::MoError;

/// Magic number in the writer's (little-endian) byte order.
pub const MAGIC: u32 = 0x9504_12de;

const HEADER_LEN: usize = 28;
const TABLE_ENTRY_LEN: usize = 8;

/// Compile a catalog into `.mo` bytes.
///
/// The header entry (empty key) is always included; other entries are
/// included only when they have a non-empty value, matching what `msgfmt`
/// does with untranslated messages. No hash table is emitted.
pub fn compile(catalog: &Catalog) -> Vec<u8> {
    let mut entries: Vec<(&str, &str)> = catalog
        .iter()
        .filter(|(key, value)| key.is_empty() || !value.is_empty())
        .collect();
    entries.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

    let count = entries.len();
    let originals_at = HEADER_LEN;
    let translations_at = originals_at + count * TABLE_ENTRY_LEN;
    let strings_at = translations_at + count * TABLE_ENTRY_LEN;

    let mut strings: Vec<u8> = Vec::new();
    let mut originals = Vec::with_capacity(count);
    let mut translations = Vec::with_capacity(count);
    for (key, _) in &entries {
        originals.push(push_string(&mut strings, key, strings_at));
    }
    for (_, value) in &entries {
        translations.push(push_string(&mut strings, value, strings_at));
    }

    let mut out = Vec::with_capacity(strings_at + strings.len());
    for word in [
        MAGIC,
        0,
        count as u32,
        originals_at as u32,
        translations_at as u32,
        0,
        strings_at as u32,
    ] {
        out.extend_from_slice(&word.to_le_bytes());
    }
    for (len, offset) in originals.into_iter().chain(translations) {
        out.extend_from_slice(&len.to_le_bytes());
        out.extend_from_slice(&offset.to_le_bytes());
    }
    out.extend_from_slice(&strings);
    out
}

fn push_string(strings: &mut Vec<u8>, text: &str, strings_at: usize) -> (u32, u32) {
    let offset = strings_at + strings.len();
    strings.extend_from_slice(text.as_bytes());
    strings.push(0);
    (text.len() as u32, offset as u32)
}

/// Read a `.mo` file in either byte order.
pub fn decompile(bytes: &[u8]) -> Result<Catalog, MoError> {
    let reader = Reader::new(bytes)?;

    let revision = reader.word(4, "header")?;
    if revision >> 16 != 0 {
        return Err(MoError::UnsupportedRevision(revision));
    }

    let count = reader.word(8, "header")? as usize;
    let originals_at = reader.word(12, "header")? as usize;
    let translations_at = reader.word(16, "header")? as usize;

    let mut catalog = Catalog::new();
    for idx in 0..count {
        let entry = idx * TABLE_ENTRY_LEN;
        let key = reader.string(originals_at + entry)?;
        let value = reader.string(translations_at + entry)?;
        catalog.insert(key, value);
    }
    Ok(catalog)
}

struct Reader<'a> {
    bytes: &'a [u8],
    big_endian: bool,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Result<Self, MoError> {
        let raw: [u8; 4] = bytes
            .get(..4)
            .and_then(|b| b.try_into().ok())
            .ok_or(MoError::Truncated("header"))?;

        let big_endian = if u32::from_le_bytes(raw) == MAGIC {
            false
        } else if u32::from_be_bytes(raw) == MAGIC {
            true
        } else {
            return Err(MoError::BadMagic(u32::from_le_bytes(raw)));
        };

        Ok(Self { bytes, big_endian })
    }

    fn word(&self, at: usize, what: &'static str) -> Result<u32, MoError> {
        let raw: [u8; 4] = at
            .checked_add(4)
            .and_then(|end| self.bytes.get(at..end))
            .and_then(|b| b.try_into().ok())
            .ok_or(MoError::Truncated(what))?;

        Ok(if self.big_endian {
            u32::from_be_bytes(raw)
        } else {
            u32::from_le_bytes(raw)
        })
    }

    /// Read the string described by the table entry at `entry`.
    fn string(&self, entry: usize) -> Result<String, MoError> {
        let len = self.word(entry, "string table")? as usize;
        let offset = self.word(entry + 4, "string table")? as usize;

        let data = offset
            .checked_add(len)
            .and_then(|end| self.bytes.get(offset..end))
            .ok_or(MoError::Truncated("string data"))?;

        String::from_utf8(data.to_vec()).map_err(|_| MoError::InvalidUtf8 { offset })
    }
}
