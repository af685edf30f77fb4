use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr as _;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator as _};
use thiserror::Error;

/// A language code outside the supported set.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unsupported language code '{code}'")]
pub struct UnsupportedLanguageError {
    /// The code as found in the file name or configuration.
    pub code: String,
}

/// The fixed set of languages a catalog may be written in.
///
/// The string form is the catalog file stem, e.g. `zh-Hans` for
/// `zh-Hans.mo`.
#[derive(
    AsRefStr,
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    Eq,
    Hash,
    PartialEq,
    Serialize,
)]
pub enum Language {
    #[serde(rename = "en")]
    #[strum(serialize = "en")]
    En,
    #[serde(rename = "ja")]
    #[strum(serialize = "ja")]
    Ja,
    #[serde(rename = "ko")]
    #[strum(serialize = "ko")]
    Ko,
    #[serde(rename = "zh-Hans")]
    #[strum(serialize = "zh-Hans")]
    ZhHans,
    #[serde(rename = "zh-Hant")]
    #[strum(serialize = "zh-Hant")]
    ZhHant,
}

impl Language {
    /// Look up a language code, failing for anything outside the supported set.
    pub fn from_code(code: &str) -> Result<Self, UnsupportedLanguageError> {
        Self::from_str(code).map_err(|_| UnsupportedLanguageError {
            code: code.to_string(),
        })
    }

    pub fn code(&self) -> &str {
        self.as_ref()
    }

    /// Every supported language, in declaration order.
    pub fn all() -> impl Iterator<Item = Language> {
        Self::iter()
    }
}

/// The language code of a catalog file: its name up to the first `.`.
///
/// `tl/zh-Hans.po` gives `zh-Hans`; `en.backup.po` gives `en`.
pub fn language_code_from_path(path: &Path) -> Option<&str> {
    let name = path.file_name()?.to_str()?;
    name.split('.').next().filter(|code| !code.is_empty())
}
