//! Machine translation of changed values.

mod baidu;
mod fragments;

pub use baidu::{BaiduTranslator, provider_code, sign};
pub use fragments::{Fragment, apply_fragments};

use crate::core::TranslationServiceError;
use mo_relay_toml::Language;

/// Translates a single value between two supported languages.
pub trait Translator {
    fn translate(
        &self,
        text: &str,
        from: Language,
        to: Language,
    ) -> Result<String, TranslationServiceError>;
}
