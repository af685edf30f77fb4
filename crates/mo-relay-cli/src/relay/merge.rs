use crate::core::{LanguageNotSupportedError, RelayFailure};
use crate::translate::Translator;
use mo_relay_catalog::{Catalog, ChangeSet};
use mo_relay_toml::Language;

/// Write every changed entry into `target` and return how many were written.
///
/// A target in the reference language receives the new values verbatim.
/// Any other target receives one translation per changed entry. Keys that
/// are not part of the change set are never touched, so corrections made by
/// hand in a target survive. On error `target` may be partially updated and
/// must be discarded.
pub fn merge_changes(
    target: &mut Catalog,
    changes: &ChangeSet,
    reference: Language,
    target_code: &str,
    translator: &dyn Translator,
) -> Result<usize, RelayFailure> {
    if target_code == reference.code() {
        for (key, value) in changes.iter() {
            target.insert(key, value);
        }
        return Ok(changes.len());
    }

    if changes.is_empty() {
        return Ok(0);
    }

    let to = Language::from_code(target_code).map_err(|e| LanguageNotSupportedError {
        code: e.code,
        supported: Language::all()
            .map(|language| language.code().to_string())
            .collect::<Vec<_>>()
            .join(", "),
    })?;

    for (key, value) in changes.iter() {
        let translated = translator.translate(value, reference, to)?;
        tracing::trace!(key, "{value:?} -> {translated:?}");
        target.insert(key, translated);
    }

    Ok(changes.len())
}
