use super::FormatBridge;
use crate::core::ConversionError;
use fs_err as fs;
use mo_relay_catalog::{mo, parse, serialize};
use std::path::Path;

/// In-process converter built on the catalog crate's `.mo` codec.
///
/// Decompiled catalogs are written with the same serializer used for every
/// other editable catalog, so a decompile/compile cycle is lossless.
#[derive(Clone, Copy, Debug, Default)]
pub struct NativeBridge;

impl FormatBridge for NativeBridge {
    fn compile(&self, po: &Path, mo: &Path) -> Result<(), ConversionError> {
        let fail = |help: String| ConversionError::new(po, mo, help);

        let content = fs::read_to_string(po).map_err(|e| fail(e.to_string()))?;
        let catalog = parse(&content).map_err(|e| fail(e.to_string()))?;
        fs::write(mo, mo::compile(&catalog)).map_err(|e| fail(e.to_string()))?;

        tracing::debug!(entries = catalog.len(), "compiled {}", mo.display());
        Ok(())
    }

    fn decompile(&self, mo: &Path, po: &Path) -> Result<(), ConversionError> {
        let fail = |help: String| ConversionError::new(mo, po, help);

        let bytes = fs::read(mo).map_err(|e| fail(e.to_string()))?;
        let catalog = mo::decompile(&bytes).map_err(|e| fail(e.to_string()))?;
        fs::write(po, serialize(&catalog)).map_err(|e| fail(e.to_string()))?;

        tracing::debug!(entries = catalog.len(), "decompiled {}", mo.display());
        Ok(())
    }
}
