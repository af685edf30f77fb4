//! Conversion between compiled (`.mo`) and editable (`.po`) catalogs.

mod gettext;
mod native;

pub use gettext::GettextBridge;
pub use native::NativeBridge;

use crate::core::ConversionError;
use mo_relay_toml::{BridgeKind, RelayConfig};
use std::path::Path;

/// Converts a catalog file into the other representation.
///
/// Both operations take explicit input and output paths and either produce
/// the output file or fail with the converter's diagnostic.
pub trait FormatBridge {
    /// Compile an editable catalog at `po` into `mo`.
    fn compile(&self, po: &Path, mo: &Path) -> Result<(), ConversionError>;

    /// Decompile the compiled catalog at `mo` into `po`.
    fn decompile(&self, mo: &Path, po: &Path) -> Result<(), ConversionError>;
}

/// The bridge selected by `bridge` in the configuration.
///
/// A relative `gettext_dir` is resolved against `base_dir`.
pub fn from_config(config: &RelayConfig, base_dir: &Path) -> Box<dyn FormatBridge> {
    match config.bridge {
        BridgeKind::Native => Box::new(NativeBridge),
        BridgeKind::Gettext => Box::new(GettextBridge::new(
            config.gettext_dir.as_ref().map(|dir| base_dir.join(dir)),
        )),
    }
}
