use super::FormatBridge;
use crate::core::ConversionError;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Shells out to GNU gettext's `msgfmt` and `msgunfmt`.
#[derive(Clone, Debug, Default)]
pub struct GettextBridge {
    /// Directory holding the tools. `PATH` is searched when unset.
    bin_dir: Option<PathBuf>,
}

impl GettextBridge {
    pub fn new(bin_dir: Option<PathBuf>) -> Self {
        Self { bin_dir }
    }

    fn tool(&self, name: &str) -> PathBuf {
        match &self.bin_dir {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        }
    }

    fn run(&self, name: &str, input: &Path, output: &Path) -> Result<(), ConversionError> {
        let tool = self.tool(name);
        tracing::debug!("running {} {} -o {}", tool.display(), input.display(), output.display());

        let result = Command::new(&tool)
            .arg(input)
            .arg("-o")
            .arg(output)
            .output()
            .map_err(|e| {
                ConversionError::new(input, output, format!("failed to run {}: {e}", tool.display()))
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(ConversionError::new(
                input,
                output,
                format!("{name} exited with {}: {}", result.status, stderr.trim()),
            ));
        }

        if !output.exists() {
            return Err(ConversionError::new(
                input,
                output,
                format!("{name} reported success but produced no output"),
            ));
        }

        Ok(())
    }
}

impl FormatBridge for GettextBridge {
    fn compile(&self, po: &Path, mo: &Path) -> Result<(), ConversionError> {
        self.run("msgfmt", po, mo)
    }

    fn decompile(&self, mo: &Path, po: &Path) -> Result<(), ConversionError> {
        self.run("msgunfmt", mo, po)
    }
}
