#![doc = include_str!("../README.md")]

mod language;

pub use language::{Language, UnsupportedLanguageError, language_code_from_path};

use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable overriding `translator.app_id`.
pub const APP_ID_ENV: &str = "MO_RELAY_APP_ID";
/// Environment variable overriding `translator.app_key`.
pub const APP_KEY_ENV: &str = "MO_RELAY_APP_KEY";

#[derive(Debug, Error)]
pub enum RelayConfigError {
    /// Configuration file not found.
    #[error("configuration file not found: {0}")]
    NotFound(PathBuf),
    /// Failed to read configuration file.
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse configuration file.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// How compiled and editable catalogs are converted into each other.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BridgeKind {
    /// In-process `.mo` codec.
    #[default]
    Native,
    /// `msgfmt` / `msgunfmt` from GNU gettext.
    Gettext,
}

/// Settings for the remote translation endpoint.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct TranslatorConfig {
    /// Full URL of the translate endpoint.
    pub endpoint: String,
    /// Application identifier issued by the provider.
    pub app_id: Option<String>,
    /// Shared secret used to sign requests.
    pub app_key: Option<String>,
}

impl TranslatorConfig {
    pub const DEFAULT_ENDPOINT: &'static str = "http://api.fanyi.baidu.com/api/trans/vip/translate";
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            endpoint: Self::DEFAULT_ENDPOINT.to_string(),
            app_id: None,
            app_key: None,
        }
    }
}

/// The configuration for `mo-relay`.
///
/// Relative directories are resolved against the base directory being
/// processed, never against the process working directory.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Language of the hand-edited catalog at the top of the base directory.
    pub reference_language: Language,
    /// Directory holding the untouched catalogs, one per language.
    pub snapshot_dir: PathBuf,
    /// Directory receiving one compiled catalog per processed language.
    pub output_dir: PathBuf,
    /// Languages to bootstrap with a placeholder catalog when they have no
    /// file in the snapshot directory yet.
    pub generate_missing: Vec<Language>,
    /// Converter between `.mo` and `.po`.
    pub bridge: BridgeKind,
    /// Directory containing `msgfmt` and `msgunfmt` when `bridge = "gettext"`.
    /// Uses `PATH` when unset.
    pub gettext_dir: Option<PathBuf>,
    pub translator: TranslatorConfig,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            reference_language: Language::ZhHans,
            snapshot_dir: PathBuf::from("tl"),
            output_dir: PathBuf::from("tl_output"),
            generate_missing: vec![Language::En],
            bridge: BridgeKind::Native,
            gettext_dir: None,
            translator: TranslatorConfig::default(),
        }
    }
}

impl RelayConfig {
    /// Name of the configuration file looked up in the base directory.
    pub const FILE_NAME: &'static str = "relay.toml";

    /// Reads the configuration from a path.
    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self, RelayConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(RelayConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;

        let config: RelayConfig = toml::from_str(&content)?;

        Ok(config)
    }

    /// Reads `relay.toml` from `base_dir`, falling back to the defaults when
    /// the file does not exist.
    pub fn from_base_dir(base_dir: &Path) -> Result<Self, RelayConfigError> {
        match Self::read_from_path(base_dir.join(Self::FILE_NAME)) {
            Err(RelayConfigError::NotFound(_)) => Ok(Self::default()),
            other => other,
        }
    }

    /// Replace translator credentials with `MO_RELAY_APP_ID` /
    /// `MO_RELAY_APP_KEY` when those are set and non-empty.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(app_id) = non_empty_var(APP_ID_ENV) {
            self.translator.app_id = Some(app_id);
        }
        if let Some(app_key) = non_empty_var(APP_KEY_ENV) {
            self.translator.app_key = Some(app_key);
        }
        self
    }

    /// Snapshot directory resolved against `base_dir`.
    pub fn snapshot_dir_from_base(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.snapshot_dir)
    }

    /// Output directory resolved against `base_dir`.
    pub fn output_dir_from_base(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.output_dir)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}
