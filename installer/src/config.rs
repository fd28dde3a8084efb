//! Installer configuration loaded from `prebuilts.toml`.
//!
//! Settings are resolved in layers, later layers winning:
//!
//! 1. Built-in defaults.
//! 2. The configuration file: `--config`, else `$PREBUILTS_CONFIG`, else
//!    `<config_dir>/prebuilts.toml` when it exists.
//! 3. `$PREBUILTS_CACHE_DIR` for the cache directory.
//! 4. Command-line flags, applied by the caller.
//!
//! An explicitly named configuration file must exist; the default location is
//! optional.

use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use serde::Deserialize;
use std::time::Duration;

use crate::dirs::BaseDirs;
use crate::error::{FetchError, Result};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "PREBUILTS_CONFIG";

/// Environment variable overriding the cache directory.
pub const CACHE_DIR_ENV: &str = "PREBUILTS_CACHE_DIR";

/// File name looked up in the configuration directory.
pub const CONFIG_FILE_NAME: &str = "prebuilts.toml";

/// Installer settings.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct InstallerConfig {
    /// Where cached binaries live. Defaults to `<data_dir>/prebuilts`.
    pub cache_dir: Option<Utf8PathBuf>,
    /// Network timeout for a whole download, in seconds.
    #[serde(default = "InstallerConfig::default_timeout_secs")]
    pub timeout_secs: u64,
    /// Arch to select instead of matching the host, e.g. `android-arm64`.
    pub arch: Option<String>,
}

impl InstallerConfig {
    const fn default_timeout_secs() -> u64 {
        60
    }

    /// The download timeout as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Parse configuration from TOML text read from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Config`] for syntax errors, unknown keys, or
    /// values of the wrong type.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use prebuilts_installer::config::InstallerConfig;
    ///
    /// let config = InstallerConfig::from_toml("timeout_secs = 5\n", Utf8Path::new("prebuilts.toml"))
    ///     .expect("valid configuration");
    /// assert_eq!(config.timeout_secs, 5);
    /// assert!(config.cache_dir.is_none());
    /// ```
    pub fn from_toml(source: &str, path: &Utf8Path) -> Result<Self> {
        toml::from_str(source).map_err(|e| FetchError::Config {
            path: path.to_owned(),
            reason: e.to_string(),
        })
    }

    /// Load configuration using the layering described in the module docs.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Config`] when an explicitly named file is
    /// missing or any file fails to parse.
    pub fn load(explicit: Option<&Utf8Path>, dirs: &dyn BaseDirs) -> Result<Self> {
        let mut config = match config_path(explicit, dirs) {
            Some(ConfigPath::Required(path)) => read_config(&path)?,
            Some(ConfigPath::Optional(path)) if path.is_file() => read_config(&path)?,
            Some(ConfigPath::Optional(_)) | None => Self::default(),
        };
        if let Some(cache_dir) = env_path(CACHE_DIR_ENV) {
            debug!("cache directory overridden by {CACHE_DIR_ENV}: {cache_dir}");
            config.cache_dir = Some(cache_dir);
        }
        Ok(config)
    }
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            timeout_secs: Self::default_timeout_secs(),
            arch: None,
        }
    }
}

enum ConfigPath {
    Required(Utf8PathBuf),
    Optional(Utf8PathBuf),
}

fn config_path(explicit: Option<&Utf8Path>, dirs: &dyn BaseDirs) -> Option<ConfigPath> {
    if let Some(path) = explicit {
        return Some(ConfigPath::Required(path.to_owned()));
    }
    if let Some(path) = env_path(CONFIG_ENV) {
        return Some(ConfigPath::Required(path));
    }
    dirs.config_dir()
        .and_then(|dir| Utf8PathBuf::from_path_buf(dir).ok())
        .map(|dir| ConfigPath::Optional(dir.join(CONFIG_FILE_NAME)))
}

fn read_config(path: &Utf8Path) -> Result<InstallerConfig> {
    debug!("loading configuration from {path}");
    let source = std::fs::read_to_string(path).map_err(|e| FetchError::Config {
        path: path.to_owned(),
        reason: e.to_string(),
    })?;
    InstallerConfig::from_toml(&source, path)
}

/// Read a non-empty UTF-8 path from the environment.
fn env_path(name: &str) -> Option<Utf8PathBuf> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(Utf8PathBuf::from)
}
