//! Configuration for a generation run
//!
//! Settings come from an `apinit.toml` file: an explicit `--config` path, the
//! current directory, or the user configuration directory, in that order of
//! preference. CLI flags override individual fields after loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use etcetera::{BaseStrategy, choose_base_strategy};
use log::debug;
use serde::Deserialize;

/// File name probed in the current directory and the user config directory.
const CONFIG_FILE_NAME: &str = "apinit.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Substring a module name must contain to be scanned. When unset, the
    /// manifest namespace prefix (`<namespace>.`) is used.
    pub module_filter: Option<String>,
    /// Dotted root module of the generated package. When unset,
    /// `<namespace>.api` is used.
    pub output_module: Option<String>,
    /// Namespace segment marking incubating modules excluded from scanning.
    pub unstable_segment: String,
    /// Directory name that anchors output file paths to destination modules.
    pub api_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            module_filter: None,
            output_module: None,
            unstable_segment: "contrib".to_owned(),
            api_dir: "api".to_owned(),
        }
    }
}

impl Config {
    /// Load configuration, probing the standard locations.
    ///
    /// With an explicit path the file must exist and parse; otherwise the
    /// first existing candidate wins and no file at all yields the defaults.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_toml_path(path);
        }
        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.is_file() {
            return Self::from_toml_path(&local);
        }
        if let Some(user) = user_config_path()
            && user.is_file()
        {
            return Self::from_toml_path(&user);
        }
        debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    fn from_toml_path(path: &Path) -> Result<Self> {
        debug!("loading config from {}", path.display());
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

/// `<user config dir>/apinit/apinit.toml`, when a home directory exists.
fn user_config_path() -> Option<PathBuf> {
    let strategy = choose_base_strategy().ok()?;
    Some(strategy.config_dir().join("apinit").join(CONFIG_FILE_NAME))
}
