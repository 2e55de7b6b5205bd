//! Host configuration.
//!
//! Built from the editor's initialization options (JSON) or from a
//! `tumulte.toml` file. Every field has a default, so an empty object is a
//! valid configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tumulte_canon::HostSettings;
use tumulte_carton::normalize_path;

/// Errors raised while loading a [`HostConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid initialization options: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration of an [`AnalysisHost`](crate::AnalysisHost).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostConfig {
    /// Directory relative paths are reported against.
    pub current_directory: String,
    /// Directory holding the standard-library declaration files.
    pub lib_dir: Option<String>,
    /// Extension of component files, dot included.
    pub component_extension: String,
    /// Declaration used for components without a usable script. The
    /// built-in default is used when unset.
    pub default_declaration: Option<String>,
    /// Write `<component>.d.ts` files for imported components before
    /// analysis requests.
    pub materialize_declarations: bool,
    /// Log level passed to [`init_logging`](crate::init_logging).
    pub log_level: Option<String>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            current_directory: std::env::current_dir()
                .map(|dir| normalize_path(&dir.to_string_lossy()))
                .unwrap_or_default(),
            lib_dir: None,
            component_extension: ".riot".to_string(),
            default_declaration: None,
            materialize_declarations: true,
            log_level: None,
        }
    }
}

impl HostConfig {
    /// Read the configuration from editor initialization options. Missing
    /// options yield the default configuration.
    pub fn from_initialization_options(
        options: Option<serde_json::Value>,
    ) -> Result<Self, ConfigError> {
        match options {
            None | Some(serde_json::Value::Null) => Ok(Self::default()),
            Some(value) => Ok(serde_json::from_value(value)?),
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Settings handed to the script engine's host.
    pub fn host_settings(&self) -> HostSettings {
        HostSettings {
            current_directory: normalize_path(&self.current_directory),
            lib_dir: self.lib_dir.as_deref().map(normalize_path),
        }
    }

    pub fn is_component_path(&self, path: &str) -> bool {
        path.ends_with(&self.component_extension)
    }
}
