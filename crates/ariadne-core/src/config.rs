//! Configuration for the Ariadne storage adapter.
//!
//! Configuration lives in `.ariadne/config.toml` under a working
//! directory. Every field is optional in the file; missing values take
//! the defaults defined here.

use crate::error::{AriadneError, Result};
use crate::path;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Mimetype reported for files without a recorded mimetype.
pub const DEFAULT_MIMETYPE: &str = "text/turtle";

/// Locale given to the root of a fresh store.
pub const DEFAULT_NLS: &str = "nl";

/// Main adapter configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterConfig {
    /// Working directory the configuration was resolved against.
    pub workdir: PathBuf,

    /// Path to the configuration file (`.ariadne/config.toml`).
    pub config_file: PathBuf,

    /// CMS path the adapter is rooted at (normalized, ends with `/`).
    pub root_path: String,

    /// Mimetype for files whose default locale records none.
    pub fallback_mimetype: String,

    /// Default locale of a freshly created store root.
    pub default_nls: String,

    /// Snapshot file backing the in-memory CMS.
    pub store_file: PathBuf,
}

/// On-disk shape of `.ariadne/config.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    adapter: AdapterSection,
    store: StoreSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AdapterSection {
    root_path: Option<String>,
    fallback_mimetype: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StoreSection {
    file: Option<PathBuf>,
    default_nls: Option<String>,
}

impl AdapterConfig {
    /// Creates a configuration with defaults for the given working directory.
    pub fn new(workdir: PathBuf) -> Self {
        Self {
            config_file: workdir.join(".ariadne").join("config.toml"),
            store_file: workdir.join(".ariadne").join("store.json"),
            root_path: "/".to_string(),
            fallback_mimetype: DEFAULT_MIMETYPE.to_string(),
            default_nls: DEFAULT_NLS.to_string(),
            workdir,
        }
    }

    /// Loads the configuration for `workdir`, applying defaults.
    ///
    /// A missing config file is not an error.
    ///
    /// # Errors
    ///
    /// Returns `AriadneError::ConfigParseError` if the file is not valid TOML
    /// or `AriadneError::Io` if it cannot be read.
    pub fn load(workdir: PathBuf) -> Result<Self> {
        let mut config = Self::new(workdir);
        if !config.config_file.exists() {
            tracing::debug!(
                "no config file at {}, using defaults",
                config.config_file.display()
            );
            return Ok(config);
        }

        let file = config.config_file.clone();
        config.merge_file(&file)?;
        Ok(config)
    }

    /// Loads defaults for `workdir` and merges an explicit config file.
    ///
    /// # Errors
    ///
    /// Returns `AriadneError::ConfigNotFound` if `file` does not exist.
    pub fn load_from(workdir: PathBuf, file: &Path) -> Result<Self> {
        if !file.exists() {
            return Err(AriadneError::ConfigNotFound(file.to_path_buf()));
        }
        let mut config = Self::new(workdir);
        config.config_file = file.to_path_buf();
        config.merge_file(file)?;
        Ok(config)
    }

    /// Overrides the root path, normalizing it.
    pub fn with_root_path(mut self, root_path: &str) -> Self {
        self.root_path = path::make_path(root_path);
        self
    }

    fn merge_file(&mut self, file: &Path) -> Result<()> {
        let content = std::fs::read_to_string(file)?;
        let parsed: ConfigFile = toml::from_str(&content)
            .map_err(|e| AriadneError::ConfigParseError(format!("{}: {}", file.display(), e)))?;

        if let Some(root) = parsed.adapter.root_path {
            self.root_path = path::make_path(&root);
        }
        if let Some(mimetype) = parsed.adapter.fallback_mimetype {
            self.fallback_mimetype = mimetype;
        }
        if let Some(store_file) = parsed.store.file {
            // Relative store paths are resolved against the working directory.
            self.store_file = self.workdir.join(store_file);
        }
        if let Some(nls) = parsed.store.default_nls {
            self.default_nls = nls;
        }

        tracing::debug!("loaded config from {}", file.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AdapterConfig::new(PathBuf::from("/work"));
        assert_eq!(config.root_path, "/");
        assert_eq!(config.fallback_mimetype, "text/turtle");
        assert_eq!(config.default_nls, "nl");
        assert_eq!(config.store_file, PathBuf::from("/work/.ariadne/store.json"));
        assert_eq!(
            config.config_file,
            PathBuf::from("/work/.ariadne/config.toml")
        );
    }

    #[test]
    fn test_with_root_path_normalizes() {
        let config = AdapterConfig::new(PathBuf::from("/work")).with_root_path("sites//demo");
        assert_eq!(config.root_path, "/sites/demo/");
    }
}
