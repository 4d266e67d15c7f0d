//! Unified path management for issuechart files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/issuechart/        # Config directory (or $ISSUECHART_CONFIG_DIR)
//! ├── config.toml              # Gadget configuration (username, site, credentials)
//! └── local_storage.toml       # Persisted selections, one flat key per field
//! ```

use std::path::PathBuf;

/// Overrides the config directory when set.
pub const CONFIG_DIR_ENV: &str = "ISSUECHART_CONFIG_DIR";

const APP_DIR_NAME: &str = "issuechart";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for issuechart_core::ChartError {
    fn from(err: PathError) -> Self {
        issuechart_core::ChartError::config(err.to_string())
    }
}

/// Resolves every file location from one base directory.
#[derive(Debug, Clone)]
pub struct ChartPaths {
    base: Option<PathBuf>,
}

impl ChartPaths {
    /// Uses `base` when given, else `$ISSUECHART_CONFIG_DIR`, else the platform config dir.
    pub fn new(base: Option<PathBuf>) -> Self {
        let base = base.or_else(|| std::env::var_os(CONFIG_DIR_ENV).map(PathBuf::from));
        Self { base }
    }

    /// Returns the issuechart configuration directory.
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    /// Returns the path to `config.toml`.
    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Returns the path to the persisted selection store.
    pub fn local_storage_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("local_storage.toml"))
    }
}

impl Default for ChartPaths {
    fn default() -> Self {
        Self::new(None)
    }
}
