//! Configuration service.
//!
//! Loads [`GadgetConfig`] from `config.toml`, fills gaps from the
//! environment, and persists the username submitted through the
//! configuration form.

use std::path::PathBuf;

use issuechart_core::config::GadgetConfig;
use issuechart_core::error::Result;

use crate::paths::ChartPaths;
use crate::storage::AtomicTomlFile;

pub struct ConfigService {
    file: AtomicTomlFile<GadgetConfig>,
}

impl ConfigService {
    /// Service over the default `config.toml`.
    pub fn new() -> Result<Self> {
        let path = ChartPaths::default().config_file()?;
        Ok(Self::with_path(path))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.file.path().to_path_buf()
    }

    /// Configuration exactly as stored; default when the file is missing.
    pub fn load_stored(&self) -> Result<GadgetConfig> {
        Ok(self.file.load()?.unwrap_or_default())
    }

    /// Stored configuration with environment fallbacks applied.
    pub fn load(&self) -> Result<GadgetConfig> {
        let config = self
            .load_stored()?
            .with_env_fallback(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Saves the username from the configuration form.
    pub fn submit_username(&self, username: &str) -> Result<()> {
        let username = username.trim();
        if username.is_empty() {
            return Err(issuechart_core::ChartError::config("username is required"));
        }
        self.file.update(GadgetConfig::default(), |config| {
            config.username = username.to_string();
        })?;
        self.restrict_permissions()?;
        tracing::info!("[Config] Saved username to {}", self.file.path().display());
        Ok(())
    }

    /// Replaces the whole stored configuration.
    pub fn save(&self, config: &GadgetConfig) -> Result<()> {
        self.file.save(config)?;
        self.restrict_permissions()
    }

    /// The file may hold API tokens: keep it user-only on Unix.
    fn restrict_permissions(&self) -> Result<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(self.file.path(), permissions)?;
        }
        Ok(())
    }
}
