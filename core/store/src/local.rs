//! Local filesystem settings store.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::store::SettingsStore;
use noteveil_common::{Error, Result};

/// Local filesystem settings store.
///
/// Persists the settings document as a single file. Saves go through a
/// sibling temp file followed by a rename, so a crash mid-write leaves the
/// previous document intact.
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    /// Create a store writing to the given file path.
    ///
    /// # Preconditions
    /// - The path must name a file, not a directory
    ///
    /// # Postconditions
    /// - The parent directory exists
    ///
    /// # Errors
    /// - Parent directory cannot be created
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        // Create the parent if it doesn't exist (sync for constructor)
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        Ok(Self { path })
    }

    /// Create a store under the user's config directory
    /// (`<config>/<app>/settings.json`).
    ///
    /// # Errors
    /// - No config directory on this platform
    pub fn in_config_dir(app: &str) -> Result<Self> {
        let base = dirs::config_dir()
            .ok_or_else(|| Error::Storage("No config directory available".to_string()))?;
        Self::new(base.join(app).join("settings.json"))
    }

    /// Get the file path this store writes to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

#[async_trait]
impl SettingsStore for LocalStore {
    fn name(&self) -> &str {
        "local"
    }

    async fn load(&self) -> Result<Option<Vec<u8>>> {
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, data: &[u8]) -> Result<()> {
        let temp = self.temp_path();
        fs::write(&temp, data).await?;
        fs::rename(&temp, &self.path).await?;
        Ok(())
    }
}
