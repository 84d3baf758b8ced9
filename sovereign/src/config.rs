//! Configuration for sovereign

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::PersistenceError;
use crate::store::DEFAULT_CAPACITY;

/// Default storage directory
pub fn default_storage_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sovereign")
}

/// Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SovereignConfig {
    /// Directory holding the snapshot file
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,

    /// Snapshot file name inside `storage_dir`
    #[serde(default = "default_snapshot_file")]
    pub snapshot_file: String,

    /// Number of identities to pre-size the store for
    #[serde(default = "default_initial_capacity")]
    pub initial_capacity: usize,
}

fn default_snapshot_file() -> String {
    "sovereign-snapshot.json".to_string()
}

fn default_initial_capacity() -> usize {
    DEFAULT_CAPACITY
}

impl Default for SovereignConfig {
    fn default() -> Self {
        Self {
            storage_dir: default_storage_dir(),
            snapshot_file: default_snapshot_file(),
            initial_capacity: default_initial_capacity(),
        }
    }
}

impl SovereignConfig {
    /// Load config from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Save config to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), PersistenceError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Full path of the snapshot file
    pub fn snapshot_path(&self) -> PathBuf {
        self.storage_dir.join(&self.snapshot_file)
    }
}
