//! User settings, persisted as `config.json` in the base directory

use serde::{Deserialize, Serialize};

use super::paths::LedgerPaths;
use crate::error::{WalletError, WalletResult};

/// Which store engine backs the repositories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One JSON file per record type under `data/`
    #[default]
    Json,
    /// Nothing survives the process
    Memory,
}

impl StorageBackend {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "memory" => Some(Self::Memory),
            _ => None,
        }
    }
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency used when `wallet create` is given none
    #[serde(default = "default_currency")]
    pub default_currency: String,

    #[serde(default)]
    pub storage_backend: StorageBackend,

    #[serde(default = "default_true")]
    pub audit_enabled: bool,

    /// `tracing` filter directive; `RUST_LOG` wins when set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            default_currency: default_currency(),
            storage_backend: StorageBackend::default(),
            audit_enabled: true,
            log_filter: default_log_filter(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or defaults if the file doesn't exist yet
    pub fn load_or_create(paths: &LedgerPaths) -> WalletResult<Self> {
        let settings_path = paths.settings_file();
        if !settings_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| WalletError::Io(format!("Failed to read settings file: {}", e)))?;
        serde_json::from_str(&contents)
            .map_err(|e| WalletError::Config(format!("Failed to parse settings file: {}", e)))
    }

    pub fn save(&self, paths: &LedgerPaths) -> WalletResult<()> {
        paths.ensure_directories()?;
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| WalletError::Config(format!("Failed to serialize settings: {}", e)))?;
        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| WalletError::Io(format!("Failed to write settings file: {}", e)))
    }
}
