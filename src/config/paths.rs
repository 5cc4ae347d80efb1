//! Path resolution for the ledger's files
//!
//! ## Resolution order
//!
//! 1. `WALLET_LEDGER_DATA_DIR` environment variable (if set)
//! 2. Unix: `$XDG_CONFIG_HOME/wallet-ledger` or `~/.config/wallet-ledger`
//! 3. Windows: `%APPDATA%\wallet-ledger`

use std::path::{Path, PathBuf};

use crate::error::{WalletError, WalletResult};

pub const DATA_DIR_ENV: &str = "WALLET_LEDGER_DATA_DIR";

const APP_DIR: &str = "wallet-ledger";

/// Every path the ledger reads or writes, rooted at one base directory
#[derive(Debug, Clone)]
pub struct LedgerPaths {
    base_dir: PathBuf,
}

impl LedgerPaths {
    /// Resolve the base directory from the environment
    pub fn new() -> WalletResult<Self> {
        let base_dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };
        Ok(Self { base_dir })
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    pub fn wallets_file(&self) -> PathBuf {
        self.data_dir().join("wallets.json")
    }

    pub fn expenses_file(&self) -> PathBuf {
        self.data_dir().join("expenses.json")
    }

    pub fn incomes_file(&self) -> PathBuf {
        self.data_dir().join("incomes.json")
    }

    pub fn transfers_file(&self) -> PathBuf {
        self.data_dir().join("transfers.json")
    }

    pub fn categories_file(&self) -> PathBuf {
        self.data_dir().join("categories.json")
    }

    /// Create the base and data directories
    pub fn ensure_directories(&self) -> WalletResult<()> {
        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| WalletError::Io(format!("Failed to create data directory: {}", e)))
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> WalletResult<PathBuf> {
    let config_base = match std::env::var_os("XDG_CONFIG_HOME") {
        Some(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => {
            let home = std::env::var_os("HOME").ok_or_else(|| {
                WalletError::Config(format!(
                    "HOME is not set; set {} to choose a data directory",
                    DATA_DIR_ENV
                ))
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join(APP_DIR))
}

#[cfg(windows)]
fn resolve_default_path() -> WalletResult<PathBuf> {
    let appdata = std::env::var_os("APPDATA")
        .ok_or_else(|| WalletError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join(APP_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_layout() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(paths.audit_log(), temp_dir.path().join("audit.log"));
        assert_eq!(
            paths.wallets_file(),
            temp_dir.path().join("data").join("wallets.json")
        );
        assert_eq!(
            paths.transfers_file(),
            temp_dir.path().join("data").join("transfers.json")
        );
    }

    #[test]
    fn test_env_var_override() {
        let temp_dir = TempDir::new().unwrap();
        std::env::set_var(DATA_DIR_ENV, temp_dir.path());

        let paths = LedgerPaths::new().unwrap();
        assert_eq!(paths.base_dir(), temp_dir.path());

        std::env::remove_var(DATA_DIR_ENV);
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().join("nested"));
        paths.ensure_directories().unwrap();
        assert!(paths.data_dir().is_dir());
    }
}
