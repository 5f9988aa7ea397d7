// ⚙️ Settings - where the ledger and import log live
// Loaded from an optional JSON file; every field has a default.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, Level};

pub const CONFIG_FILE: &str = "sales-ledger.json";
pub const CONFIG_ENV: &str = "SALES_LEDGER_CONFIG";
pub const DATA_DIR_ENV: &str = "SALES_LEDGER_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the ledger and the imported-files log
    pub data_dir: PathBuf,
    pub ledger_file: String,
    pub imported_log_file: String,
    /// tracing level for stderr diagnostics (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            data_dir: PathBuf::from("sales_files"),
            ledger_file: "all_sales.csv".to_string(),
            imported_log_file: "imported_files.txt".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

impl Settings {
    /// Read settings from `$SALES_LEDGER_CONFIG` or `./sales-ledger.json`,
    /// then apply `$SALES_LEDGER_DATA_DIR`.
    pub fn load() -> Result<Self> {
        let path = env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));

        let mut settings = Settings::from_file(&path)?;

        if let Some(dir) = env::var_os(DATA_DIR_ENV) {
            settings.data_dir = PathBuf::from(dir);
        }

        Ok(settings)
    }

    /// Missing file means defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Settings::default());
        }

        let text = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&text)?;
        Ok(settings)
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.data_dir.join(&self.ledger_file)
    }

    pub fn imported_log_path(&self) -> PathBuf {
        self.data_dir.join(&self.imported_log_file)
    }

    /// Unknown level names fall back to WARN
    pub fn tracing_level(&self) -> Level {
        self.log_level.parse().unwrap_or(Level::WARN)
    }
}

// ============================================================================
// TESTS
// ============================================================================
