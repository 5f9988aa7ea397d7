// 🔍 Import Deduplication - remember which source files were already ingested
//
// The log is plain text, one filename per line, append-only. A file counts as
// imported when its name occurs anywhere in the log text (substring match, so
// `sales_q1_2024_w.csv` also matches a logged `old_sales_q1_2024_w.csv`).

use crate::error::Result;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub struct ImportTracker {
    log_path: PathBuf,
}

/// Bare filename of an import source; the log never stores directories
pub fn file_name_of(file: &Path) -> String {
    file.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string()
}

impl ImportTracker {
    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        ImportTracker {
            log_path: log_path.into(),
        }
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Full log text; a log that does not exist yet reads as empty
    fn read_log(&self) -> Result<String> {
        match fs::read_to_string(&self.log_path) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn already_imported(&self, file: &Path) -> Result<bool> {
        let name = file_name_of(file);
        if name.is_empty() {
            return Ok(false);
        }

        let seen = self.read_log()?.contains(&name);
        debug!(file = %name, seen, "checked import log");
        Ok(seen)
    }

    /// Append the filename and a newline. Calling twice appends twice.
    pub fn mark_imported(&self, file: &Path) -> Result<()> {
        let name = file_name_of(file);

        if let Some(parent) = self.log_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut log = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;
        writeln!(log, "{}", name)?;

        info!(file = %name, log = %self.log_path.display(), "marked as imported");
        Ok(())
    }

    /// Every logged filename, in the order they were imported
    pub fn imported_files(&self) -> Result<Vec<String>> {
        Ok(self
            .read_log()?
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect())
    }
}

// ============================================================================
// TESTS
// ============================================================================
