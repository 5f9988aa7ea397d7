// 📥 Import Sources
// Which files can be imported, how their rows are read, and the import pipeline
// that ties reading, normalization, the ledger file and the import log together.

use crate::deduplication::{file_name_of, ImportTracker};
use crate::error::{LedgerError, Result};
use crate::ledger::SalesLedger;
use crate::record::{normalize_import, RawSalesRow, SalesRecord};
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Naming convention for quarterly extracts: quarter digit, year, region letter
pub const NAMING_CONVENTION: &str = "sales_qn_yyyy_r.csv";

// ============================================================================
// SOURCE KINDS
// ============================================================================

/// Kinds of import source. Only quarterly CSV extracts exist today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    QuarterlyCsv,
}

impl SourceKind {
    pub fn name(&self) -> &str {
        match self {
            SourceKind::QuarterlyCsv => "Quarterly sales CSV",
        }
    }
}

/// Reads the raw `amount,sales_date` rows of one source file
pub trait SalesSource {
    fn read_rows(&self, file_path: &Path) -> Result<Vec<RawSalesRow>>;

    fn kind(&self) -> SourceKind;
}

/// `sales_q<digit>_<year>_<region>.csv`, checked loosely: prefix, extension
/// and minimum length only.
pub fn is_valid_filename_format(filename: &str) -> bool {
    filename.starts_with("sales_q") && filename.ends_with(".csv") && filename.len() >= 14
}

pub fn detect_source(file_path: &Path) -> Result<SourceKind> {
    let filename = file_name_of(file_path);

    if is_valid_filename_format(&filename) {
        return Ok(SourceKind::QuarterlyCsv);
    }

    Err(LedgerError::BadFilename {
        name: filename,
        expected: NAMING_CONVENTION,
    })
}

pub fn get_source(kind: SourceKind) -> Box<dyn SalesSource> {
    match kind {
        SourceKind::QuarterlyCsv => Box::new(QuarterlyCsvSource::new()),
    }
}

// ============================================================================
// QUARTERLY CSV
// ============================================================================

/// Headerless two-column CSV: amount, sales_date
pub struct QuarterlyCsvSource;

impl QuarterlyCsvSource {
    pub fn new() -> Self {
        QuarterlyCsvSource
    }
}

impl Default for QuarterlyCsvSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SalesSource for QuarterlyCsvSource {
    fn read_rows(&self, file_path: &Path) -> Result<Vec<RawSalesRow>> {
        let file = File::open(file_path)?;

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let mut rows = Vec::new();

        for (line_num, result) in reader.records().enumerate() {
            let record = result?;

            // Short rows become empty fields and fail validation downstream
            if record.len() != 2 {
                warn!(
                    file = %file_path.display(),
                    line = line_num + 1,
                    fields = record.len(),
                    "expected 2 fields"
                );
            }

            rows.push(RawSalesRow {
                amount: record.get(0).unwrap_or("").to_string(),
                sales_date: record.get(1).unwrap_or("").to_string(),
            });
        }

        Ok(rows)
    }

    fn kind(&self) -> SourceKind {
        SourceKind::QuarterlyCsv
    }
}

// ============================================================================
// IMPORT PIPELINE
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum ImportOutcome {
    AlreadyImported,
    Imported(PendingImport),
}

/// Rows read from one file that are not in the ledger file yet.
///
/// The import log is only written by [`PendingImport::commit`], after the
/// ledger holding these rows was saved.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingImport {
    file: PathBuf,
    records: Vec<SalesRecord>,
}

impl PendingImport {
    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    /// Append to `ledger`, save it to `ledger_path`, then log the file.
    /// A failed save takes the rows back out and leaves the log untouched.
    pub fn commit(
        self,
        ledger: &mut SalesLedger,
        ledger_path: &Path,
        tracker: &ImportTracker,
    ) -> Result<usize> {
        let before = ledger.len();
        let added = self.records.len();
        ledger.extend(self.records);

        if let Err(e) = ledger.save(ledger_path) {
            ledger.truncate(before);
            return Err(e);
        }

        tracker.mark_imported(&self.file)?;
        Ok(added)
    }
}

/// Read and normalize one file unless the log already names it. Nothing is
/// written here; see [`PendingImport::commit`].
pub fn import_sales(file_path: &Path, tracker: &ImportTracker) -> Result<ImportOutcome> {
    let kind = detect_source(file_path)?;

    if tracker.already_imported(file_path)? {
        info!(file = %file_path.display(), "skipping, already imported");
        return Ok(ImportOutcome::AlreadyImported);
    }

    let rows = get_source(kind).read_rows(file_path)?;
    let records = normalize_import(&file_name_of(file_path), &rows);

    let bad = records.iter().filter(|r| r.has_bad_data()).count();
    info!(
        file = %file_path.display(),
        source = kind.name(),
        rows = records.len(),
        bad,
        "read sales file"
    );

    Ok(ImportOutcome::Imported(PendingImport {
        file: file_path.to_path_buf(),
        records,
    }))
}

// ============================================================================
// TESTS
// ============================================================================
