// 📒 Sales Ledger - in-memory list of records for the session
// Loaded from the ledger CSV at start, appended to, written back on request.

use crate::error::Result;
use crate::record::SalesRecord;
use crate::validation::{validate_amount, validate_date_string, Region};
use csv::{ReaderBuilder, Trim, WriterBuilder};
use serde::Deserialize;
use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::Path;
use tracing::{info, warn};

pub const LEDGER_HEADER: [&str; 3] = ["amount", "sales_date", "region"];

/// One stored row before validation. Extra columns are ignored.
#[derive(Debug, Deserialize)]
struct LedgerRow {
    #[serde(default)]
    amount: String,
    #[serde(default)]
    sales_date: String,
    #[serde(default)]
    region: String,
}

impl LedgerRow {
    fn into_record(self) -> SalesRecord {
        SalesRecord::new(
            validate_amount(&self.amount),
            validate_date_string(&self.sales_date),
            Region::from_trusted_code(&self.region),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesLedger {
    records: Vec<SalesRecord>,
}

impl SalesLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the whole ledger file. A missing file is an empty ledger.
    ///
    /// Stored fields go through the same checks as imported ones, so a row
    /// saved with `?` comes back invalid.
    pub fn load(path: &Path) -> Result<Self> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "no ledger yet, starting empty");
                return Ok(Self::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(file);

        let mut records = Vec::new();
        for result in reader.deserialize() {
            let row: LedgerRow = result?;
            records.push(row.into_record());
        }

        let bad = records.iter().filter(|r| r.has_bad_data()).count();
        if bad > 0 {
            warn!(path = %path.display(), bad, "ledger contains rows with invalid data");
        }
        info!(path = %path.display(), rows = records.len(), "loaded ledger");

        Ok(SalesLedger { records })
    }

    /// Overwrite `path` with the header and every record. Invalid fields are
    /// written as the invalid marker.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut writer = WriterBuilder::new().from_path(path)?;
        writer.write_record(LEDGER_HEADER)?;

        for record in &self.records {
            writer.write_record([
                record.amount.to_string(),
                record.sales_date.to_string(),
                record.region.code().to_string(),
            ])?;
        }
        writer.flush()?;

        info!(path = %path.display(), rows = self.records.len(), "saved ledger");
        Ok(())
    }

    pub fn push(&mut self, record: SalesRecord) {
        self.records.push(record);
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = SalesRecord>) {
        self.records.extend(records);
    }

    /// Drop everything past the first `len` records
    pub fn truncate(&mut self, len: usize) {
        self.records.truncate(len);
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================
