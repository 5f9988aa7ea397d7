// 🧾 Record Normalizer
// Canonical sales record + the import-side normalization of raw CSV fields

use crate::validation::{validate_amount, validate_date_string, Amount, Region, SalesDate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The canonical unit stored in the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub amount: Amount,
    pub sales_date: SalesDate,
    pub region: Region,
}

impl SalesRecord {
    pub fn new(amount: Amount, sales_date: SalesDate, region: Region) -> Self {
        SalesRecord {
            amount,
            sales_date,
            region,
        }
    }

    pub fn has_bad_amount(&self) -> bool {
        !self.amount.is_valid()
    }

    pub fn has_bad_date(&self) -> bool {
        !self.sales_date.is_valid()
    }

    /// A row is corrupt when either its amount or its date failed validation
    pub fn has_bad_data(&self) -> bool {
        self.has_bad_amount() || self.has_bad_date()
    }
}

/// One unvalidated row of an import file: `amount,sales_date`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawSalesRow {
    pub amount: String,
    pub sales_date: String,
}

impl RawSalesRow {
    pub fn new(amount: &str, sales_date: &str) -> Self {
        RawSalesRow {
            amount: amount.to_string(),
            sales_date: sales_date.to_string(),
        }
    }
}

/// Region code carried by an import filename: the last character before
/// the extension (`sales_q1_2024_w.csv` → `w`). Empty if there is none.
pub fn region_code_from_filename(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(|stem| stem.chars().last())
        .map(String::from)
        .unwrap_or_default()
}

/// Amount and date are validated independently; a bad field becomes
/// `Invalid` and never blocks the other one.
pub fn normalize_import_row(row: &RawSalesRow, region: &Region) -> SalesRecord {
    SalesRecord::new(
        validate_amount(&row.amount),
        validate_date_string(&row.sales_date),
        region.clone(),
    )
}

/// One record per row, in order. Invalid rows are kept.
pub fn normalize_import(filename: &str, rows: &[RawSalesRow]) -> Vec<SalesRecord> {
    let region = Region::from_trusted_code(&region_code_from_filename(filename));
    rows.iter()
        .map(|row| normalize_import_row(row, &region))
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_region_code_from_filename() {
        assert_eq!(region_code_from_filename("sales_q1_2024_w.csv"), "w");
        assert_eq!(region_code_from_filename("sales_q4_2023_e.csv"), "e");
        assert_eq!(region_code_from_filename("/data/in/sales_q2_2021_c.csv"), "c");
        assert_eq!(region_code_from_filename(""), "");
    }

    #[test]
    fn test_region_from_filename_resolves_name() {
        let records = normalize_import(
            "sales_q1_2024_w.csv",
            &[RawSalesRow::new("10", "2024-01-01")],
        );
        assert_eq!(records[0].region, Region::West);
        assert_eq!(records[0].region.name(), Some("West"));
    }

    #[test]
    fn test_mixed_rows_are_tagged_not_dropped() {
        let rows = vec![
            RawSalesRow::new("12.50", "2024-01-05"),
            RawSalesRow::new("x", "2024-02-30"),
        ];

        let records = normalize_import("sales_q1_2024_e.csv", &rows);

        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0],
            SalesRecord::new(
                Amount::Valid(12.5),
                SalesDate::Valid(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()),
                Region::East,
            )
        );
        assert!(!records[0].has_bad_data());

        assert_eq!(records[1].amount, Amount::Invalid);
        assert_eq!(records[1].sales_date, SalesDate::Invalid);
        assert_eq!(records[1].region, Region::East);
        assert!(records[1].has_bad_data());
    }

    #[test]
    fn test_fields_fail_independently() {
        let region = Region::Central;

        let bad_amount = normalize_import_row(&RawSalesRow::new("abc", "2024-03-01"), &region);
        assert!(bad_amount.has_bad_amount());
        assert!(!bad_amount.has_bad_date());

        let bad_date = normalize_import_row(&RawSalesRow::new("5", "2024-3-1"), &region);
        assert!(!bad_date.has_bad_amount());
        assert!(bad_date.has_bad_date());
    }

    #[test]
    fn test_unrecognized_region_is_carried() {
        let records = normalize_import(
            "sales_q1_2024_x.csv",
            &[RawSalesRow::new("1", "2024-01-01")],
        );
        assert_eq!(records[0].region, Region::Unrecognized("x".to_string()));
        assert!(!records[0].has_bad_data());
    }

    #[test]
    fn test_empty_rows() {
        assert!(normalize_import("sales_q1_2024_w.csv", &[]).is_empty());
    }
}
