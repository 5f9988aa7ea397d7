// 📊 Report Aggregator
// Per-row quarter/region display values, running total over valid amounts,
// and a flag telling whether any row carried invalid data.

use crate::calendar::quarter;
use crate::record::SalesRecord;
use crate::validation::{Amount, INVALID_MARKER};
use serde::Serialize;
use std::fmt;
use std::io::{self, Write};
use tracing::warn;

const COL_NUM: usize = 5;
const COL_DATE: usize = 15;
const COL_QUARTER: usize = 15;
const COL_REGION: usize = 15;
const COL_AMOUNT: usize = 15;
const TOTAL_WIDTH: usize = COL_NUM + COL_DATE + COL_QUARTER + COL_REGION + COL_AMOUNT;

pub const NO_DATA_MESSAGE: &str = "No sales to view.";

// ============================================================================
// REPORT ROW
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    /// 1-based position in the ledger
    pub position: usize,
    pub corrupt: bool,
    pub sales_date: String,
    /// 0 when the date is invalid
    pub quarter: u32,
    pub region: String,
    pub amount: Amount,
}

impl ReportRow {
    fn from_record(position: usize, record: &SalesRecord) -> Self {
        let region = match record.region.name() {
            Some(name) => name.to_string(),
            None => {
                warn!(row = position, code = record.region.code(), "unrecognized region code");
                format!("Unknown ({})", record.region.code())
            }
        };

        // Invalid dates map to month 0, which quarter() turns into the 0 sentinel
        let month = record.sales_date.month().unwrap_or(0);

        ReportRow {
            position,
            corrupt: record.has_bad_data(),
            sales_date: record.sales_date.to_string(),
            quarter: quarter(month),
            region,
            amount: record.amount,
        }
    }

    /// `3.` for a clean row, `3.*` for a corrupt one
    pub fn marker(&self) -> String {
        if self.corrupt {
            format!("{}.*", self.position)
        } else {
            format!("{}.", self.position)
        }
    }

    fn amount_text(&self) -> String {
        match self.amount {
            Amount::Valid(v) => format!("{:.2}", v),
            Amount::Invalid => INVALID_MARKER.to_string(),
        }
    }
}

// ============================================================================
// SALES REPORT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesReport {
    pub rows: Vec<ReportRow>,
    /// Sum over rows whose amount is valid, whatever their date
    pub total: f64,
    pub has_bad_data: bool,
}

impl SalesReport {
    pub fn build(records: &[SalesRecord]) -> Self {
        let mut total = 0.0;
        let mut has_bad_data = false;
        let mut rows = Vec::with_capacity(records.len());

        for (idx, record) in records.iter().enumerate() {
            if let Amount::Valid(v) = record.amount {
                total += v;
            }
            has_bad_data |= record.has_bad_data();
            rows.push(ReportRow::from_record(idx + 1, record));
        }

        SalesReport {
            rows,
            total,
            has_bad_data,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn corrupt_rows(&self) -> usize {
        self.rows.iter().filter(|r| r.corrupt).count()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} rows, total {:.2}, {} with invalid data",
            self.rows.len(),
            self.total,
            self.corrupt_rows()
        )
    }
}

impl fmt::Display for SalesReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "{}", NO_DATA_MESSAGE);
        }

        let line = "-".repeat(TOTAL_WIDTH);

        writeln!(
            f,
            "{:COL_NUM$}{:COL_DATE$}{:COL_QUARTER$}{:COL_REGION$}{:>COL_AMOUNT$}",
            "", "Date", "Quarter", "Region", "Amount"
        )?;
        writeln!(f, "{}", line)?;

        for row in &self.rows {
            writeln!(
                f,
                "{:<COL_NUM$}{:COL_DATE$}{:<COL_QUARTER$}{:COL_REGION$}{:>COL_AMOUNT$}",
                row.marker(),
                row.sales_date,
                row.quarter,
                row.region,
                row.amount_text()
            )?;
        }

        writeln!(f, "{}", line)?;
        writeln!(
            f,
            "{:COL_NUM$}{:width$}{:>COL_AMOUNT$.2}",
            "TOTAL",
            "",
            self.total,
            width = COL_DATE + COL_QUARTER + COL_REGION
        )
    }
}

/// Print the report for `records` and return whether any row was corrupt.
/// An empty ledger prints only the no-data line and returns false.
pub fn view_sales<W: Write>(records: &[SalesRecord], out: &mut W) -> io::Result<bool> {
    let report = SalesReport::build(records);
    write!(out, "{}", report)?;
    Ok(report.has_bad_data)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{normalize_import, RawSalesRow};
    use crate::validation::{validate_date_string, Region};

    fn record(amount: Amount, date: &str, region: Region) -> SalesRecord {
        SalesRecord::new(amount, validate_date_string(date), region)
    }

    #[test]
    fn test_empty_report() {
        let mut out = Vec::new();
        let bad = view_sales(&[], &mut out).unwrap();

        assert!(!bad);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.trim(), NO_DATA_MESSAGE);
        assert!(!text.contains("TOTAL"));
    }

    #[test]
    fn test_clean_rows_total() {
        let records = vec![
            record(Amount::Valid(100.0), "2024-01-15", Region::West),
            record(Amount::Valid(250.5), "2024-05-01", Region::East),
            record(Amount::Valid(49.5), "2024-12-31", Region::Central),
        ];

        let report = SalesReport::build(&records);

        assert!(!report.has_bad_data);
        assert_eq!(report.total, 400.0);
        assert_eq!(
            report.rows.iter().map(|r| r.quarter).collect::<Vec<_>>(),
            vec![1, 2, 4]
        );
        assert_eq!(report.rows[1].region, "East");
        assert_eq!(report.rows[0].marker(), "1.");
    }

    #[test]
    fn test_mixed_import_scenario() {
        let records = normalize_import(
            "sales_q1_2024_e.csv",
            &[
                RawSalesRow::new("12.50", "2024-01-05"),
                RawSalesRow::new("x", "2024-02-30"),
            ],
        );

        let mut out = Vec::new();
        let bad = view_sales(&records, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(bad);
        assert!(text.contains("1.   2024-01-05     1              East                     12.50"));
        assert!(text.contains("2.*  ?              0              East                         ?"));
        assert!(text.contains("TOTAL"));
        assert!(text.lines().last().unwrap().ends_with("12.50"));

        let report = SalesReport::build(&records);
        assert_eq!(report.total, 12.5);
        assert_eq!(report.corrupt_rows(), 1);
    }

    #[test]
    fn test_amount_and_date_are_independent() {
        // Bad date still counts toward the total; bad amount is excluded
        let records = vec![
            record(Amount::Valid(10.0), "2024-02-30", Region::Mountain),
            record(Amount::Invalid, "2024-07-04", Region::Mountain),
        ];

        let report = SalesReport::build(&records);

        assert_eq!(report.total, 10.0);
        assert!(report.has_bad_data);
        assert!(report.rows[0].corrupt);
        assert_eq!(report.rows[0].quarter, 0);
        assert!(report.rows[1].corrupt);
        assert_eq!(report.rows[1].quarter, 3);
        assert_eq!(report.rows[1].amount, Amount::Invalid);
    }

    #[test]
    fn test_negative_import_amount_is_summed() {
        let records = vec![
            record(Amount::Valid(-5.0), "2024-01-01", Region::West),
            record(Amount::Valid(20.0), "2024-01-02", Region::West),
        ];

        let report = SalesReport::build(&records);
        assert_eq!(report.total, 15.0);
        assert!(!report.has_bad_data);
    }

    #[test]
    fn test_unrecognized_region_display() {
        let records = vec![record(
            Amount::Valid(1.0),
            "2024-01-01",
            Region::Unrecognized("x".to_string()),
        )];

        let report = SalesReport::build(&records);
        assert_eq!(report.rows[0].region, "Unknown (x)");
        assert!(!report.rows[0].corrupt);
    }

    #[test]
    fn test_round_trip_total_matches_sum() {
        let amounts = ["1.25", "2.50", "3.75", "100"];
        let rows: Vec<RawSalesRow> = amounts
            .iter()
            .map(|a| RawSalesRow::new(a, "2024-06-15"))
            .collect();

        let report = SalesReport::build(&normalize_import("sales_q2_2024_m.csv", &rows));

        assert!(!report.has_bad_data);
        assert!((report.total - 107.5).abs() < 1e-9);
        assert_eq!(report.summary(), "4 rows, total 107.50, 0 with invalid data");
    }
}
