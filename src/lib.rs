// Sales Ledger - Core Library
// Validation and normalization pipeline for sales records, used by the CLI and tests

pub mod calendar;
pub mod config;
pub mod deduplication;
pub mod error;
pub mod input;
pub mod ledger;
pub mod record;
pub mod report;
pub mod source;
pub mod validation;

// Re-export commonly used types
pub use calendar::{is_leap_year, max_day, quarter, MAX_YEAR, MIN_YEAR};
pub use config::Settings;
pub use deduplication::ImportTracker;
pub use error::{LedgerError, Result};
pub use input::{from_component_entry, from_date_entry, InputSource, Prompter, StdinInput};
pub use ledger::SalesLedger;
pub use record::{
    normalize_import, normalize_import_row, region_code_from_filename, RawSalesRow, SalesRecord,
};
pub use report::{view_sales, ReportRow, SalesReport};
pub use source::{
    detect_source, get_source, import_sales, is_valid_filename_format, ImportOutcome,
    PendingImport, QuarterlyCsvSource, SalesSource, SourceKind,
};
pub use validation::{
    region_name, validate_amount, validate_date_string, validate_region_code, Amount, Region,
    SalesDate, ValidationError, INVALID_MARKER,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
