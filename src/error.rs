use crate::validation::ValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("CSV error: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },

    #[error("Configuration error: {source}")]
    Config {
        #[from]
        source: serde_json::Error,
    },

    #[error("'{name}' does not follow the naming convention {expected}")]
    BadFilename { name: String, expected: &'static str },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    // The interactive supplier closed before a valid value arrived
    #[error("Input ended before a valid value was entered")]
    EndOfInput,
}

pub type Result<T> = std::result::Result<T, LedgerError>;
