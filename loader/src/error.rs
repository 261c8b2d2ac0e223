//! Error types for the paysheet loader.
//!
//! - [`CsvError`] - reading and decoding the input file
//! - [`FieldError`] - a single cell that cannot be turned into a column value
//! - [`DateError`] - pay period dates given on the command line
//! - [`ConfigError`] - connection settings from the INI file or environment
//! - [`StoreError`] - staging table access
//! - [`LoadError`] - top-level run errors
//!
//! Every lower-level error converts into [`LoadError`] through `From`,
//! so `?` works across module boundaries.

use thiserror::Error;

// =============================================================================
// CSV Errors
// =============================================================================

/// Errors while reading the input CSV.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Malformed CSV record.
    #[error("Line {line}: {message}")]
    ParseError { line: usize, message: String },

    /// Empty file.
    #[error("CSV file is empty")]
    EmptyFile,

    /// A required column is not in the header line.
    #[error("Required column '{0}' not found in header")]
    MissingColumn(String),
}

// =============================================================================
// Field Errors
// =============================================================================

/// A cell that could not be converted, with enough context to find it.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub line: usize,
    pub column: Option<String>,
    pub value: Option<String>,
    pub message: String,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.column, &self.value) {
            (Some(col), Some(val)) => {
                write!(
                    f,
                    "Line {}, column '{}' (value '{}'): {}",
                    self.line, col, val, self.message
                )
            }
            (Some(col), None) => {
                write!(f, "Line {}, column '{}': {}", self.line, col, self.message)
            }
            _ => {
                write!(f, "Line {}: {}", self.line, self.message)
            }
        }
    }
}

impl std::error::Error for FieldError {}

impl FieldError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column: None,
            value: None,
            message: message.into(),
        }
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

// =============================================================================
// Date Errors
// =============================================================================

/// Errors parsing a pay period date.
#[derive(Debug, Error, PartialEq)]
pub enum DateError {
    /// Empty argument.
    #[error("Date is empty")]
    Empty,

    /// No known format matched.
    #[error("Unrecognized date: '{0}'")]
    Unrecognized(String),

    /// The period ends before it starts.
    #[error("Pay period ends ({end}) before it begins ({begin})")]
    InvertedPeriod { begin: String, end: String },
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors resolving connection settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read or parsed.
    #[error("Cannot load config file '{path}': {source}")]
    File {
        path: String,
        #[source]
        source: ini::Error,
    },

    /// Config file has no `[connection]` section.
    #[error("Config file has no [{0}] section")]
    MissingSection(String),

    /// A required setting is absent.
    #[error("Missing connection setting: {0}")]
    MissingKey(String),

    /// Neither a SID nor a service name was provided.
    #[error("Connection needs either a sid or a service_name")]
    MissingTarget,

    /// Port is not a number.
    #[error("Invalid port '{0}'")]
    InvalidPort(String),
}

// =============================================================================
// Store Errors
// =============================================================================

/// Errors from the staging table.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Driver-level failure (connect, execute, commit).
    #[error("Database error: {0}")]
    Database(#[from] oracle::Error),

    /// Failure reported by a non-Oracle store.
    #[error("Store error: {0}")]
    Other(String),
}

// =============================================================================
// Load Errors (top-level)
// =============================================================================

/// Top-level errors returned by a load run.
#[derive(Debug, Error)]
pub enum LoadError {
    /// CSV reading error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Cell conversion error.
    #[error("Field error: {0}")]
    Field(#[from] FieldError),

    /// Date argument error.
    #[error("Date error: {0}")]
    Date(#[from] DateError),

    /// Connection settings error.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Staging table error.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for config resolution.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for a load run.
pub type LoadResult<T> = Result<T, LoadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        let csv_err = CsvError::EmptyFile;
        let load_err: LoadError = csv_err.into();
        assert!(load_err.to_string().contains("empty"));

        let load_err: LoadError = CsvError::MissingColumn("emplid".into()).into();
        assert!(load_err.to_string().contains("'emplid'"));

        let date_err = DateError::Unrecognized("someday".into());
        let load_err: LoadError = date_err.into();
        assert!(load_err.to_string().contains("someday"));
    }

    #[test]
    fn test_field_error_format() {
        let err = FieldError::new(5, "not a number")
            .with_column("empl_rcd")
            .with_value("abc");

        let msg = err.to_string();
        assert!(msg.contains("Line 5"));
        assert!(msg.contains("column 'empl_rcd'"));
        assert!(msg.contains("value 'abc'"));
    }

    #[test]
    fn test_field_error_without_value() {
        let err = FieldError::new(3, "required").with_column("earning_code");
        assert_eq!(err.to_string(), "Line 3, column 'earning_code': required");
    }
}
