//! # Paysheet - stage payroll earnings for PeopleSoft
//!
//! Loads earnings rows from a spreadsheet CSV export into
//! `sysadm.PS_PSHUP_TXN`, the staging table read by PeopleSoft's
//! "Load Paysheet Transactions" process.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│   Builder   │────▶│ PS_PSHUP_TXN│
//! │ (any enc.)  │     │ (auto-enc)  │     │ (defaults)  │     │ (one txn)   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! Rows are staged under the `OT` source. Each run first deletes the rows a
//! previous run staged under that source, then inserts the new batch, all in
//! a single transaction.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use paysheet::{config, load, prepare_file, OracleStore, Privilege};
//!
//! let batch = prepare_file(path, None, context)?;
//! let mut store = OracleStore::connect(&config::resolve(None, Privilege::Normal)?)?;
//! let report = load::run(&mut store, &batch)?;
//! println!("Inserted {} rows", report.inserted);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`logs`] - Operator console
//! - [`config`] - Connection settings
//! - [`parser`] - CSV, amount and date parsing
//! - [`models`] - Domain models and the staging column contract
//! - [`transform`] - Record building and batch preparation
//! - [`store`] - Staging table access
//! - [`load`] - The load run

// Core modules
pub mod error;
pub mod logs;
pub mod models;

// Input
pub mod config;
pub mod parser;

// Transformation
pub mod transform;

// Output
pub mod load;
pub mod store;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{ConfigError, CsvError, DateError, FieldError, LoadError, LoadResult, StoreError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{BatchContext, ColumnValue, InputRow, PayPeriod, PaysheetTxn, SourceTag};

// =============================================================================
// Re-exports - Config
// =============================================================================

pub use config::{ConnectionDescriptor, Privilege, ServiceTarget};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{clean_amount, parse_bytes, parse_date, parse_file, ParseResult, ParsedRow};

// =============================================================================
// Re-exports - Transformation
// =============================================================================

pub use transform::{prepare, prepare_file, Batch, RecordBuilder, SkippedRow};

// =============================================================================
// Re-exports - Store & load
// =============================================================================

pub use load::{LoadReport, DEFAULT_WAIT};
pub use store::{OracleStore, PaysheetStore, STAGING_TABLE};
