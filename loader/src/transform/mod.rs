//! Transformation module.
//!
//! - Builder: one CSV row to one staged paysheet record
//! - Batch: whole-file preparation and input diagnostics

pub mod batch;
pub mod builder;

pub use batch::{prepare, prepare_file, Batch, BatchRow, CsvInfo, DuplicateKey, SkippedRow};
pub use builder::{OptionalColumn, RecordBuilder};
