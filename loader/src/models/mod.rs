//! Domain models for the paysheet loader.
//!
//! - [`SourceTag`] - 2-character feed marker written to `pu_source`
//! - [`PayPeriod`] - earns begin/end dates shared by every row of a batch
//! - [`InputRow`] - one CSV row, all cells as optional text
//! - [`PaysheetTxn`] - one staged transaction (see [`paysheet`])

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::DateError;

pub mod paysheet;

pub use paysheet::{BatchContext, ColumnValue, Fixed, PaysheetTxn, FIXED_COLUMNS, VARIABLE_COLUMNS};

// =============================================================================
// Source Tag
// =============================================================================

/// Marker identifying which feed produced a staged row.
///
/// The payroll system only picks up third-party rows whose source is two
/// characters starting with `O`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceTag(&'static str);

impl SourceTag {
    /// `OT` ("other"), the tag owned by this loader.
    pub const OTHER: SourceTag = SourceTag("OT");

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl Default for SourceTag {
    fn default() -> Self {
        Self::OTHER
    }
}

impl std::fmt::Display for SourceTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

// =============================================================================
// Pay Period
// =============================================================================

/// Earnings period for a batch. `end` is also used as the pay end date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayPeriod {
    begin: NaiveDate,
    end: NaiveDate,
}

impl PayPeriod {
    pub fn new(begin: NaiveDate, end: NaiveDate) -> Result<Self, DateError> {
        if end < begin {
            return Err(DateError::InvertedPeriod {
                begin: begin.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { begin, end })
    }

    pub fn begin(&self) -> NaiveDate {
        self.begin
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }
}

// =============================================================================
// Input Row
// =============================================================================

/// One row of the earnings CSV.
///
/// Every recognized column is read as text so codes keep their leading
/// zeros. Empty cells and missing columns are both `None`; unrecognized
/// columns are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InputRow {
    #[serde(default)]
    pub emplid: Option<String>,
    #[serde(default)]
    pub empl_rcd: Option<String>,
    #[serde(default)]
    pub seq_no: Option<String>,
    #[serde(default)]
    pub earning_code: Option<String>,
    #[serde(default)]
    pub hours: Option<String>,
    /// Currency text such as `$1,234.56`.
    #[serde(default, rename = "Total")]
    pub total: Option<String>,
    #[serde(default)]
    pub combo_code: Option<String>,
    #[serde(default)]
    pub disable_direct_deposit: Option<String>,
}

impl InputRow {
    /// Employee id, if the row has a usable one.
    pub fn emplid(&self) -> Option<&str> {
        non_blank(&self.emplid)
    }
}

/// Placeholders spreadsheet tools and dataframe exports write for a missing
/// value. `#N/A` is what a failed lookup formula leaves behind.
pub const NA_VALUES: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Whether a trimmed cell is one of the [`NA_VALUES`].
pub fn is_na(text: &str) -> bool {
    NA_VALUES.contains(&text)
}

/// Trimmed cell text, `None` when absent, whitespace only, or an NA placeholder.
pub(crate) fn non_blank(cell: &Option<String>) -> Option<&str> {
    cell.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty() && !is_na(s))
}
