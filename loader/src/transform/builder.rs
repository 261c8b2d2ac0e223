//! Record builder: one [`InputRow`] plus the batch context -> one [`PaysheetTxn`].
//!
//! Every optional column has a declared default. A cell that is missing or
//! empty takes the default; a cell that is present must parse, otherwise the
//! whole run stops with a [`FieldError`] before anything touches the database.

use crate::error::FieldError;
use crate::models::{non_blank, BatchContext, InputRow, PaysheetTxn};
use crate::parser::clean_amount;

/// An optional input column and the value used when its cell is empty.
#[derive(Debug, Clone, Copy)]
pub struct OptionalColumn<T> {
    pub column: &'static str,
    pub default: T,
}

impl<T: Copy> OptionalColumn<T> {
    /// Resolve a cell, parsing it with `parse` when present.
    pub fn resolve<F>(&self, cell: &Option<String>, line: usize, parse: F) -> Result<T, FieldError>
    where
        F: FnOnce(&str) -> Result<T, String>,
    {
        match non_blank(cell) {
            None => Ok(self.default),
            Some(text) => parse(text).map_err(|message| {
                FieldError::new(line, message)
                    .with_column(self.column)
                    .with_value(text)
            }),
        }
    }
}

pub const EMPL_RCD: OptionalColumn<i64> = OptionalColumn { column: "empl_rcd", default: 0 };
pub const SEQ_NO: OptionalColumn<i64> = OptionalColumn { column: "seq_no", default: 0 };
pub const HOURS: OptionalColumn<f64> = OptionalColumn { column: "hours", default: 0.0 };
pub const TOTAL: OptionalColumn<f64> = OptionalColumn { column: "Total", default: 0.0 };
/// `acct_cd` when the row has no combo code.
pub const BLANK_COMBO_CODE: &str = " ";
pub const DISABLE_DIRECT_DEPOSIT: OptionalColumn<bool> =
    OptionalColumn { column: "disable_direct_deposit", default: false };

/// Builds staged transactions for one batch.
pub struct RecordBuilder<'a> {
    context: &'a BatchContext,
}

impl<'a> RecordBuilder<'a> {
    pub fn new(context: &'a BatchContext) -> Self {
        Self { context }
    }

    /// Build the transaction for the row found at `line`.
    pub fn build(&self, line: usize, row: &InputRow) -> Result<PaysheetTxn, FieldError> {
        let emplid = required(&row.emplid, "emplid", line)?;
        let earning_code = required(&row.earning_code, "earning_code", line)?;

        let empl_rcd = EMPL_RCD.resolve(&row.empl_rcd, line, parse_whole)?;
        let seq_no = SEQ_NO.resolve(&row.seq_no, line, parse_whole)?;
        let hours = HOURS.resolve(&row.hours, line, parse_number)?;
        let amount =
            TOTAL.resolve(&row.total, line, |s| clean_amount(s).map_err(|e| e.to_string()))?;
        let disable_direct_deposit =
            DISABLE_DIRECT_DEPOSIT.resolve(&row.disable_direct_deposit, line, parse_flag)?;

        // Combo codes are opaque; only emptiness matters.
        let acct_cd = non_blank(&row.combo_code).unwrap_or(BLANK_COMBO_CODE);

        Ok(PaysheetTxn {
            source: self.context.source,
            created_at: self.context.created_at,
            company: self.context.company.clone(),
            paygroup: self.context.paygroup.clone(),
            period: self.context.period,
            emplid: emplid.to_string(),
            empl_rcd,
            seq_no,
            earning_code: earning_code.to_string(),
            hours,
            amount,
            acct_cd: acct_cd.to_string(),
            disable_direct_deposit,
        })
    }
}

fn required<'r>(
    cell: &'r Option<String>,
    column: &str,
    line: usize,
) -> Result<&'r str, FieldError> {
    non_blank(cell).ok_or_else(|| FieldError::new(line, "value is required").with_column(column))
}

/// Integer columns; spreadsheet exports may write `1` as `1.0`.
fn parse_whole(s: &str) -> Result<i64, String> {
    if let Ok(n) = s.parse::<i64>() {
        return Ok(n);
    }
    match s.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(f as i64),
        _ => Err("expected a whole number".to_string()),
    }
}

fn parse_number(s: &str) -> Result<f64, String> {
    s.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .ok_or_else(|| "expected a number".to_string())
}

fn parse_flag(s: &str) -> Result<bool, String> {
    match s.to_lowercase().as_str() {
        "y" | "yes" | "true" | "1" => Ok(true),
        "n" | "no" | "false" | "0" => Ok(false),
        _ => Err("expected Y or N".to_string()),
    }
}
