//! Staged paysheet transaction and the `PS_PSHUP_TXN` column contract.
//!
//! The staging table has 83 columns. Fifteen vary per row and live on
//! [`PaysheetTxn`]; the remaining ones are constants the payroll system's
//! "Load Paysheet Transactions" process expects, listed in [`FIXED_COLUMNS`].

use chrono::{NaiveDate, NaiveDateTime};

use super::{PayPeriod, SourceTag};

/// A value bound to one insert parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Text(String),
    Int(i64),
    Float(f64),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
    /// SQL NULL in a date column.
    NullDate,
}

/// Constant column kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fixed {
    /// Single space, the payroll system's "no value" for character columns.
    Blank,
    Zero,
    Flag(&'static str),
    NullDate,
}

impl Fixed {
    pub fn value(self) -> ColumnValue {
        match self {
            Fixed::Blank => ColumnValue::Text(" ".to_string()),
            Fixed::Zero => ColumnValue::Int(0),
            Fixed::Flag(flag) => ColumnValue::Text(flag.to_string()),
            Fixed::NullDate => ColumnValue::NullDate,
        }
    }
}

/// Columns taken from the batch or the input row, in [`PaysheetTxn::values`] order.
pub static VARIABLE_COLUMNS: [&str; 15] = [
    "pu_source",
    "creation_dt",
    "company",
    "paygroup",
    "pay_end_dt",
    "earns_begin_dt",
    "earns_end_dt",
    "emplid",
    "empl_rcd",
    "seqno",
    "acct_cd",
    "erncd",
    "oth_hrs",
    "disable_dir_dep",
    "pu_amt",
];

/// Columns with the same value on every staged row.
pub const FIXED_COLUMNS: &[(&str, Fixed)] = &[
    ("off_cycle", Fixed::Flag("N")),
    ("pu_txn_type", Fixed::Flag("E")),
    ("pu_txn_status", Fixed::Flag("A")),
    ("page_num", Fixed::Zero),
    ("line_num", Fixed::Zero),
    ("addl_nbr", Fixed::Zero),
    ("sepchk", Fixed::Zero),
    ("deptid", Fixed::Blank),
    ("jobcode", Fixed::Blank),
    ("position_nbr", Fixed::Blank),
    ("gl_pay_type", Fixed::Blank),
    ("pu_distribute", Fixed::Blank),
    ("addl_pay_shift", Fixed::Flag("J")),
    ("addl_seq", Fixed::Zero),
    ("addlpay_reason", Fixed::Blank),
    ("hourly_rt", Fixed::Zero),
    ("ok_to_pay", Fixed::Blank),
    ("state", Fixed::Blank),
    ("locality", Fixed::Blank),
    ("tax_periods", Fixed::Zero),
    ("tax_method", Fixed::Blank),
    ("ded_taken", Fixed::Blank),
    ("ded_subset_id", Fixed::Blank),
    ("ded_taken_genl", Fixed::Blank),
    ("ded_subset_genl", Fixed::Blank),
    ("business_unit", Fixed::Blank),
    ("comp_ratecd", Fixed::Blank),
    ("tax_class", Fixed::Blank),
    ("one_time_cd", Fixed::Blank),
    ("ctx_class", Fixed::Blank),
    ("plan_type", Fixed::Blank),
    ("benefit_plan", Fixed::Blank),
    ("dedcd", Fixed::Blank),
    ("ded_class", Fixed::Blank),
    ("ded_calc", Fixed::Blank),
    ("ded_rate_pct", Fixed::Zero),
    ("manual_check", Fixed::Flag("N")),
    ("paycheck_nbr", Fixed::Zero),
    ("ded_slstx_class", Fixed::Blank),
    ("ex_doc_id", Fixed::Blank),
    ("ex_doc_type", Fixed::Blank),
    ("ex_line_nbr", Fixed::Zero),
    ("currency_cd", Fixed::Blank),
    ("override_only", Fixed::Flag("Y")),
    ("grossup", Fixed::Flag("N")),
    ("vc_plan_id", Fixed::Blank),
    ("vc_payout_prd_id", Fixed::Blank),
    ("gb_group_id", Fixed::Blank),
    ("applid", Fixed::Blank),
    ("award_date", Fixed::NullDate),
    ("eim_key", Fixed::Blank),
    ("payout_dt", Fixed::NullDate),
    ("garnid", Fixed::Blank),
    ("garn_one_time_cd", Fixed::Blank),
    ("garn_priority", Fixed::Zero),
    ("garn_ded_calc", Fixed::Blank),
    ("garn_ded_pct", Fixed::Zero),
    ("garn_ded_amt", Fixed::Zero),
    ("cmpny_fee_pct", Fixed::Zero),
    ("cmpny_fee_amt", Fixed::Zero),
    ("payee_fee_pct", Fixed::Zero),
    ("payee_fee_amt", Fixed::Zero),
    ("py_garn_exempt", Fixed::Blank),
    ("check_dt", Fixed::NullDate),
    ("pu_txn_manual_chg", Fixed::Blank),
    ("work_psd_cd", Fixed::Blank),
    ("res_psd_cd", Fixed::Blank),
    ("oprid", Fixed::Blank),
];

/// Every staging column, variable ones first.
pub fn all_columns() -> impl Iterator<Item = &'static str> {
    VARIABLE_COLUMNS
        .iter()
        .copied()
        .chain(FIXED_COLUMNS.iter().map(|(name, _)| *name))
}

/// Values shared by every row of one load.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchContext {
    pub source: SourceTag,
    pub created_at: NaiveDateTime,
    pub company: String,
    pub paygroup: String,
    pub period: PayPeriod,
}

/// One staged payroll transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct PaysheetTxn {
    pub source: SourceTag,
    pub created_at: NaiveDateTime,
    pub company: String,
    pub paygroup: String,
    pub period: PayPeriod,
    pub emplid: String,
    pub empl_rcd: i64,
    /// Caller-assigned, unique per (emplid, empl_rcd), no gaps.
    pub seq_no: i64,
    pub earning_code: String,
    pub hours: f64,
    pub amount: f64,
    /// Combo code; `" "` when the row has none.
    pub acct_cd: String,
    pub disable_direct_deposit: bool,
}

impl PaysheetTxn {
    /// Uniqueness key within a batch.
    pub fn key(&self) -> (&str, i64, i64) {
        (&self.emplid, self.empl_rcd, self.seq_no)
    }

    /// All 83 named parameters for the insert statement.
    pub fn values(&self) -> Vec<(&'static str, ColumnValue)> {
        let variable = [
            ColumnValue::Text(self.source.as_str().to_string()),
            ColumnValue::Timestamp(self.created_at),
            ColumnValue::Text(self.company.clone()),
            ColumnValue::Text(self.paygroup.clone()),
            ColumnValue::Date(self.period.end()),
            ColumnValue::Date(self.period.begin()),
            ColumnValue::Date(self.period.end()),
            ColumnValue::Text(self.emplid.clone()),
            ColumnValue::Int(self.empl_rcd),
            ColumnValue::Int(self.seq_no),
            ColumnValue::Text(self.acct_cd.clone()),
            ColumnValue::Text(self.earning_code.clone()),
            ColumnValue::Float(self.hours),
            ColumnValue::Text(if self.disable_direct_deposit { "Y" } else { "N" }.to_string()),
            ColumnValue::Float(self.amount),
        ];

        VARIABLE_COLUMNS
            .iter()
            .copied()
            .zip(variable)
            .chain(FIXED_COLUMNS.iter().map(|(name, fixed)| (*name, fixed.value())))
            .collect()
    }
}
