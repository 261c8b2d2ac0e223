//! Batch preparation: parse the CSV, drop rows without an employee id, and
//! build every staged record before the database is touched.
//!
//! Two input problems are reported but not enforced:
//! - a repeated (emplid, empl_rcd, seq_no) key, which the payroll system
//!   rejects at load time;
//! - a row carrying both hours and an amount.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{FieldError, LoadResult};
use crate::logs::{log_info, log_success, log_warning, log_warning_indent};
use crate::models::{BatchContext, PaysheetTxn};
use crate::parser::{parse_file, ParseResult};

use super::builder::RecordBuilder;

/// Maximum number of individual diagnostics printed per kind.
const MAX_LISTED: usize = 5;

/// A staged record and the CSV line it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRow {
    pub line: usize,
    pub txn: PaysheetTxn,
}

/// A row that was skipped
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    pub line: usize,
    pub reason: String,
}

/// A uniqueness key used by more than one row.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateKey {
    pub emplid: String,
    pub empl_rcd: i64,
    pub seq_no: i64,
    pub lines: Vec<usize>,
}

/// CSV file information
#[derive(Debug, Clone, PartialEq)]
pub struct CsvInfo {
    pub encoding: String,
    pub delimiter: char,
    pub headers: Vec<String>,
    pub row_count: usize,
}

/// Everything needed to run a load.
#[derive(Debug, Clone)]
pub struct Batch {
    pub context: BatchContext,
    pub rows: Vec<BatchRow>,
    pub skipped: Vec<SkippedRow>,
    pub duplicate_keys: Vec<DuplicateKey>,
    /// Lines with both `hours` and an amount.
    pub mixed_lines: Vec<usize>,
    pub csv_info: CsvInfo,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &PaysheetTxn> {
        self.rows.iter().map(|r| &r.txn)
    }
}

/// Read `path` and prepare its batch.
pub fn prepare_file(
    path: &Path,
    delimiter: Option<char>,
    context: BatchContext,
) -> LoadResult<Batch> {
    log_info(format!("📖 Reading {}", path.display()));
    let parsed = parse_file(path, delimiter)?;
    log_success(format!("Encoding: {}", parsed.encoding));
    log_success(format!("Delimiter: '{}'", format_delimiter(parsed.delimiter)));
    log_success(format!("Read {} rows", parsed.rows.len()));

    Ok(prepare(parsed, context)?)
}

/// Build every record of a parsed file.
pub fn prepare(parsed: ParseResult, context: BatchContext) -> Result<Batch, FieldError> {
    let csv_info = CsvInfo {
        encoding: parsed.encoding,
        delimiter: parsed.delimiter,
        headers: parsed.headers,
        row_count: parsed.rows.len(),
    };

    let builder = RecordBuilder::new(&context);
    let mut rows = Vec::with_capacity(parsed.rows.len());
    let mut skipped = Vec::new();

    for parsed_row in &parsed.rows {
        if parsed_row.row.emplid().is_none() {
            skipped.push(SkippedRow {
                line: parsed_row.line,
                reason: "no emplid".to_string(),
            });
            continue;
        }

        let txn = builder.build(parsed_row.line, &parsed_row.row)?;
        tracing::debug!(
            line = parsed_row.line,
            emplid = %txn.emplid,
            erncd = %txn.earning_code,
            "built record"
        );
        rows.push(BatchRow { line: parsed_row.line, txn });
    }

    let duplicate_keys = find_duplicate_keys(&rows);
    let mixed_lines: Vec<usize> = rows
        .iter()
        .filter(|r| r.txn.hours != 0.0 && r.txn.amount != 0.0)
        .map(|r| r.line)
        .collect();

    let batch = Batch {
        context,
        rows,
        skipped,
        duplicate_keys,
        mixed_lines,
        csv_info,
    };
    report(&batch);
    Ok(batch)
}

/// Keys used more than once, in order of first appearance.
fn find_duplicate_keys(rows: &[BatchRow]) -> Vec<DuplicateKey> {
    let mut seen: HashMap<(&str, i64, i64), usize> = HashMap::new();
    let mut duplicates: Vec<DuplicateKey> = Vec::new();

    for row in rows {
        let key = row.txn.key();
        match seen.get(&key) {
            None => {
                seen.insert(key, row.line);
            }
            Some(&first_line) => {
                match duplicates.iter_mut().find(|d| {
                    (d.emplid.as_str(), d.empl_rcd, d.seq_no) == key
                }) {
                    Some(dup) => dup.lines.push(row.line),
                    None => duplicates.push(DuplicateKey {
                        emplid: key.0.to_string(),
                        empl_rcd: key.1,
                        seq_no: key.2,
                        lines: vec![first_line, row.line],
                    }),
                }
            }
        }
    }

    duplicates
}

fn report(batch: &Batch) {
    log_success(format!("Built {} paysheet records", batch.len()));

    if !batch.skipped.is_empty() {
        let lines: Vec<String> = batch
            .skipped
            .iter()
            .take(MAX_LISTED)
            .map(|s| s.line.to_string())
            .collect();
        let more = if batch.skipped.len() > MAX_LISTED {
            format!("... +{}", batch.skipped.len() - MAX_LISTED)
        } else {
            String::new()
        };
        log_warning(format!(
            "{} rows skipped without emplid (lines: {}{})",
            batch.skipped.len(),
            lines.join(", "),
            more
        ));
    }

    if !batch.duplicate_keys.is_empty() {
        log_warning(format!(
            "{} repeated emplid/empl_rcd/seq_no keys; the payroll load will reject them",
            batch.duplicate_keys.len()
        ));
        for dup in batch.duplicate_keys.iter().take(MAX_LISTED) {
            let lines: Vec<String> = dup.lines.iter().map(|l| l.to_string()).collect();
            let key = format!("{} / {} / {}", dup.emplid, dup.empl_rcd, dup.seq_no);
            log_warning_indent(format!("{} (lines: {})", key, lines.join(", ")), 1);
        }
    }

    if !batch.mixed_lines.is_empty() {
        let lines: Vec<String> = batch
            .mixed_lines
            .iter()
            .take(MAX_LISTED)
            .map(|l| l.to_string())
            .collect();
        log_warning(format!(
            "{} rows have both hours and an amount (lines: {})",
            batch.mixed_lines.len(),
            lines.join(", ")
        ));
    }
}

fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CsvError, LoadError};
    use crate::models::{PayPeriod, SourceTag};
    use crate::parser::parse_bytes;
    use chrono::NaiveDate;

    fn context() -> BatchContext {
        let begin = NaiveDate::from_ymd_opt(2019, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2019, 1, 31).unwrap();
        BatchContext {
            source: SourceTag::OTHER,
            created_at: begin.and_hms_opt(0, 0, 0).unwrap(),
            company: "GFU".into(),
            paygroup: "BWK".into(),
            period: PayPeriod::new(begin, end).unwrap(),
        }
    }

    fn prepare_csv(csv: &str) -> Result<Batch, FieldError> {
        prepare(parse_bytes(csv.as_bytes(), None).unwrap(), context())
    }

    #[test]
    fn test_rows_without_emplid_skipped() {
        let csv = "emplid,earning_code,Total\n000123,STP,\"$10.00\"\n,STP,\"$5.00\"\n";
        let batch = prepare_csv(csv).unwrap();

        assert_eq!(batch.len(), 1);
        assert_eq!(batch.skipped, vec![SkippedRow { line: 3, reason: "no emplid".into() }]);
        assert_eq!(batch.csv_info.row_count, 2);
    }

    #[test]
    fn test_na_emplid_rows_skipped() {
        let csv = "emplid,earning_code,Total\n000123,STP,$50\n#N/A,STP,$20\nNULL,STP,$10\n";
        let batch = prepare_csv(csv).unwrap();

        let emplids: Vec<&str> = batch.records().map(|t| t.emplid.as_str()).collect();
        assert_eq!(emplids, vec!["000123"]);
        let lines: Vec<usize> = batch.skipped.iter().map(|s| s.line).collect();
        assert_eq!(lines, vec![3, 4]);
    }

    #[test]
    fn test_misspelled_emplid_header_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("earnings.csv");
        let csv = "EmplID,earning_code,Total\n000123,STP,$50\n000456,STP,$20\n";
        std::fs::write(&path, csv).unwrap();

        let err = prepare_file(&path, None, context()).unwrap_err();
        assert!(matches!(err, LoadError::Csv(CsvError::MissingColumn(ref c)) if c == "emplid"));
    }

    #[test]
    fn test_skipped_row_not_validated() {
        // Garbage in a row that is dropped anyway must not abort the run
        let batch = prepare_csv("emplid,earning_code,Total\n,STP,$\n1,STP,3\n").unwrap();
        assert_eq!(batch.len(), 1);
    }

    #[test]
    fn test_bad_amount_aborts() {
        let err = prepare_csv("emplid,earning_code,Total\n1,STP,abc\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.column.as_deref(), Some("Total"));
    }

    #[test]
    fn test_duplicate_keys_reported() {
        let csv = "emplid,empl_rcd,seq_no,earning_code\n\
                   1,0,0,STP\n\
                   1,0,1,STP\n\
                   1,0,0,BON\n\
                   2,0,0,STP\n\
                   1,0,0,REG\n";
        let batch = prepare_csv(csv).unwrap();

        assert_eq!(batch.len(), 5);
        assert_eq!(
            batch.duplicate_keys,
            vec![DuplicateKey { emplid: "1".into(), empl_rcd: 0, seq_no: 0, lines: vec![2, 4, 6] }]
        );
    }

    #[test]
    fn test_mixed_hours_and_amount_reported() {
        let csv = "emplid,earning_code,hours,Total\n1,REG,8,\n2,STP,,100\n3,STP,2,100\n";
        let batch = prepare_csv(csv).unwrap();
        assert_eq!(batch.len(), 3);
        assert_eq!(batch.mixed_lines, vec![4]);
    }

    #[test]
    fn test_prepare_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("earnings.csv");
        std::fs::write(&path, "emplid,earning_code\n1,STP\n").unwrap();

        let batch = prepare_file(&path, None, context()).unwrap();
        assert_eq!(batch.records().count(), 1);
        assert_eq!(batch.csv_info.headers, vec!["emplid", "earning_code"]);
    }
}
