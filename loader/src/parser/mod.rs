//! Earnings CSV reader with encoding and delimiter auto-detection.
//!
//! Spreadsheet exports arrive as UTF-8, Latin-1 or Windows-1252 and with
//! whatever delimiter the exporting tool chose. The file is decoded, the
//! delimiter is detected on the header line, and each record is read into
//! an [`InputRow`].

use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::models::InputRow;

pub mod amount;
pub mod dates;

pub use amount::{clean_amount, AmountError};
pub use dates::{parse_date, parse_date_relative};

/// Columns every earnings file must have, spelled exactly as in the header.
pub const REQUIRED_COLUMNS: &[&str] = &["emplid", "earning_code"];

/// A row together with its 1-based line number in the file.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    pub line: usize,
    pub row: InputRow,
}

/// Result of parsing with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Data rows in file order
    pub rows: Vec<ParsedRow>,
    /// Detected encoding
    pub encoding: String,
    /// Detected or requested delimiter
    pub delimiter: char,
    /// Column headers
    pub headers: Vec<String>,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding.
///
/// Unknown encodings fall back to lossy UTF-8. A leading byte-order mark
/// is dropped.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    let decoded = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => String::from_utf8(bytes.to_vec())
            .unwrap_or_else(|_| String::from_utf8_lossy(bytes).to_string()),
        // WHATWG decodes Latin-1 labels as Windows-1252
        "iso-8859-1" | "latin-1" | "latin1" | "windows-1252" | "cp1252" => {
            encoding_rs::WINDOWS_1252.decode(bytes).0.to_string()
        }
        other => match encoding_rs::Encoding::for_label(other.as_bytes()) {
            Some(enc) => enc.decode(bytes).0.to_string(),
            None => String::from_utf8_lossy(bytes).to_string(),
        },
    };

    decoded.trim_start_matches('\u{feff}').to_string()
}

/// Detect the delimiter by counting occurrences in the first line
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [',', ';', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse an earnings CSV file, detecting encoding and (unless given) delimiter.
pub fn parse_file<P: AsRef<Path>>(path: P, delimiter: Option<char>) -> CsvResult<ParseResult> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes(&bytes, delimiter)
}

/// Parse earnings CSV bytes, detecting encoding and (unless given) delimiter.
pub fn parse_bytes(bytes: &[u8], delimiter: Option<char>) -> CsvResult<ParseResult> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(CsvError::EmptyFile);
    }

    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);

    let delimiter = delimiter.unwrap_or_else(|| detect_delimiter(&content));
    parse_str(&content, delimiter, encoding)
}

/// Parse decoded CSV text with an explicit delimiter.
pub fn parse_str(content: &str, delimiter: char, encoding: String) -> CsvResult<ParseResult> {
    let delimiter_byte = u8::try_from(delimiter).map_err(|_| CsvError::ParseError {
        line: 1,
        message: format!("delimiter '{}' is not a single-byte character", delimiter),
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter_byte)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());

    let lines = LineIndex::new(content.as_bytes());

    let headers = reader.headers().map_err(|e| csv_error(e, &lines))?.clone();
    if headers.iter().all(str::is_empty) {
        return Err(CsvError::EmptyFile);
    }
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == *column) {
            return Err(CsvError::MissingColumn(column.to_string()));
        }
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let mut record = record.map_err(|e| csv_error(e, &lines))?;
        let line = record.position().map(|p| lines.line_at(p.byte())).unwrap_or(1);

        // Rows of empty cells (",,,") from spreadsheet exports
        if record.iter().all(str::is_empty) {
            continue;
        }

        // Trailing empty cells are often cut off by the exporting tool
        while record.len() < headers.len() {
            record.push_field("");
        }

        let row: InputRow = record
            .deserialize(Some(&headers))
            .map_err(|e| csv_error(e, &lines))?;
        rows.push(ParsedRow { line, row });
    }

    Ok(ParseResult {
        rows,
        encoding,
        delimiter,
        headers: headers.iter().map(str::to_string).collect(),
    })
}

/// Maps byte offsets to physical 1-based line numbers.
///
/// The reader's own line counter does not include skipped blank lines, and
/// a record's position points at the start of any blank lines before it.
struct LineIndex<'a> {
    content: &'a [u8],
    newlines: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(content: &'a [u8]) -> Self {
        let newlines = content
            .iter()
            .enumerate()
            .filter(|(_, b)| **b == b'\n')
            .map(|(i, _)| i)
            .collect();
        Self { content, newlines }
    }

    /// Line of the first non-terminator byte at or after `byte`.
    fn line_at(&self, byte: u64) -> usize {
        let byte = (byte as usize).min(self.content.len());
        let start = self.content[byte..]
            .iter()
            .position(|b| *b != b'\n' && *b != b'\r')
            .map_or(self.content.len(), |skip| byte + skip);
        self.newlines.partition_point(|&nl| nl < start) + 1
    }
}

fn csv_error(err: csv::Error, lines: &LineIndex) -> CsvError {
    let line = err.position().map(|p| lines.line_at(p.byte())).unwrap_or(1);
    CsvError::ParseError {
        line,
        message: err.to_string(),
    }
}
