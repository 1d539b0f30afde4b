//! Tabular source: CSV bytes to header + rows.
//!
//! Handles encoding and delimiter detection, then splits the content into
//! records with the `csv` crate. No binding logic here. The first record is
//! the header; rows may be shorter or longer than it.

use std::io::Read;
use std::path::Path;

use serde::Serialize;

use crate::error::{CsvError, CsvResult};

/// Candidate delimiters, in tie-break order.
const DELIMITERS: [char; 4] = [',', ';', '\t', '|'];

/// Result of parsing with metadata
#[derive(Debug, Clone, Serialize)]
pub struct ParseResult {
    /// All records, header first
    pub records: Vec<Vec<String>>,
    /// Detected or used encoding
    pub encoding: String,
    /// Detected or used delimiter
    pub delimiter: char,
}

impl ParseResult {
    /// The header record (empty when the source had no records).
    pub fn headers(&self) -> &[String] {
        self.records.first().map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of data rows (records after the header).
    pub fn row_count(&self) -> usize {
        self.records.len().saturating_sub(1)
    }
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" | "utf-8-sig" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding
pub fn decode_content(bytes: &[u8], encoding: &str) -> CsvResult<String> {
    match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => match std::str::from_utf8(bytes) {
            Ok(s) => Ok(s.strip_prefix('\u{feff}').unwrap_or(s).to_string()),
            Err(e) => Err(CsvError::EncodingError {
                encoding: encoding.to_string(),
                message: e.to_string(),
            }),
        },
        // Windows-1252 matches ISO-8859-1 on every printable byte
        "iso-8859-1" | "latin-1" | "latin1" | "windows-1252" | "cp1252" => {
            Ok(encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned())
        }
        // Unknown charset: lossy UTF-8
        _ => Ok(String::from_utf8_lossy(bytes).into_owned()),
    }
}

/// Detect the delimiter by counting occurrences in the first line
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &DELIMITERS {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Read every record from a reader with an explicit delimiter.
///
/// Fails on the first malformed record; nothing is returned in that case.
pub fn parse_records<R: Read>(reader: R, delimiter: char) -> CsvResult<Vec<Vec<String>>> {
    if !delimiter.is_ascii() {
        return Err(CsvError::InvalidDelimiter(delimiter));
    }

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(false) // The header is the first record
        .flexible(true) // Short rows are handled by the binder
        .from_reader(reader);

    let mut records = Vec::new();
    for result in rdr.records() {
        let record = result?;
        records.push(record.iter().map(str::to_string).collect());
    }
    Ok(records)
}

/// Parse CSV text with an explicit delimiter.
///
/// # Example
/// ```
/// use rowbind::parser::parse_str;
///
/// let records = parse_str("id,name\n1,\"Doe, John\"", ',').unwrap();
/// assert_eq!(records[0], vec!["id", "name"]);
/// assert_eq!(records[1], vec!["1", "Doe, John"]);
/// ```
pub fn parse_str(content: &str, delimiter: char) -> CsvResult<Vec<Vec<String>>> {
    parse_records(content.as_bytes(), delimiter)
}

/// Parse CSV bytes with auto-detection of encoding and (optionally) delimiter.
pub fn parse_bytes_auto(bytes: &[u8], delimiter: Option<char>) -> CsvResult<ParseResult> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;
    let delimiter = delimiter.unwrap_or_else(|| detect_delimiter(&content));
    let records = parse_str(&content, delimiter)?;

    Ok(ParseResult {
        records,
        encoding,
        delimiter,
    })
}

/// Parse a CSV file with auto-detection of encoding and (optionally) delimiter.
///
/// # Example
/// ```ignore
/// let result = parse_csv_file_auto("/path/to/file.csv", None)?;
/// println!("Encoding: {}, Delimiter: '{}'", result.encoding, result.delimiter);
/// println!("Rows: {}", result.row_count());
/// ```
pub fn parse_csv_file_auto<P: AsRef<Path>>(path: P, delimiter: Option<char>) -> CsvResult<ParseResult> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes_auto(&bytes, delimiter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_simple_csv() {
        let records = parse_str("name;age\nAlice;30\nBob;25", ';').unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0], vec!["name", "age"]);
        assert_eq!(records[1], vec!["Alice", "30"]);
        assert_eq!(records[2], vec!["Bob", "25"]);
    }

    #[test]
    fn test_quoted_values() {
        let csv = "name,value\n\"Alice\",\"Hello, World\"";
        let records = parse_str(csv, ',').unwrap();
        assert_eq!(records[1], vec!["Alice", "Hello, World"]);
    }

    #[test]
    fn test_short_rows_kept() {
        let records = parse_str("a,b,c\n1,2\n1,2,3,4", ',').unwrap();
        assert_eq!(records[1].len(), 2);
        assert_eq!(records[2].len(), 4);
    }

    #[test]
    fn test_cells_not_trimmed() {
        let records = parse_str("a,b\n 1 ,x", ',').unwrap();
        assert_eq!(records[1][0], " 1 ");
    }

    #[test]
    fn test_malformed_csv_is_an_error() {
        let bytes: &[u8] = b"a,b\n\xff\xfe,2";
        let result = parse_records(bytes, ',');
        assert!(matches!(result, Err(CsvError::ParseError(_))));
    }

    #[test]
    fn test_multibyte_delimiter_rejected() {
        assert!(matches!(parse_str("a§b", '§'), Err(CsvError::InvalidDelimiter('§'))));
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
        assert_eq!(detect_delimiter("a\tb\tc\n1\t2\t3"), '\t');
        assert_eq!(detect_delimiter("a|b|c\n1|2|3"), '|');
        assert_eq!(detect_delimiter("single"), ',');
    }

    #[test]
    fn test_auto_parse() {
        let result = parse_bytes_auto(b"name;age\nAlice;30\nBob;25", None).unwrap();

        assert_eq!(result.delimiter, ';');
        assert_eq!(result.row_count(), 2);
        assert_eq!(result.headers(), ["name", "age"]);
    }

    #[test]
    fn test_empty_source() {
        let result = parse_bytes_auto(b"", None).unwrap();
        assert!(result.records.is_empty());
        assert!(result.headers().is_empty());
        assert_eq!(result.row_count(), 0);
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_content(bytes, "iso-8859-1").unwrap();
        assert_eq!(decoded, "Société");
    }

    #[test]
    fn test_latin1_high_bytes() {
        // ¤ ¦ ¨ ´ ¸ ¼ ½ ¾ differ between ISO-8859-1 and ISO-8859-15
        let bytes: &[u8] = &[0xA4, 0xA6, 0xA8, 0xB4, 0xB8, 0xBC, 0xBD, 0xBE];
        let decoded = decode_content(bytes, "iso-8859-1").unwrap();
        assert_eq!(decoded, "¤¦¨´¸¼½¾");
    }

    #[test]
    fn test_utf8_bom_stripped() {
        let decoded = decode_content("\u{feff}id,name".as_bytes(), "utf-8").unwrap();
        assert_eq!(decoded, "id,name");
    }

    #[test]
    fn test_parse_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "id,name\n1,John Doe\n2,Jane Smith\n").unwrap();

        let result = parse_csv_file_auto(file.path(), Some(',')).unwrap();
        assert_eq!(result.encoding, "utf-8");
        assert_eq!(result.row_count(), 2);
        assert_eq!(result.records[2], vec!["2", "Jane Smith"]);
    }
}
