//! Scan code table parsing.
//!
//! The table is a CSV file whose first row is a header and whose data rows
//! hold three fields:
//!
//! ```text
//! codes,name,char
//! 0x1E,A pressed,a
//! 0x2B,\ pressed,\
//! 0xE0 0x1C,keypad enter pressed,
//! ```
//!
//! `codes` is a whitespace-separated list of scan code tokens. Only rows with
//! exactly one token reach the [`KeyMap`]; chorded rows are skipped. Rows with
//! a non-empty `char` also populate the [`CharMap`].

use crate::keymap::{normalize, CharMap, KeyIdentifier, KeyMap};
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use tracing::debug;

/// Number of fields every data row must carry.
const FIELDS_PER_ROW: usize = 3;

/// One data row of the scan code table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanCodeRow {
    /// Scan code tokens, split on whitespace
    pub codes: Vec<String>,
    /// Free-text key name
    pub raw_name: String,
    /// Character the key produces, empty if none
    pub literal_char: String,
}

impl ScanCodeRow {
    /// Builds a row from the three raw CSV fields.
    pub fn from_fields(
        codes: &str,
        raw_name: impl Into<String>,
        literal_char: impl Into<String>,
    ) -> Self {
        Self {
            codes: codes.split_whitespace().map(str::to_string).collect(),
            raw_name: raw_name.into(),
            literal_char: literal_char.into(),
        }
    }

    /// Returns the scan code if the row carries exactly one.
    #[must_use]
    pub fn single_code(&self) -> Option<&str> {
        match self.codes.as_slice() {
            [code] => Some(code),
            _ => None,
        }
    }
}

/// A non-fatal observation made while building the maps.
///
/// Warnings never change the generated output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// A later row reused a scan code and replaced its identifier
    DuplicateCode {
        /// Scan code text
        code: String,
        /// Identifier that was replaced
        previous: KeyIdentifier,
        /// Identifier now mapped
        replacement: KeyIdentifier,
    },
    /// Two different scan codes normalized to the same identifier
    DuplicateIdentifier {
        /// Shared identifier
        identifier: KeyIdentifier,
        /// Code that produced it first
        first_code: String,
        /// Code that produced it again
        code: String,
    },
    /// The name normalized to nothing but the prefix
    EmptyIdentifier {
        /// Scan code text
        code: String,
        /// Raw key name
        name: String,
    },
    /// The identifier contains characters outside `[A-Z0-9_]`
    InvalidIdentifier {
        /// Scan code text
        code: String,
        /// Offending identifier
        identifier: KeyIdentifier,
    },
}

impl Warning {
    /// Duplicate codes and identifiers.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(
            self,
            Self::DuplicateCode { .. } | Self::DuplicateIdentifier { .. }
        )
    }

    /// Empty or invalid identifiers.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        matches!(
            self,
            Self::EmptyIdentifier { .. } | Self::InvalidIdentifier { .. }
        )
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateCode {
                code,
                previous,
                replacement,
            } => write!(
                f,
                "scan code {code} appears more than once; {replacement} replaces {previous}"
            ),
            Self::DuplicateIdentifier {
                identifier,
                first_code,
                code,
            } => write!(
                f,
                "scan codes {first_code} and {code} both normalize to {identifier}"
            ),
            Self::EmptyIdentifier { code, name } => {
                write!(
                    f,
                    "name {name:?} for scan code {code} normalizes to an empty identifier"
                )
            }
            Self::InvalidIdentifier { code, identifier } => write!(
                f,
                "identifier {identifier} for scan code {code} is not a valid C identifier"
            ),
        }
    }
}

/// Diagnostics collected while building the maps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseReport {
    /// Data rows seen (header excluded)
    pub rows: usize,
    /// Rows dropped because they list several scan codes
    pub skipped_multi_code: usize,
    /// Rows dropped because the code field is blank
    pub skipped_empty: usize,
    /// Non-fatal observations
    pub warnings: Vec<Warning>,
}

impl ParseReport {
    /// Total rows that contributed nothing to either map.
    #[must_use]
    pub fn skipped_rows(&self) -> usize {
        self.skipped_multi_code + self.skipped_empty
    }
}

/// Reads the data rows of a scan code table.
///
/// The first record is the header and is discarded whatever it contains.
///
/// # Errors
///
/// Returns errors for:
/// - CSV syntax errors or invalid UTF-8
/// - An empty table (no header row)
/// - Blank lines, which count as rows with zero fields
/// - Data rows that do not have exactly three fields
pub fn read_rows<R: Read>(mut reader: R) -> Result<Vec<ScanCodeRow>> {
    let mut raw = Vec::new();
    reader
        .read_to_end(&mut raw)
        .context("Failed to read scan code table")?;

    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(raw.as_slice());

    let mut rows = Vec::new();
    let mut record = csv::StringRecord::new();
    let mut index: u64 = 0;
    loop {
        let more = csv_reader
            .read_record(&mut record)
            .context("Failed to read scan code table row")?;

        // The reader skips blank lines on its own; they still count as rows
        let line = match record.position() {
            Some(position) => {
                let (line, rest) = record_start(&raw, position);
                if matches!(rest.first(), Some(b'\r' | b'\n')) {
                    return Err(malformed_row(line, 0));
                }
                line
            }
            None => index + 1,
        };

        if !more {
            break;
        }
        index += 1;
        if index == 1 {
            continue;
        }

        if record.len() != FIELDS_PER_ROW {
            return Err(malformed_row(line, record.len()));
        }

        rows.push(ScanCodeRow::from_fields(&record[0], &record[1], &record[2]));
    }

    if index == 0 {
        anyhow::bail!("Scan code table is empty: expected a header row");
    }

    debug!("Read {} data rows", rows.len());
    Ok(rows)
}

/// Line number and remaining bytes where a record starts.
///
/// A CRLF terminator leaves its `\n` to the following record, so that byte
/// is stepped over first.
fn record_start<'a>(raw: &'a [u8], position: &csv::Position) -> (u64, &'a [u8]) {
    let start = usize::try_from(position.byte()).map_or(raw.len(), |byte| byte.min(raw.len()));
    let rest = &raw[start..];
    let after_cr = start
        .checked_sub(1)
        .and_then(|previous| raw.get(previous))
        .is_some_and(|&byte| byte == b'\r');

    match rest.split_first() {
        Some((b'\n', tail)) if after_cr => (position.line() + 1, tail),
        _ => (position.line(), rest),
    }
}

fn malformed_row(line: u64, found: usize) -> anyhow::Error {
    anyhow::anyhow!(
        "Malformed row at line {line}: expected {FIELDS_PER_ROW} fields \
         (codes, name, char), found {found}"
    )
}

/// Builds the key and character maps from data rows.
#[must_use]
pub fn parse(rows: &[ScanCodeRow]) -> (KeyMap, CharMap) {
    let (key_map, char_map, _) = parse_with_report(rows);
    (key_map, char_map)
}

/// Builds the key and character maps, collecting diagnostics on the way.
///
/// Later rows overwrite earlier ones that share a scan code (in the key map)
/// or an identifier (in the character map).
#[must_use]
pub fn parse_with_report(rows: &[ScanCodeRow]) -> (KeyMap, CharMap, ParseReport) {
    let mut key_map = KeyMap::new();
    let mut char_map = CharMap::new();
    let mut report = ParseReport {
        rows: rows.len(),
        ..ParseReport::default()
    };
    let mut first_code_for: HashMap<KeyIdentifier, String> = HashMap::new();

    for row in rows {
        let Some(code) = row.single_code() else {
            if row.codes.is_empty() {
                report.skipped_empty += 1;
            } else {
                debug!("Skipping chorded row {:?} ({})", row.codes, row.raw_name);
                report.skipped_multi_code += 1;
            }
            continue;
        };

        let identifier = normalize(&row.raw_name);

        if identifier.is_bare_prefix() {
            report.warnings.push(Warning::EmptyIdentifier {
                code: code.to_string(),
                name: row.raw_name.clone(),
            });
        } else if !identifier.is_valid_c_identifier() {
            report.warnings.push(Warning::InvalidIdentifier {
                code: code.to_string(),
                identifier: identifier.clone(),
            });
        }

        match first_code_for.entry(identifier.clone()) {
            Entry::Occupied(entry) if entry.get() != code => {
                report.warnings.push(Warning::DuplicateIdentifier {
                    identifier: identifier.clone(),
                    first_code: entry.get().clone(),
                    code: code.to_string(),
                });
            }
            Entry::Occupied(_) => {}
            Entry::Vacant(entry) => {
                entry.insert(code.to_string());
            }
        }

        if let Some(previous) = key_map.insert(code, identifier.clone()) {
            report.warnings.push(Warning::DuplicateCode {
                code: code.to_string(),
                previous,
                replacement: identifier.clone(),
            });
        }

        if !row.literal_char.is_empty() {
            char_map.insert(identifier, row.literal_char.clone());
        }
    }

    debug!(
        "Built {} keycodes and {} characters ({} rows skipped)",
        key_map.len(),
        char_map.len(),
        report.skipped_rows()
    );

    (key_map, char_map, report)
}

/// Reads a whole table and builds both maps.
///
/// # Errors
///
/// Returns an error if any row is malformed; no partial maps are returned.
pub fn parse_table<R: Read>(reader: R) -> Result<(KeyMap, CharMap, ParseReport)> {
    let rows = read_rows(reader)?;
    Ok(parse_with_report(&rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(codes: &str, name: &str, literal: &str) -> ScanCodeRow {
        ScanCodeRow::from_fields(codes, name, literal)
    }

    #[test]
    fn test_read_rows_skips_header() {
        let table = "codes,name,char\n1,A,a\n";
        let rows = read_rows(table.as_bytes()).unwrap();

        assert_eq!(rows, vec![row("1", "A", "a")]);
    }

    #[test]
    fn test_read_rows_header_is_skipped_even_if_it_looks_like_data() {
        let table = "1,A,a\n2,B,b\n";
        let rows = read_rows(table.as_bytes()).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].raw_name, "B");
    }

    #[test]
    fn test_read_rows_header_shape_is_not_checked() {
        let table = "scan codes only\n1,A,a\n";
        let rows = read_rows(table.as_bytes()).unwrap();

        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_read_rows_rejects_wrong_field_count() {
        let table = "codes,name,char\n1,A,a\n2,B\n";
        let err = read_rows(table.as_bytes()).unwrap_err();

        let message = err.to_string();
        assert!(message.contains("line 3"), "unexpected message: {message}");
        assert!(message.contains("found 2"), "unexpected message: {message}");
    }

    #[test]
    fn test_read_rows_rejects_blank_data_line() {
        let table = "codes,name,char\n1,A,a\n\n2,B,b\n";
        let err = read_rows(table.as_bytes()).unwrap_err();

        let message = err.to_string();
        assert!(message.contains("line 3"), "unexpected message: {message}");
        assert!(message.contains("found 0"), "unexpected message: {message}");
    }

    #[test]
    fn test_read_rows_rejects_leading_blank_line() {
        let table = "\ncodes,name,char\n1,A,a\n";
        let err = read_rows(table.as_bytes()).unwrap_err();

        let message = err.to_string();
        assert!(message.contains("line 1"), "unexpected message: {message}");
        assert!(message.contains("found 0"), "unexpected message: {message}");
    }

    #[test]
    fn test_read_rows_rejects_trailing_blank_line() {
        let table = "codes,name,char\n1,A,a\n\n";
        let err = read_rows(table.as_bytes()).unwrap_err();

        assert!(err.to_string().contains("line 3"), "unexpected message: {err}");
    }

    #[test]
    fn test_read_rows_rejects_empty_table() {
        let err = read_rows("".as_bytes()).unwrap_err();

        assert!(err.to_string().contains("empty"), "unexpected message: {err}");
    }

    #[test]
    fn test_read_rows_header_only_has_no_rows() {
        let rows = read_rows("codes,name,char\n".as_bytes()).unwrap();

        assert!(rows.is_empty());
    }

    #[test]
    fn test_read_rows_accepts_crlf_and_missing_final_newline() {
        let table = "codes,name,char\r\n1,A,a\r\n2,B,b";
        let rows = read_rows(table.as_bytes()).unwrap();

        assert_eq!(rows, vec![row("1", "A", "a"), row("2", "B", "b")]);
    }

    #[test]
    fn test_read_rows_crlf_errors_name_the_right_line() {
        let table = "codes,name,char\r\n1,A,a\r\n\r\n2,B,b\r\n";
        let err = read_rows(table.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 3"), "unexpected message: {err}");

        let table = "codes,name,char\r\n1,A,a\r\n2,B\r\n";
        let err = read_rows(table.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 3"), "unexpected message: {err}");
    }

    #[test]
    fn test_read_rows_keeps_quoted_fields() {
        let table = "codes,name,char\n0x33,\", pressed\",\",\"\n0x28,' pressed,'\n";
        let rows = read_rows(table.as_bytes()).unwrap();

        assert_eq!(rows[0].raw_name, ", pressed");
        assert_eq!(rows[0].literal_char, ",");
        assert_eq!(rows[1].literal_char, "'");
    }

    #[test]
    fn test_parse_single_code_row() {
        let (keys, chars) = parse(&[row("1", "A", "a")]);

        assert_eq!(keys.get("1").map(KeyIdentifier::as_str), Some("KEYCODE_A"));
        assert_eq!(chars.get(&KeyIdentifier::new("KEYCODE_A")), Some("a"));
    }

    #[test]
    fn test_parse_drops_multi_code_rows_entirely() {
        let (keys, chars, report) =
            parse_with_report(&[row("1", "A", "a"), row("2 3", "Shift Combo", "x")]);

        assert_eq!(keys.len(), 1);
        assert_eq!(chars.len(), 1);
        assert!(!keys.contains_identifier(&KeyIdentifier::new("KEYCODE_SHIFT_COMBO")));
        assert_eq!(report.skipped_multi_code, 1);
    }

    #[test]
    fn test_parse_skips_blank_codes() {
        let (keys, _, report) = parse_with_report(&[row("   ", "Nothing", "")]);

        assert!(keys.is_empty());
        assert_eq!(report.skipped_empty, 1);
        assert_eq!(report.skipped_rows(), 1);
    }

    #[test]
    fn test_parse_empty_char_has_no_char_entry() {
        let (keys, chars) = parse(&[row("0x2A", "Left Shift", "")]);

        assert_eq!(keys.len(), 1);
        assert!(chars.is_empty());
    }

    #[test]
    fn test_parse_trims_code_whitespace() {
        let (keys, _) = parse(&[row(" 0x1E ", "A", "a")]);

        assert!(keys.get("0x1E").is_some());
    }

    #[test]
    fn test_duplicate_identifier_last_char_wins() {
        let (keys, chars, report) =
            parse_with_report(&[row("1", "Enter", "x"), row("2", "Enter (Keypad)", "y")]);

        assert_eq!(keys.len(), 2);
        assert_eq!(chars.get(&KeyIdentifier::new("KEYCODE_ENTER")), Some("y"));
        assert_eq!(
            report.warnings,
            vec![Warning::DuplicateIdentifier {
                identifier: KeyIdentifier::new("KEYCODE_ENTER"),
                first_code: "1".to_string(),
                code: "2".to_string(),
            }]
        );
    }

    #[test]
    fn test_duplicate_code_last_write_wins() {
        let (keys, chars, report) = parse_with_report(&[row("1", "A", "a"), row("1", "B", "")]);

        assert_eq!(keys.get("1").map(KeyIdentifier::as_str), Some("KEYCODE_B"));
        // The earlier character entry is keyed by identifier and survives
        assert_eq!(chars.get(&KeyIdentifier::new("KEYCODE_A")), Some("a"));
        assert!(report.warnings.iter().any(Warning::is_duplicate));
    }

    #[test]
    fn test_degenerate_identifiers_are_reported() {
        let (keys, _, report) = parse_with_report(&[row("1", "(note)", ""), row("2", "é", "")]);

        assert_eq!(keys.get("1").map(KeyIdentifier::as_str), Some("KEYCODE_"));
        assert_eq!(report.warnings.len(), 2);
        assert!(report.warnings.iter().all(Warning::is_degenerate));
    }

    #[test]
    fn test_warning_display() {
        let warning = Warning::DuplicateIdentifier {
            identifier: KeyIdentifier::new("KEYCODE_ENTER"),
            first_code: "0x1C".to_string(),
            code: "0x9C".to_string(),
        };
        assert_eq!(
            warning.to_string(),
            "scan codes 0x1C and 0x9C both normalize to KEYCODE_ENTER"
        );
    }
}
