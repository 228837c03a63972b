// ============================================================
// RAW ROW PARSING
// ============================================================
// Decoded text -> rows of raw string fields, quote-aware

use csv::ReaderBuilder;

use crate::domain::error::{Result, TableError};

/// Split decoded text into raw rows using a known delimiter.
///
/// Quoted fields may contain the delimiter, embedded newlines, and doubled
/// quotes as escaped literals. With `skip_empty`, rows whose every field
/// trims to nothing are dropped. Ragged rows are returned as-is; the table
/// layer pads or truncates them.
pub fn parse_rows(text: &str, delimiter: u8, skip_empty: bool) -> Result<Vec<Vec<String>>> {
    check_quotes(text, delimiter)?;

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record
            .map_err(|e| TableError::MalformedRow(format!("Failed to parse row: {}", e)))?;
        let row: Vec<String> = record.iter().map(str::to_string).collect();
        if skip_empty && row.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        rows.push(row);
    }
    Ok(rows)
}

#[derive(PartialEq)]
enum QuoteState {
    FieldStart,
    Unquoted,
    Quoted,
    QuoteInQuoted,
}

/// Reject input that ends inside an open quoted field.
///
/// The csv reader itself treats an unterminated quote as running to end of
/// input, which would silently swallow the rest of the file.
fn check_quotes(text: &str, delimiter: u8) -> Result<()> {
    use QuoteState::*;

    let delimiter = delimiter as char;
    let mut state = FieldStart;
    for c in text.chars() {
        state = match state {
            FieldStart => match c {
                '"' => Quoted,
                c if c == delimiter || c == '\n' || c == '\r' => FieldStart,
                _ => Unquoted,
            },
            Unquoted => {
                if c == delimiter || c == '\n' || c == '\r' {
                    FieldStart
                } else {
                    Unquoted
                }
            }
            Quoted => {
                if c == '"' {
                    QuoteInQuoted
                } else {
                    Quoted
                }
            }
            QuoteInQuoted => match c {
                '"' => Quoted,
                c if c == delimiter || c == '\n' || c == '\r' => FieldStart,
                _ => Unquoted,
            },
        };
    }
    if state == Quoted {
        return Err(TableError::MalformedRow(
            "unterminated quote at end of input".to_string(),
        ));
    }
    Ok(())
}
