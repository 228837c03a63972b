// ============================================================
// TABLE SERIALIZATION
// ============================================================
// Table -> delimited text with minimal quoting

use csv::{QuoteStyle, WriterBuilder};

use crate::domain::error::{Result, TableError};
use crate::domain::table::Table;

use super::encoding;

/// Serialize a table to delimited text using its recorded delimiter.
///
/// Minimal quoting: a field is quoted only when it contains the delimiter,
/// a quote, or a newline; embedded quotes are doubled. The table itself is
/// never touched.
pub fn to_text(table: &Table) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .delimiter(table.delimiter())
        .quote_style(QuoteStyle::Necessary)
        .from_writer(Vec::new());

    if let Some(header) = table.header() {
        writer
            .write_record(header)
            .map_err(|e| TableError::IoError(format!("Failed to serialize header: {}", e)))?;
    }
    for row in table.rows() {
        writer
            .write_record(row.iter().map(ToString::to_string))
            .map_err(|e| TableError::IoError(format!("Failed to serialize row: {}", e)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| TableError::IoError(format!("Failed to flush serialized table: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| TableError::IoError(format!("Serialized table is not UTF-8: {}", e)))
}

/// Serialize and re-encode under the table's recorded source encoding.
pub fn to_bytes(table: &Table) -> Result<Vec<u8>> {
    let text = to_text(table)?;
    Ok(encoding::encode(&text, table.encoding()))
}
