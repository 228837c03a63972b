use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TableError {
    /// Source path missing when reading through the file storage collaborator.
    FileNotFound(String),
    /// Column name not present in the header, or the table has no header.
    ColumnNotFound(String),
    /// Column index addressed past the table's fixed column count.
    ColumnIndexOutOfRange { index: usize, columns: usize },
    /// Row index addressed past the current row count.
    RowIndexOutOfRange { index: usize, rows: usize },
    /// Unterminated quote at end of input.
    MalformedRow(String),
    /// Load options rejected by validation.
    ValidationError(String),
    /// Write failure when persisting through the file storage collaborator.
    IoError(String),
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::FileNotFound(path) => write!(f, "File not found: {}", path),
            TableError::ColumnNotFound(name) => write!(f, "Column not found: {}", name),
            TableError::ColumnIndexOutOfRange { index, columns } => {
                write!(f, "Column index {} out of range ({} columns)", index, columns)
            }
            TableError::RowIndexOutOfRange { index, rows } => {
                write!(f, "Row index {} out of range ({} rows)", index, rows)
            }
            TableError::MalformedRow(msg) => write!(f, "Malformed row: {}", msg),
            TableError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            TableError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for TableError {}

impl From<std::io::Error> for TableError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            TableError::FileNotFound(err.to_string())
        } else {
            TableError::IoError(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, TableError>;
