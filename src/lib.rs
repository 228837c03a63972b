//! Delimited text files as addressable, mutable in-memory tables.
//!
//! The crate infers a file's encoding and delimiter, parses it into a
//! typed [`Table`], and supports filtering, row-level mutation, and
//! format-preserving write-back:
//!
//! ```no_run
//! use flatfile::{CsvSession, LoadOptions, LocalFileStorage, Operator, RowPatch};
//!
//! # fn main() -> flatfile::Result<()> {
//! let mut session = CsvSession::load(
//!     LocalFileStorage::new(),
//!     "people.csv",
//!     LoadOptions::default(),
//! )?;
//!
//! let adults = session.table().filter_by_column("age", 18i64, Operator::Ge)?;
//! println!("{} adults", adults.len());
//!
//! session.update_row_and_save(0, RowPatch::named([("age", 26i64)]), None)?;
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::CsvSession;
pub use domain::error::{Result, TableError};
pub use domain::table::{
    Cell, ColumnRef, Condition, FilterValue, LoadOptions, Operator, Row, RowPatch, Table,
};
pub use infrastructure::storage::{FileStorage, LocalFileStorage};
