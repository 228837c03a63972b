// ============================================================
// TABLE MODEL
// ============================================================
// Owned in-memory table: header, rows, dual column addressing,
// filtering, and row-level mutation

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::cell::Cell;
use super::condition::{ColumnRef, Condition, FilterValue, Operator};
use super::row::{adjust_row, Row, RowPatch};
use crate::domain::error::{Result, TableError};

/// An addressable, mutable in-memory table.
///
/// The column count is fixed at construction; every row is kept exactly
/// that long. The delimiter and encoding detected at load time ride along
/// so persistence can preserve the source format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    header: Option<Vec<String>>,
    rows: Vec<Row>,
    column_count: usize,
    delimiter: u8,
    encoding: String,
}

impl Table {
    /// Build a table from an optional header and raw rows.
    ///
    /// The column count comes from the header when present, otherwise from
    /// the first row. Ragged rows are padded with Empty or truncated.
    pub fn new(header: Option<Vec<String>>, rows: Vec<Row>) -> Self {
        let column_count = match &header {
            Some(names) => names.len(),
            None => rows.first().map_or(0, Vec::len),
        };
        let rows = rows
            .into_iter()
            .map(|row| adjust_row(row, column_count))
            .collect();
        Self {
            header,
            rows,
            column_count,
            delimiter: b',',
            encoding: "utf-8".to_string(),
        }
    }

    /// Record the source format detected at load time.
    pub fn with_format(mut self, delimiter: u8, encoding: impl Into<String>) -> Self {
        self.delimiter = delimiter;
        self.encoding = encoding.into();
        self
    }

    pub fn header(&self) -> Option<&[String]> {
        self.header.as_deref()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Result<&Row> {
        self.check_row(index)?;
        Ok(&self.rows[index])
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    /// Resolve a name-or-index column reference to its position.
    ///
    /// Single resolution point used by every column-accepting operation.
    pub fn resolve_column(&self, column: &ColumnRef) -> Result<usize> {
        match column {
            ColumnRef::Name(name) => match &self.header {
                Some(names) => names
                    .iter()
                    .position(|n| n == name)
                    .ok_or_else(|| TableError::ColumnNotFound(name.clone())),
                None => Err(TableError::ColumnNotFound(format!(
                    "'{}' (table has no header)",
                    name
                ))),
            },
            ColumnRef::Index(index) => {
                if *index < self.column_count {
                    Ok(*index)
                } else {
                    Err(TableError::ColumnIndexOutOfRange {
                        index: *index,
                        columns: self.column_count,
                    })
                }
            }
        }
    }

    // ---------- Filtering ----------

    /// Keep rows where the predicate holds; the predicate sees each row with
    /// its original index. Returns a new independent table.
    pub fn filter_rows(&self, predicate: impl Fn(&Row, usize) -> bool) -> Table {
        let rows = self
            .rows
            .iter()
            .enumerate()
            .filter(|(i, row)| predicate(row, *i))
            .map(|(_, row)| row.clone())
            .collect();
        self.derived(rows)
    }

    /// Filter on one column with a named operator.
    pub fn filter_by_column(
        &self,
        column: impl Into<ColumnRef>,
        value: impl Into<FilterValue>,
        op: Operator,
    ) -> Result<Table> {
        self.filter_multiple(&[Condition::new(column, op, value)])
    }

    /// Logical AND across conditions, short-circuiting per row.
    pub fn filter_multiple(&self, conditions: &[Condition]) -> Result<Table> {
        // Resolve every column up front so addressing errors surface even
        // when no row would be evaluated
        let resolved: Vec<(usize, &Condition)> = conditions
            .iter()
            .map(|cond| Ok((self.resolve_column(&cond.column)?, cond)))
            .collect::<Result<_>>()?;
        Ok(self.filter_rows(|row, _| resolved.iter().all(|(pos, cond)| cond.matches(&row[*pos]))))
    }

    /// Keep rows whose cell at `column` is non-empty; with no column, keep
    /// rows that have at least one non-empty cell.
    pub fn filter_empty(&self, column: Option<ColumnRef>) -> Result<Table> {
        match column {
            Some(column) => {
                let pos = self.resolve_column(&column)?;
                Ok(self.filter_rows(|row, _| !row[pos].is_empty()))
            }
            None => Ok(self.filter_rows(|row, _| row.iter().any(|cell| !cell.is_empty()))),
        }
    }

    /// Like `filter_rows` but keeps provenance: returns (original index, row)
    /// pairs instead of a renumbered table.
    pub fn get_rows_with_indices(
        &self,
        predicate: impl Fn(&Row, usize) -> bool,
    ) -> Vec<(usize, Row)> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(i, row)| predicate(row, *i))
            .map(|(i, row)| (i, row.clone()))
            .collect()
    }

    // ---------- Mutation ----------

    /// Replace or partially update the row at `index`.
    pub fn update_row(&mut self, index: usize, patch: RowPatch) -> Result<()> {
        self.check_row(index)?;
        match patch {
            RowPatch::Positional(cells) => {
                self.rows[index] = adjust_row(cells, self.column_count);
            }
            patch => {
                let updates = self.resolve_patch(patch)?;
                for (pos, cell) in updates {
                    self.rows[index][pos] = cell;
                }
            }
        }
        Ok(())
    }

    /// Set a single cell.
    pub fn update_cell(
        &mut self,
        row_index: usize,
        column: impl Into<ColumnRef>,
        value: impl Into<Cell>,
    ) -> Result<()> {
        self.check_row(row_index)?;
        let pos = self.resolve_column(&column.into())?;
        self.rows[row_index][pos] = value.into();
        Ok(())
    }

    /// Append a row; columns missing from a partial patch become Empty.
    pub fn add_row(&mut self, patch: RowPatch) -> Result<()> {
        let row = match patch {
            RowPatch::Positional(cells) => adjust_row(cells, self.column_count),
            patch => {
                let mut row = vec![Cell::Empty; self.column_count];
                for (pos, cell) in self.resolve_patch(patch)? {
                    row[pos] = cell;
                }
                row
            }
        };
        self.rows.push(row);
        Ok(())
    }

    /// Remove the row at `index`; later rows shift down by one.
    pub fn delete_row(&mut self, index: usize) -> Result<()> {
        self.check_row(index)?;
        self.rows.remove(index);
        Ok(())
    }

    // ---------- Output ----------

    /// Rows as (column name -> cell) maps, in row order.
    ///
    /// Fails with ColumnNotFound on a headerless table: there are no names
    /// to key by.
    pub fn to_dicts(&self) -> Result<Vec<HashMap<String, Cell>>> {
        let names = self.header.as_ref().ok_or_else(|| {
            TableError::ColumnNotFound("table has no header, address rows directly".to_string())
        })?;
        Ok(self
            .rows
            .iter()
            .map(|row| {
                names
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect::<HashMap<_, _>>()
            })
            .collect())
    }

    // ---------- Internal ----------

    /// New table with the same header and format, different rows.
    fn derived(&self, rows: Vec<Row>) -> Table {
        Table {
            header: self.header.clone(),
            rows,
            column_count: self.column_count,
            delimiter: self.delimiter,
            encoding: self.encoding.clone(),
        }
    }

    fn check_row(&self, index: usize) -> Result<()> {
        if index < self.rows.len() {
            Ok(())
        } else {
            Err(TableError::RowIndexOutOfRange {
                index,
                rows: self.rows.len(),
            })
        }
    }

    /// Resolve a partial patch to (position, cell) pairs, surfacing
    /// addressing errors before any cell is written.
    fn resolve_patch(&self, patch: RowPatch) -> Result<Vec<(usize, Cell)>> {
        match patch {
            RowPatch::Named(entries) => entries
                .into_iter()
                .map(|(name, cell)| Ok((self.resolve_column(&ColumnRef::Name(name))?, cell)))
                .collect(),
            RowPatch::Indexed(entries) => entries
                .into_iter()
                .map(|(index, cell)| Ok((self.resolve_column(&ColumnRef::Index(index))?, cell)))
                .collect(),
            RowPatch::Positional(_) => unreachable!("positional patches are handled by callers"),
        }
    }
}
