// ============================================================
// ROWS AND ROW PATCHES
// ============================================================
// Row storage plus the input shapes accepted by mutations

use serde::{Deserialize, Serialize};

use super::cell::Cell;

/// One table row: exactly `column_count` cells, in column order.
pub type Row = Vec<Cell>;

/// Pad or truncate a row to the table's fixed column count.
///
/// Lossy but safe: short rows gain Empty cells on the right, long rows
/// lose their tail.
pub fn adjust_row(mut row: Row, column_count: usize) -> Row {
    if row.len() < column_count {
        row.resize(column_count, Cell::Empty);
    } else {
        row.truncate(column_count);
    }
    row
}

/// New-row / row-update data in one of three shapes.
///
/// `Named` and `Indexed` are partial: unnamed cells keep their previous
/// value on update and become Empty on add. `Positional` covers the row
/// left to right and is padded or truncated to the column count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RowPatch {
    Named(Vec<(String, Cell)>),
    Indexed(Vec<(usize, Cell)>),
    Positional(Vec<Cell>),
}

impl RowPatch {
    pub fn named<N, C>(entries: impl IntoIterator<Item = (N, C)>) -> Self
    where
        N: Into<String>,
        C: Into<Cell>,
    {
        RowPatch::Named(
            entries
                .into_iter()
                .map(|(name, cell)| (name.into(), cell.into()))
                .collect(),
        )
    }

    pub fn indexed<C: Into<Cell>>(entries: impl IntoIterator<Item = (usize, C)>) -> Self {
        RowPatch::Indexed(
            entries
                .into_iter()
                .map(|(index, cell)| (index, cell.into()))
                .collect(),
        )
    }

    pub fn positional<C: Into<Cell>>(cells: impl IntoIterator<Item = C>) -> Self {
        RowPatch::Positional(cells.into_iter().map(Into::into).collect())
    }

    /// Run raw string values through the type caster, keeping every other
    /// cell as given. Sessions apply this when `auto_cast` is on; with it
    /// off, incoming strings stay strings like every loaded cell.
    pub fn cast(self) -> Self {
        fn recast(cell: Cell) -> Cell {
            match cell {
                Cell::Str(s) => Cell::cast(&s),
                other => other,
            }
        }
        match self {
            RowPatch::Named(entries) => RowPatch::Named(
                entries
                    .into_iter()
                    .map(|(name, cell)| (name, recast(cell)))
                    .collect(),
            ),
            RowPatch::Indexed(entries) => RowPatch::Indexed(
                entries
                    .into_iter()
                    .map(|(index, cell)| (index, recast(cell)))
                    .collect(),
            ),
            RowPatch::Positional(cells) => {
                RowPatch::Positional(cells.into_iter().map(recast).collect())
            }
        }
    }
}

impl From<Vec<Cell>> for RowPatch {
    fn from(cells: Vec<Cell>) -> Self {
        RowPatch::Positional(cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjust_pads_and_truncates() {
        let short = vec![Cell::Int(1)];
        assert_eq!(
            adjust_row(short, 3),
            vec![Cell::Int(1), Cell::Empty, Cell::Empty]
        );

        let long = vec![Cell::Int(1), Cell::Int(2), Cell::Int(3), Cell::Int(4)];
        assert_eq!(
            adjust_row(long, 3),
            vec![Cell::Int(1), Cell::Int(2), Cell::Int(3)]
        );
    }

    #[test]
    fn test_patch_constructors_keep_raw_strings() {
        // Constructors store strings verbatim; casting is a separate step
        let patch = RowPatch::named([("age", "26")]);
        assert_eq!(
            patch,
            RowPatch::Named(vec![("age".to_string(), Cell::Str("26".to_string()))])
        );
    }

    #[test]
    fn test_cast_types_raw_strings_only() {
        let patch = RowPatch::positional(["Bob", "40"]).cast();
        assert_eq!(
            patch,
            RowPatch::Positional(vec![Cell::Str("Bob".to_string()), Cell::Int(40)])
        );

        // Typed cells pass through untouched
        let patch = RowPatch::indexed([(0usize, Cell::Float(1.5))]).cast();
        assert_eq!(
            patch,
            RowPatch::Indexed(vec![(0usize, Cell::Float(1.5))])
        );
    }
}
