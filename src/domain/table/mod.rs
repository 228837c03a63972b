// ============================================================
// TABLE DOMAIN LAYER
// ============================================================
// Core types for the in-memory table model
// No I/O, no async, no external collaborators

mod cell;
mod condition;
mod header;
mod load_options;
mod row;
#[allow(clippy::module_inception)]
mod table;

pub use cell::Cell;
pub use condition::{ColumnRef, Condition, FilterValue, Operator};
pub use header::build_header;
pub use load_options::LoadOptions;
pub use row::{adjust_row, Row, RowPatch};
pub use table::Table;
