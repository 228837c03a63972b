// ============================================================
// FILTER CONDITIONS
// ============================================================
// Column references, comparison operators, and condition tuples

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::cell::Cell;
use crate::domain::error::TableError;

/// A column addressed either by header name or by zero-based index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnRef {
    Name(String),
    Index(usize),
}

impl From<&str> for ColumnRef {
    fn from(name: &str) -> Self {
        ColumnRef::Name(name.to_string())
    }
}

impl From<String> for ColumnRef {
    fn from(name: String) -> Self {
        ColumnRef::Name(name)
    }
}

impl From<usize> for ColumnRef {
    fn from(index: usize) -> Self {
        ColumnRef::Index(index)
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRef::Name(name) => write!(f, "{}", name),
            ColumnRef::Index(index) => write!(f, "#{}", index),
        }
    }
}

/// Comparison operator applied between a cell and a condition value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
    In,
    NotIn,
    Contains,
    StartsWith,
    EndsWith,
}

impl FromStr for Operator {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "==" | "eq" => Ok(Operator::Eq),
            "!=" | "ne" => Ok(Operator::Ne),
            ">" | "gt" => Ok(Operator::Gt),
            "<" | "lt" => Ok(Operator::Lt),
            ">=" | "ge" => Ok(Operator::Ge),
            "<=" | "le" => Ok(Operator::Le),
            "in" => Ok(Operator::In),
            "not in" | "not_in" => Ok(Operator::NotIn),
            "contains" => Ok(Operator::Contains),
            "startswith" | "starts_with" => Ok(Operator::StartsWith),
            "endswith" | "ends_with" => Ok(Operator::EndsWith),
            other => Err(TableError::ValidationError(format!(
                "Unsupported operator '{}'",
                other
            ))),
        }
    }
}

/// Comparison value: one cell, or a list for `In`/`NotIn` membership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    One(Cell),
    Many(Vec<Cell>),
}

impl FilterValue {
    fn members(&self) -> &[Cell] {
        match self {
            FilterValue::One(cell) => std::slice::from_ref(cell),
            FilterValue::Many(cells) => cells,
        }
    }
}

impl From<Cell> for FilterValue {
    fn from(cell: Cell) -> Self {
        FilterValue::One(cell)
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        FilterValue::One(Cell::Int(n))
    }
}

impl From<f64> for FilterValue {
    fn from(x: f64) -> Self {
        FilterValue::One(Cell::Float(x))
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        FilterValue::One(Cell::Bool(b))
    }
}

// Verbatim, like `Cell::from`; comparisons coerce string values to the
// cell's type at match time
impl From<&str> for FilterValue {
    fn from(raw: &str) -> Self {
        FilterValue::One(Cell::from(raw))
    }
}

impl From<Vec<Cell>> for FilterValue {
    fn from(cells: Vec<Cell>) -> Self {
        FilterValue::Many(cells)
    }
}

/// One (column, operator, value) filter clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub column: ColumnRef,
    pub op: Operator,
    pub value: FilterValue,
}

impl Condition {
    pub fn new(
        column: impl Into<ColumnRef>,
        op: Operator,
        value: impl Into<FilterValue>,
    ) -> Self {
        Self {
            column: column.into(),
            op,
            value: value.into(),
        }
    }

    /// Evaluate this condition's operator against a single cell.
    pub fn matches(&self, cell: &Cell) -> bool {
        match self.op {
            Operator::Eq => self.single(|ord| ord == Some(Ordering::Equal), cell),
            Operator::Ne => self.single(|ord| ord != Some(Ordering::Equal), cell),
            Operator::Gt => self.single(|ord| ord == Some(Ordering::Greater), cell),
            Operator::Lt => self.single(|ord| ord == Some(Ordering::Less), cell),
            Operator::Ge => self.single(
                |ord| matches!(ord, Some(Ordering::Greater) | Some(Ordering::Equal)),
                cell,
            ),
            Operator::Le => self.single(
                |ord| matches!(ord, Some(Ordering::Less) | Some(Ordering::Equal)),
                cell,
            ),
            // A scalar value degenerates to a one-element membership list
            Operator::In => self.value.members().iter().any(|v| cell.loose_eq(v)),
            Operator::NotIn => !self.value.members().iter().any(|v| cell.loose_eq(v)),
            Operator::Contains => self
                .first_value_string()
                .map_or(false, |needle| cell.to_string().contains(&needle)),
            Operator::StartsWith => self
                .first_value_string()
                .map_or(false, |prefix| cell.to_string().starts_with(&prefix)),
            Operator::EndsWith => self
                .first_value_string()
                .map_or(false, |suffix| cell.to_string().ends_with(&suffix)),
        }
    }

    fn single(&self, check: impl Fn(Option<Ordering>) -> bool, cell: &Cell) -> bool {
        match self.value.members().first() {
            Some(value) => check(cell.compare(value)),
            None => false,
        }
    }

    fn first_value_string(&self) -> Option<String> {
        self.value.members().first().map(Cell::to_string)
    }
}
