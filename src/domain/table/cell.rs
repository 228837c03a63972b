// ============================================================
// CELL VALUES
// ============================================================
// Typed cell values and the casting rules that produce them

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A single typed value at a (row, column) position.
///
/// Closed union: every comparison below is total over these five variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Empty,
}

impl Cell {
    /// Cast a raw string into a typed cell.
    ///
    /// Rules, in order: empty -> Empty, "true"/"false" (any case) -> Bool,
    /// integer grammar -> Int, float grammar -> Float, anything else -> Str.
    /// Values with leading zeros ("007", zip codes) stay Str so identifiers
    /// survive the cast; this is a heuristic, not a guarantee.
    pub fn cast(raw: &str) -> Cell {
        let v = raw.trim();
        if v.is_empty() {
            return Cell::Empty;
        }
        if v.eq_ignore_ascii_case("true") {
            return Cell::Bool(true);
        }
        if v.eq_ignore_ascii_case("false") {
            return Cell::Bool(false);
        }
        if is_int_grammar(v) && !has_leading_zeros(v) {
            if let Ok(n) = v.parse::<i64>() {
                return Cell::Int(n);
            }
            // Digits-only but past i64 range: degrade to float
            if let Ok(f) = v.parse::<f64>() {
                return Cell::Float(f);
            }
        }
        if is_float_grammar(v) && !has_leading_zeros(v) {
            if let Ok(f) = v.parse::<f64>() {
                return Cell::Float(f);
            }
        }
        Cell::Str(v.to_string())
    }

    /// True for Empty and for whitespace-only strings (uncast input).
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Str(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Compare against a comparison value, coercing the value to this cell's
    /// type when possible and falling back to string comparison otherwise.
    ///
    /// Int/Float pairs compare numerically. Empty is equal only to Empty and
    /// unordered against everything else, so ordering filters never match it.
    pub fn compare(&self, value: &Cell) -> Option<Ordering> {
        match (self, value) {
            (Cell::Empty, Cell::Empty) => Some(Ordering::Equal),
            (Cell::Empty, _) | (_, Cell::Empty) => None,
            (Cell::Int(a), Cell::Int(b)) => Some(a.cmp(b)),
            (Cell::Int(a), Cell::Float(b)) => (*a as f64).partial_cmp(b),
            (Cell::Float(a), Cell::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Cell::Float(a), Cell::Float(b)) => a.partial_cmp(b),
            (Cell::Bool(a), Cell::Bool(b)) => Some(a.cmp(b)),
            (Cell::Str(a), Cell::Str(b)) => Some(a.as_str().cmp(b.as_str())),
            (Cell::Int(a), Cell::Str(s)) => match s.trim().parse::<i64>() {
                Ok(b) => Some(a.cmp(&b)),
                Err(_) => Some(self.to_string().cmp(&s.to_string())),
            },
            (Cell::Float(a), Cell::Str(s)) => match s.trim().parse::<f64>() {
                Ok(b) => a.partial_cmp(&b),
                Err(_) => Some(self.to_string().cmp(&s.to_string())),
            },
            (Cell::Bool(a), Cell::Str(s)) => {
                let t = s.trim();
                if t.eq_ignore_ascii_case("true") {
                    Some(a.cmp(&true))
                } else if t.eq_ignore_ascii_case("false") {
                    Some(a.cmp(&false))
                } else {
                    Some(self.to_string().cmp(&s.to_string()))
                }
            }
            // Remaining mixed pairs (Str vs number, Bool vs number, ...)
            (a, b) => Some(a.to_string().cmp(&b.to_string())),
        }
    }

    /// Equality under the same coercion as `compare`.
    pub fn loose_eq(&self, value: &Cell) -> bool {
        self.compare(value) == Some(Ordering::Equal)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Int(n) => write!(f, "{}", n),
            Cell::Float(x) => write!(f, "{}", x),
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::Str(s) => write!(f, "{}", s),
            Cell::Empty => Ok(()),
        }
    }
}

impl From<i64> for Cell {
    fn from(n: i64) -> Self {
        Cell::Int(n)
    }
}

impl From<f64> for Cell {
    fn from(x: f64) -> Self {
        Cell::Float(x)
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Bool(b)
    }
}

// Conversions store strings verbatim; typed conversion is an explicit
// `Cell::cast` so callers control when the caster runs.
impl From<&str> for Cell {
    fn from(raw: &str) -> Self {
        Cell::Str(raw.to_string())
    }
}

impl From<String> for Cell {
    fn from(raw: String) -> Self {
        Cell::Str(raw)
    }
}

/// Optional sign followed by one or more ASCII digits, nothing else.
fn is_int_grammar(v: &str) -> bool {
    let digits = v.strip_prefix(['+', '-']).unwrap_or(v);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Optional sign, digits with a single decimal point, optional exponent.
/// Requires a point or an exponent so the integer grammar keeps priority,
/// and at least one digit in the mantissa. Word forms like "inf"/"nan"
/// deliberately do not match.
fn is_float_grammar(v: &str) -> bool {
    let body = v.strip_prefix(['+', '-']).unwrap_or(v);
    let (mantissa, exponent) = match body.split_once(['e', 'E']) {
        Some((m, e)) => (m, Some(e)),
        None => (body, None),
    };
    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (mantissa, None),
    };
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int_part) || int_part.is_empty() && frac_part.map_or(true, str::is_empty) {
        return false;
    }
    if let Some(frac) = frac_part {
        if !all_digits(frac) || frac.contains('.') {
            return false;
        }
    }
    if frac_part.is_none() && exponent.is_none() {
        return false;
    }
    match exponent {
        Some(e) => {
            let digits = e.strip_prefix(['+', '-']).unwrap_or(e);
            !digits.is_empty() && all_digits(digits)
        }
        None => true,
    }
}

/// "007" or "-012.5": more than one digit in the integer part, starting
/// with zero. "0", "0.5" and "-0.5" are fine.
fn has_leading_zeros(v: &str) -> bool {
    let body = v.strip_prefix(['+', '-']).unwrap_or(v);
    let int_part = body.split(['.', 'e', 'E']).next().unwrap_or(body);
    int_part.len() > 1 && int_part.starts_with('0')
}
