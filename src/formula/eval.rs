//! Native evaluation of the engine's own formula trees.
//!
//! Only the node kinds [`FormulaExpr`] can express are supported, with the
//! coercions a spreadsheet applies to them: an empty cell reads as `0` in
//! arithmetic and as `""` in text comparisons, `SUM` skips text, division by
//! zero yields `#DIV/0!`. The evaluator computes cached results for written
//! formula cells and backs the formula/native equivalence tests.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

use super::cell::{CellRange, CellRef};
use super::expr::{CompareOp, FormulaExpr};

/// Spreadsheet error values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CellError {
    /// `#DIV/0!`
    DivByZero,
    /// `#VALUE!`
    Value,
    /// `#NUM!`
    Num,
    /// `#REF!`, also used for circular references.
    Ref,
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CellError::DivByZero => "#DIV/0!",
            CellError::Value => "#VALUE!",
            CellError::Num => "#NUM!",
            CellError::Ref => "#REF!",
        })
    }
}

/// The value held by, or computed for, one cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    /// A blank cell.
    Empty,
    /// A number (dates are day serials).
    Number(Decimal),
    /// Text.
    Text(String),
    /// A logical value.
    Bool(bool),
    /// An error value.
    Error(CellError),
}

impl CellValue {
    /// Text, or [`CellValue::Empty`] for an empty string.
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value)
        }
    }

    /// True for [`CellValue::Empty`] and for the empty string.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(text) => text.is_empty(),
            _ => false,
        }
    }

    /// The value as a spreadsheet would display it in a text context.
    pub fn display_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(value) => value.normalize().to_string(),
            CellValue::Text(text) => text.clone(),
            CellValue::Bool(true) => "TRUE".to_string(),
            CellValue::Bool(false) => "FALSE".to_string(),
            CellValue::Error(error) => error.to_string(),
        }
    }

    fn as_number(&self) -> Result<Decimal, CellError> {
        match self {
            CellValue::Empty => Ok(Decimal::ZERO),
            CellValue::Number(value) => Ok(*value),
            CellValue::Bool(value) => Ok(if *value { Decimal::ONE } else { Decimal::ZERO }),
            CellValue::Text(text) => text.trim().parse().map_err(|_| CellError::Value),
            CellValue::Error(error) => Err(*error),
        }
    }

    fn as_bool(&self) -> Result<bool, CellError> {
        match self {
            CellValue::Empty => Ok(false),
            CellValue::Number(value) => Ok(!value.is_zero()),
            CellValue::Bool(value) => Ok(*value),
            CellValue::Text(text) => match text.to_ascii_uppercase().as_str() {
                "TRUE" => Ok(true),
                "FALSE" => Ok(false),
                _ => Err(CellError::Value),
            },
            CellValue::Error(error) => Err(*error),
        }
    }
}

impl From<Decimal> for CellValue {
    fn from(value: Decimal) -> Self {
        CellValue::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::text(value)
    }
}

/// Supplies the current value of referenced cells.
pub trait CellResolver {
    /// The value of `cell`; unknown cells are [`CellValue::Empty`].
    fn resolve(&self, cell: &CellRef) -> CellValue;
}

impl CellResolver for HashMap<CellRef, CellValue> {
    fn resolve(&self, cell: &CellRef) -> CellValue {
        self.get(cell).cloned().unwrap_or(CellValue::Empty)
    }
}

impl FormulaExpr {
    /// Evaluates the expression against `cells`.
    ///
    /// # Example
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use grade_engine::formula::{CellRef, CellValue, FormulaExpr};
    /// use rust_decimal::Decimal;
    ///
    /// let l19 = CellRef::parse("L19").unwrap();
    /// let tenure = FormulaExpr::divide(FormulaExpr::cell(l19), FormulaExpr::number(360));
    ///
    /// let mut cells = HashMap::new();
    /// cells.insert(l19, CellValue::Number(Decimal::from(1440)));
    /// assert_eq!(tenure.evaluate(&cells), CellValue::Number(Decimal::from(4)));
    /// ```
    pub fn evaluate(&self, cells: &dyn CellResolver) -> CellValue {
        match self {
            FormulaExpr::Cell(cell) => cells.resolve(cell),
            FormulaExpr::Range(_) => CellValue::Error(CellError::Value),
            FormulaExpr::Number(value) => CellValue::Number(*value),
            FormulaExpr::Text(text) => CellValue::Text(text.clone()),
            FormulaExpr::Compare { op, lhs, rhs } => {
                compare(*op, &lhs.evaluate(cells), &rhs.evaluate(cells))
            }
            FormulaExpr::Subtract(lhs, rhs) => arithmetic(lhs, rhs, cells, |a, b| {
                a.checked_sub(b).ok_or(CellError::Num)
            }),
            FormulaExpr::Divide(lhs, rhs) => arithmetic(lhs, rhs, cells, |a, b| {
                if b.is_zero() {
                    Err(CellError::DivByZero)
                } else {
                    a.checked_div(b).ok_or(CellError::Num)
                }
            }),
            FormulaExpr::Concat(parts) => {
                let mut out = String::new();
                for part in parts {
                    match part.evaluate(cells) {
                        CellValue::Error(error) => return CellValue::Error(error),
                        value => out.push_str(&value.display_text()),
                    }
                }
                CellValue::Text(out)
            }
            FormulaExpr::If {
                condition,
                then,
                otherwise,
            } => match condition.evaluate(cells).as_bool() {
                Ok(true) => then.evaluate(cells),
                Ok(false) => otherwise.evaluate(cells),
                Err(error) => CellValue::Error(error),
            },
            FormulaExpr::And(terms) => {
                let mut all = true;
                for term in terms {
                    match term.evaluate(cells).as_bool() {
                        Ok(value) => all &= value,
                        Err(error) => return CellValue::Error(error),
                    }
                }
                CellValue::Bool(all)
            }
            FormulaExpr::Sum(args) => sum(args, cells),
        }
    }
}

fn arithmetic(
    lhs: &FormulaExpr,
    rhs: &FormulaExpr,
    cells: &dyn CellResolver,
    op: impl Fn(Decimal, Decimal) -> Result<Decimal, CellError>,
) -> CellValue {
    let result = lhs
        .evaluate(cells)
        .as_number()
        .and_then(|a| rhs.evaluate(cells).as_number().map(|b| (a, b)))
        .and_then(|(a, b)| op(a, b));
    match result {
        Ok(value) => CellValue::Number(value),
        Err(error) => CellValue::Error(error),
    }
}

fn sum(args: &[FormulaExpr], cells: &dyn CellResolver) -> CellValue {
    let mut total = Decimal::ZERO;
    for arg in args {
        let values: Vec<CellValue> = match arg {
            FormulaExpr::Range(range) => range_values(range, cells),
            FormulaExpr::Cell(cell) => vec![cells.resolve(cell)],
            other => match other.evaluate(cells).as_number() {
                Ok(value) => vec![CellValue::Number(value)],
                Err(error) => return CellValue::Error(error),
            },
        };
        for value in values {
            match value {
                CellValue::Number(n) => match total.checked_add(n) {
                    Some(next) => total = next,
                    None => return CellValue::Error(CellError::Num),
                },
                CellValue::Error(error) => return CellValue::Error(error),
                _ => {}
            }
        }
    }
    CellValue::Number(total)
}

fn range_values(range: &CellRange, cells: &dyn CellResolver) -> Vec<CellValue> {
    range.cells().map(|cell| cells.resolve(&cell)).collect()
}

/// Type rank used when comparing values of different kinds.
fn rank(value: &CellValue) -> u8 {
    match value {
        CellValue::Number(_) | CellValue::Empty => 0,
        CellValue::Text(_) => 1,
        CellValue::Bool(_) => 2,
        CellValue::Error(_) => 3,
    }
}

fn compare(op: CompareOp, lhs: &CellValue, rhs: &CellValue) -> CellValue {
    if let CellValue::Error(error) = lhs {
        return CellValue::Error(*error);
    }
    if let CellValue::Error(error) = rhs {
        return CellValue::Error(*error);
    }

    let ordering = match (lhs, rhs) {
        (CellValue::Empty, CellValue::Text(text)) => String::new().cmp(&text.to_lowercase()),
        (CellValue::Text(text), CellValue::Empty) => text.to_lowercase().cmp(&String::new()),
        (CellValue::Empty, CellValue::Bool(b)) => false.cmp(b),
        (CellValue::Bool(b), CellValue::Empty) => b.cmp(&false),
        (CellValue::Text(a), CellValue::Text(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
        (CellValue::Bool(a), CellValue::Bool(b)) => a.cmp(b),
        (a, b) if rank(a) == 0 && rank(b) == 0 => {
            let x = a.as_number().unwrap_or_default();
            let y = b.as_number().unwrap_or_default();
            x.cmp(&y)
        }
        (a, b) => rank(a).cmp(&rank(b)),
    };

    let holds = match op {
        CompareOp::Eq => ordering == Ordering::Equal,
        CompareOp::Ne => ordering != Ordering::Equal,
        CompareOp::Lt => ordering == Ordering::Less,
        CompareOp::Le => ordering != Ordering::Greater,
        CompareOp::Gt => ordering == Ordering::Greater,
        CompareOp::Ge => ordering != Ordering::Less,
    };
    CellValue::Bool(holds)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(a1: &str) -> CellRef {
        CellRef::parse(a1).unwrap()
    }

    fn num(value: i64) -> CellValue {
        CellValue::Number(Decimal::from(value))
    }

    #[test]
    fn test_empty_cell_compares_equal_to_empty_text() {
        let cells: HashMap<CellRef, CellValue> = HashMap::new();
        let expr = FormulaExpr::eq(FormulaExpr::cell(cell("A1")), FormulaExpr::empty_text());
        assert_eq!(expr.evaluate(&cells), CellValue::Bool(true));
        let filled = FormulaExpr::is_filled(cell("A1"));
        assert_eq!(filled.evaluate(&cells), CellValue::Bool(false));
    }

    #[test]
    fn test_empty_cell_is_zero_in_arithmetic() {
        let mut cells = HashMap::new();
        cells.insert(cell("B1"), num(10));
        let expr = FormulaExpr::subtract(FormulaExpr::cell(cell("B1")), FormulaExpr::cell(cell("A1")));
        assert_eq!(expr.evaluate(&cells), num(10));
    }

    #[test]
    fn test_text_comparison_is_case_insensitive() {
        let mut cells = HashMap::new();
        cells.insert(cell("J11"), CellValue::text("e"));
        let expr = FormulaExpr::eq(FormulaExpr::cell(cell("J11")), FormulaExpr::text("E"));
        assert_eq!(expr.evaluate(&cells), CellValue::Bool(true));
    }

    #[test]
    fn test_text_never_equals_number() {
        let mut cells = HashMap::new();
        cells.insert(cell("A1"), CellValue::text("16"));
        let expr = FormulaExpr::ge(FormulaExpr::cell(cell("A1")), FormulaExpr::number(16));
        // Text sorts after every number.
        assert_eq!(expr.evaluate(&cells), CellValue::Bool(true));
        let eq = FormulaExpr::eq(FormulaExpr::cell(cell("A1")), FormulaExpr::number(16));
        assert_eq!(eq.evaluate(&cells), CellValue::Bool(false));
    }

    #[test]
    fn test_sum_skips_text_and_empty() {
        let mut cells = HashMap::new();
        cells.insert(cell("K11"), num(100));
        cells.insert(cell("K12"), CellValue::text(""));
        cells.insert(cell("K13"), CellValue::text("x"));
        cells.insert(cell("K14"), num(20));
        let expr = FormulaExpr::sum(CellRange::column(10, 11, 18));
        assert_eq!(expr.evaluate(&cells), num(120));
    }

    #[test]
    fn test_sum_propagates_errors() {
        let mut cells = HashMap::new();
        cells.insert(cell("K11"), CellValue::Error(CellError::Value));
        let expr = FormulaExpr::sum(CellRange::column(10, 11, 18));
        assert_eq!(expr.evaluate(&cells), CellValue::Error(CellError::Value));
    }

    #[test]
    fn test_division_by_zero() {
        let cells: HashMap<CellRef, CellValue> = HashMap::new();
        let expr = FormulaExpr::divide(FormulaExpr::number(1), FormulaExpr::cell(cell("A1")));
        assert_eq!(expr.evaluate(&cells), CellValue::Error(CellError::DivByZero));
        assert_eq!(CellValue::Error(CellError::DivByZero).display_text(), "#DIV/0!");
    }

    #[test]
    fn test_text_in_arithmetic_is_a_value_error() {
        let mut cells = HashMap::new();
        cells.insert(cell("A1"), CellValue::text("abc"));
        let expr = FormulaExpr::subtract(FormulaExpr::cell(cell("A1")), FormulaExpr::number(1));
        assert_eq!(expr.evaluate(&cells), CellValue::Error(CellError::Value));
    }

    #[test]
    fn test_if_evaluates_only_the_taken_branch() {
        let cells: HashMap<CellRef, CellValue> = HashMap::new();
        let expr = FormulaExpr::if_then_else(
            FormulaExpr::is_filled(cell("A1")),
            FormulaExpr::divide(FormulaExpr::number(1), FormulaExpr::number(0)),
            FormulaExpr::empty_text(),
        );
        assert!(expr.evaluate(&cells).is_blank());
    }

    #[test]
    fn test_text_condition_is_a_value_error() {
        let expr = FormulaExpr::if_then_else(
            FormulaExpr::text("maybe"),
            FormulaExpr::number(1),
            FormulaExpr::number(2),
        );
        let cells: HashMap<CellRef, CellValue> = HashMap::new();
        assert_eq!(expr.evaluate(&cells), CellValue::Error(CellError::Value));
    }

    #[test]
    fn test_concat_displays_numbers_normalized() {
        let mut cells = HashMap::new();
        cells.insert(cell("Z2"), CellValue::text("A/AG-5"));
        cells.insert(cell("Z3"), CellValue::Number(Decimal::new(400, 2)));
        let expr = FormulaExpr::concat(vec![
            FormulaExpr::cell(cell("Z2")),
            FormulaExpr::text("/"),
            FormulaExpr::cell(cell("Z3")),
        ]);
        assert_eq!(expr.evaluate(&cells), CellValue::Text("A/AG-5/4".to_string()));
    }

    #[test]
    fn test_bare_range_is_a_value_error() {
        let cells: HashMap<CellRef, CellValue> = HashMap::new();
        let expr = FormulaExpr::Range(CellRange::column(0, 1, 2));
        assert_eq!(expr.evaluate(&cells), CellValue::Error(CellError::Value));
    }
}
