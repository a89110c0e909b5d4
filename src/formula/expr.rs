//! Formula expression trees.
//!
//! Every formula the engine emits is built as a [`FormulaExpr`] first and
//! only turned into text by [`FormulaExpr::render`] with a dialect. Keeping
//! the tree around lets the same formula be rendered in several dialects and
//! evaluated natively.

use std::fmt;

use rust_decimal::Decimal;

use super::cell::{CellRange, CellRef};
use super::dialect::{FormulaDialect, OoxmlDialect};

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `=`
    Eq,
    /// `<>`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl CompareOp {
    /// The operator as written in a formula.
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "<>",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }
}

/// A spreadsheet formula as a tree.
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaExpr {
    /// A single cell reference.
    Cell(CellRef),
    /// A range reference; only meaningful as a `SUM` argument.
    Range(CellRange),
    /// A numeric literal.
    Number(Decimal),
    /// A string literal.
    Text(String),
    /// A binary comparison.
    Compare {
        /// The operator.
        op: CompareOp,
        /// Left operand.
        lhs: Box<FormulaExpr>,
        /// Right operand.
        rhs: Box<FormulaExpr>,
    },
    /// `lhs - rhs`.
    Subtract(Box<FormulaExpr>, Box<FormulaExpr>),
    /// `lhs / rhs`.
    Divide(Box<FormulaExpr>, Box<FormulaExpr>),
    /// String concatenation with `&`.
    Concat(Vec<FormulaExpr>),
    /// `IF(condition, then, otherwise)`.
    If {
        /// The tested condition.
        condition: Box<FormulaExpr>,
        /// Value when the condition holds.
        then: Box<FormulaExpr>,
        /// Value otherwise.
        otherwise: Box<FormulaExpr>,
    },
    /// `AND(...)`.
    And(Vec<FormulaExpr>),
    /// `SUM(...)`.
    Sum(Vec<FormulaExpr>),
}

const PREC_COMPARE: u8 = 1;
const PREC_CONCAT: u8 = 2;
const PREC_ADDITIVE: u8 = 3;
const PREC_MULTIPLICATIVE: u8 = 4;
const PREC_ATOM: u8 = 9;

impl FormulaExpr {
    /// A cell reference.
    pub fn cell(cell: CellRef) -> Self {
        FormulaExpr::Cell(cell)
    }

    /// A numeric literal.
    pub fn number(value: impl Into<Decimal>) -> Self {
        FormulaExpr::Number(value.into())
    }

    /// A string literal.
    pub fn text(value: impl Into<String>) -> Self {
        FormulaExpr::Text(value.into())
    }

    /// The empty string literal `""`, the formula stand-in for "no value".
    pub fn empty_text() -> Self {
        FormulaExpr::Text(String::new())
    }

    /// A comparison.
    pub fn compare(op: CompareOp, lhs: FormulaExpr, rhs: FormulaExpr) -> Self {
        FormulaExpr::Compare {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// `lhs = rhs`.
    pub fn eq(lhs: FormulaExpr, rhs: FormulaExpr) -> Self {
        Self::compare(CompareOp::Eq, lhs, rhs)
    }

    /// `lhs <> rhs`.
    pub fn ne(lhs: FormulaExpr, rhs: FormulaExpr) -> Self {
        Self::compare(CompareOp::Ne, lhs, rhs)
    }

    /// `lhs >= rhs`.
    pub fn ge(lhs: FormulaExpr, rhs: FormulaExpr) -> Self {
        Self::compare(CompareOp::Ge, lhs, rhs)
    }

    /// `lhs < rhs`.
    pub fn lt(lhs: FormulaExpr, rhs: FormulaExpr) -> Self {
        Self::compare(CompareOp::Lt, lhs, rhs)
    }

    /// `cell <> ""`.
    pub fn is_filled(cell: CellRef) -> Self {
        Self::ne(Self::cell(cell), Self::empty_text())
    }

    /// `lhs - rhs`.
    pub fn subtract(lhs: FormulaExpr, rhs: FormulaExpr) -> Self {
        FormulaExpr::Subtract(Box::new(lhs), Box::new(rhs))
    }

    /// `lhs / rhs`.
    pub fn divide(lhs: FormulaExpr, rhs: FormulaExpr) -> Self {
        FormulaExpr::Divide(Box::new(lhs), Box::new(rhs))
    }

    /// `a & b & ...`.
    pub fn concat(parts: Vec<FormulaExpr>) -> Self {
        FormulaExpr::Concat(parts)
    }

    /// `IF(condition, then, otherwise)`.
    pub fn if_then_else(condition: FormulaExpr, then: FormulaExpr, otherwise: FormulaExpr) -> Self {
        FormulaExpr::If {
            condition: Box::new(condition),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        }
    }

    /// `AND(terms...)`.
    pub fn and(terms: Vec<FormulaExpr>) -> Self {
        FormulaExpr::And(terms)
    }

    /// `SUM(range)`.
    pub fn sum(range: CellRange) -> Self {
        FormulaExpr::Sum(vec![FormulaExpr::Range(range)])
    }

    /// Renders the expression without the leading `=`.
    pub fn render(&self, dialect: &dyn FormulaDialect) -> String {
        match self {
            FormulaExpr::Cell(cell) => dialect.emit_cell_ref(cell),
            FormulaExpr::Range(range) => dialect.emit_range_ref(range),
            FormulaExpr::Number(value) => dialect.emit_number(*value),
            FormulaExpr::Text(value) => dialect.emit_text(value),
            FormulaExpr::Compare { op, lhs, rhs } => format!(
                "{}{}{}",
                lhs.render_operand(dialect, PREC_COMPARE, false),
                op.symbol(),
                rhs.render_operand(dialect, PREC_COMPARE, true)
            ),
            FormulaExpr::Subtract(lhs, rhs) => format!(
                "{}-{}",
                lhs.render_operand(dialect, PREC_ADDITIVE, false),
                rhs.render_operand(dialect, PREC_ADDITIVE, true)
            ),
            FormulaExpr::Divide(lhs, rhs) => format!(
                "{}/{}",
                lhs.render_operand(dialect, PREC_MULTIPLICATIVE, false),
                rhs.render_operand(dialect, PREC_MULTIPLICATIVE, true)
            ),
            FormulaExpr::Concat(parts) => parts
                .iter()
                .enumerate()
                .map(|(i, part)| part.render_operand(dialect, PREC_CONCAT, i > 0))
                .collect::<Vec<_>>()
                .join(" & "),
            FormulaExpr::If {
                condition,
                then,
                otherwise,
            } => dialect.emit_conditional(
                &condition.render(dialect),
                &then.render(dialect),
                &otherwise.render(dialect),
            ),
            FormulaExpr::And(terms) => dialect.emit_and(&render_all(terms, dialect)),
            FormulaExpr::Sum(args) => dialect.emit_sum(&render_all(args, dialect)),
        }
    }

    /// Renders the expression as cell formula text, with the leading `=`.
    ///
    /// # Example
    ///
    /// ```
    /// use grade_engine::formula::{CellRef, FormulaExpr, OoxmlDialect, TurkishDialect};
    ///
    /// let tenure = FormulaExpr::divide(
    ///     FormulaExpr::cell(CellRef::parse("L19").unwrap()),
    ///     FormulaExpr::number(360),
    /// );
    /// assert_eq!(tenure.to_formula(&OoxmlDialect), "=L19/360");
    /// assert_eq!(tenure.to_formula(&TurkishDialect), "=L19/360");
    /// ```
    pub fn to_formula(&self, dialect: &dyn FormulaDialect) -> String {
        format!("={}", self.render(dialect))
    }

    /// Number of nested `IF`s along the deepest path.
    pub fn conditional_depth(&self) -> usize {
        match self {
            FormulaExpr::If {
                condition,
                then,
                otherwise,
            } => {
                1 + condition
                    .conditional_depth()
                    .max(then.conditional_depth())
                    .max(otherwise.conditional_depth())
            }
            FormulaExpr::Compare { lhs, rhs, .. }
            | FormulaExpr::Subtract(lhs, rhs)
            | FormulaExpr::Divide(lhs, rhs) => lhs.conditional_depth().max(rhs.conditional_depth()),
            FormulaExpr::Concat(items) | FormulaExpr::And(items) | FormulaExpr::Sum(items) => items
                .iter()
                .map(FormulaExpr::conditional_depth)
                .max()
                .unwrap_or(0),
            _ => 0,
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            FormulaExpr::Compare { .. } => PREC_COMPARE,
            FormulaExpr::Concat(_) => PREC_CONCAT,
            FormulaExpr::Subtract(..) => PREC_ADDITIVE,
            FormulaExpr::Divide(..) => PREC_MULTIPLICATIVE,
            _ => PREC_ATOM,
        }
    }

    fn render_operand(&self, dialect: &dyn FormulaDialect, parent: u8, right: bool) -> String {
        let text = self.render(dialect);
        let own = self.precedence();
        if own < parent || (right && own == parent) {
            format!("({})", text)
        } else {
            text
        }
    }
}

fn render_all(exprs: &[FormulaExpr], dialect: &dyn FormulaDialect) -> Vec<String> {
    exprs.iter().map(|e| e.render(dialect)).collect()
}

impl fmt::Display for FormulaExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_formula(&OoxmlDialect))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::TurkishDialect;

    fn cell(a1: &str) -> FormulaExpr {
        FormulaExpr::cell(CellRef::parse(a1).unwrap())
    }

    #[test]
    fn test_prim_day_shape() {
        let expr = FormulaExpr::if_then_else(
            FormulaExpr::and(vec![
                FormulaExpr::is_filled(CellRef::parse("E11").unwrap()),
                FormulaExpr::is_filled(CellRef::parse("F11").unwrap()),
            ]),
            FormulaExpr::subtract(cell("F11"), cell("E11")),
            FormulaExpr::empty_text(),
        );
        assert_eq!(
            expr.to_formula(&OoxmlDialect),
            "=IF(AND(E11<>\"\",F11<>\"\"),F11-E11,\"\")"
        );
        assert_eq!(
            expr.to_formula(&TurkishDialect),
            "=EĞER(VE(E11<>\"\";F11<>\"\");F11-E11;\"\")"
        );
    }

    #[test]
    fn test_concat_renders_with_spaced_ampersands() {
        let expr = FormulaExpr::concat(vec![cell("Z2"), FormulaExpr::text("/"), cell("Z3")]);
        assert_eq!(expr.render(&OoxmlDialect), "Z2 & \"/\" & Z3");
    }

    #[test]
    fn test_operands_are_parenthesized_by_precedence() {
        let diff = FormulaExpr::subtract(cell("B1"), cell("A1"));
        let expr = FormulaExpr::divide(diff.clone(), FormulaExpr::number(360));
        assert_eq!(expr.render(&OoxmlDialect), "(B1-A1)/360");

        let nested = FormulaExpr::subtract(cell("C1"), diff);
        assert_eq!(nested.render(&OoxmlDialect), "C1-(B1-A1)");

        let cmp = FormulaExpr::ge(
            FormulaExpr::divide(cell("L19"), FormulaExpr::number(360)),
            FormulaExpr::number(16),
        );
        assert_eq!(cmp.render(&OoxmlDialect), "L19/360>=16");
    }

    #[test]
    fn test_display_uses_ooxml() {
        let expr = FormulaExpr::sum(CellRange::column(11, 11, 18));
        assert_eq!(expr.to_string(), "=SUM(L11:L18)");
    }

    #[test]
    fn test_conditional_depth() {
        let inner = FormulaExpr::if_then_else(cell("A1"), FormulaExpr::number(1), FormulaExpr::number(2));
        let outer = FormulaExpr::if_then_else(cell("A2"), inner, FormulaExpr::number(3));
        assert_eq!(outer.conditional_depth(), 2);
        assert_eq!(cell("A1").conditional_depth(), 0);
    }
}
