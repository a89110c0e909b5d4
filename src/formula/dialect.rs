//! Formula output dialects.
//!
//! A dialect decides only surface syntax: function names, the argument
//! separator and the decimal separator. Decision logic, thresholds and
//! string literals are produced by the expression tree and are identical in
//! every dialect.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::cell::{CellRange, CellRef};

/// Surface syntax of one spreadsheet formula convention.
///
/// Implementors supply the names and separators; the `emit_*` methods have
/// default implementations built on them.
pub trait FormulaDialect {
    /// Short identifier, e.g. `"ooxml"`.
    fn name(&self) -> &'static str;

    /// Localized name of the conditional function.
    fn if_function(&self) -> &'static str;

    /// Localized name of the logical conjunction function.
    fn and_function(&self) -> &'static str;

    /// Localized name of the summation function.
    fn sum_function(&self) -> &'static str;

    /// Separator between function arguments.
    fn arg_separator(&self) -> &'static str;

    /// Decimal separator for numeric literals.
    fn decimal_separator(&self) -> char;

    /// `IF(condition, then, otherwise)`.
    fn emit_conditional(&self, condition: &str, then: &str, otherwise: &str) -> String {
        let sep = self.arg_separator();
        format!(
            "{}({}{}{}{}{})",
            self.if_function(),
            condition,
            sep,
            then,
            sep,
            otherwise
        )
    }

    /// `AND(a, b, ...)`.
    fn emit_and(&self, terms: &[String]) -> String {
        format!("{}({})", self.and_function(), terms.join(self.arg_separator()))
    }

    /// `SUM(a, b, ...)`.
    fn emit_sum(&self, args: &[String]) -> String {
        format!("{}({})", self.sum_function(), args.join(self.arg_separator()))
    }

    /// A single cell reference.
    fn emit_cell_ref(&self, cell: &CellRef) -> String {
        cell.to_string()
    }

    /// A range reference.
    fn emit_range_ref(&self, range: &CellRange) -> String {
        range.to_string()
    }

    /// A numeric literal in normalized form.
    fn emit_number(&self, value: Decimal) -> String {
        let text = value.normalize().to_string();
        match self.decimal_separator() {
            '.' => text,
            sep => text.replace('.', &sep.to_string()),
        }
    }

    /// A quoted string literal with embedded quotes doubled.
    fn emit_text(&self, value: &str) -> String {
        format!("\"{}\"", value.replace('"', "\"\""))
    }
}

/// The file-format dialect: English function names and `,` separators.
///
/// Formulas stored inside xlsx files always use this form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OoxmlDialect;

impl FormulaDialect for OoxmlDialect {
    fn name(&self) -> &'static str {
        "ooxml"
    }

    fn if_function(&self) -> &'static str {
        "IF"
    }

    fn and_function(&self) -> &'static str {
        "AND"
    }

    fn sum_function(&self) -> &'static str {
        "SUM"
    }

    fn arg_separator(&self) -> &'static str {
        ","
    }

    fn decimal_separator(&self) -> char {
        '.'
    }
}

/// The Turkish UI dialect: localized names, `;` separators and decimal comma.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TurkishDialect;

impl FormulaDialect for TurkishDialect {
    fn name(&self) -> &'static str {
        "turkish"
    }

    fn if_function(&self) -> &'static str {
        "EĞER"
    }

    fn and_function(&self) -> &'static str {
        "VE"
    }

    fn sum_function(&self) -> &'static str {
        "TOPLA"
    }

    fn arg_separator(&self) -> &'static str {
        ";"
    }

    fn decimal_separator(&self) -> char {
        ','
    }
}

/// Dialect selector used by configuration and the API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// [`OoxmlDialect`].
    #[default]
    Ooxml,
    /// [`TurkishDialect`].
    Turkish,
}

impl Dialect {
    /// The strategy object for this selector.
    pub fn strategy(self) -> &'static dyn FormulaDialect {
        match self {
            Dialect::Ooxml => &OoxmlDialect,
            Dialect::Turkish => &TurkishDialect,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ooxml_conditional() {
        assert_eq!(OoxmlDialect.emit_conditional("A1>0", "1", "2"), "IF(A1>0,1,2)");
    }

    #[test]
    fn test_turkish_conditional() {
        assert_eq!(TurkishDialect.emit_conditional("A1>0", "1", "2"), "EĞER(A1>0;1;2)");
    }

    #[test]
    fn test_and_and_sum_use_separator() {
        let terms = vec!["A1<>\"\"".to_string(), "B1<>\"\"".to_string()];
        assert_eq!(OoxmlDialect.emit_and(&terms), "AND(A1<>\"\",B1<>\"\")");
        assert_eq!(TurkishDialect.emit_and(&terms), "VE(A1<>\"\";B1<>\"\")");

        let range = CellRange::column(10, 11, 18);
        let args = vec![TurkishDialect.emit_range_ref(&range)];
        assert_eq!(TurkishDialect.emit_sum(&args), "TOPLA(K11:K18)");
    }

    #[test]
    fn test_numbers_are_normalized_and_localized() {
        assert_eq!(OoxmlDialect.emit_number(Decimal::new(1600, 2)), "16");
        assert_eq!(OoxmlDialect.emit_number(Decimal::new(25, 1)), "2.5");
        assert_eq!(TurkishDialect.emit_number(Decimal::new(25, 1)), "2,5");
        assert_eq!(TurkishDialect.emit_number(Decimal::from(360)), "360");
    }

    #[test]
    fn test_text_literals_escape_quotes() {
        assert_eq!(OoxmlDialect.emit_text("E"), "\"E\"");
        assert_eq!(OoxmlDialect.emit_text(""), "\"\"");
        assert_eq!(OoxmlDialect.emit_text("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn test_dialect_selector() {
        assert_eq!(Dialect::default().strategy().name(), "ooxml");
        assert_eq!(Dialect::Turkish.strategy().name(), "turkish");
        let parsed: Dialect = serde_yaml::from_str("turkish").unwrap();
        assert_eq!(parsed, Dialect::Turkish);
    }
}
