//! In-memory cell grid handed from the spreadsheet reader to the scanner.

use crate::helpers::string::strip_spaces;
use std::fmt::Display;

/// The value of one grid cell.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
}

/// Outcome of testing a cell for a decimal value.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Numeric {
    Number(f64),
    NotANumber,
}

impl CellValue {
    /// Blank means empty, NaN, or text that is empty once spaces are stripped.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Number(value) => value.is_nan(),
            CellValue::Text(text) => strip_spaces(text).is_empty(),
        }
    }

    /// Tests whether the cell converts to a decimal number.
    ///
    /// Native numbers always qualify. Text qualifies when the trimmed string parses as a
    /// float, which includes integer, exponent and `inf`/`nan` spellings. Empty cells never do.
    pub fn classify_number(&self) -> Numeric {
        match self {
            CellValue::Empty => Numeric::NotANumber,
            CellValue::Number(value) => Numeric::Number(*value),
            CellValue::Text(text) => match text.trim().parse::<f64>() {
                Ok(value) => Numeric::Number(value),
                Err(_) => Numeric::NotANumber,
            },
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self.classify_number(), Numeric::Number(_))
    }

    /// Numeric value as a macro field; NaN counts as missing.
    pub fn to_macro(&self) -> Option<f64> {
        match self.classify_number() {
            Numeric::Number(value) if !value.is_nan() => Some(value),
            _ => None,
        }
    }

    /// Text form with non-breaking spaces removed and ends trimmed.
    pub fn to_normalized_string(&self) -> String {
        strip_spaces(&self.to_string())
    }
}

impl Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Number(value) if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 => {
                write!(f, "{}", *value as i64)
            }
            CellValue::Number(value) => write!(f, "{}", value),
            CellValue::Text(text) => write!(f, "{}", text),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_owned())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

/// Row-major cell grid anchored at A1. Rows may be ragged.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<CellValue>>,
}

static EMPTY: CellValue = CellValue::Empty;

impl Grid {
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        Grid { rows }
    }

    /// Number of rows, including blank ones inside the used range.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Cell at (row, col); anything outside the stored extent reads as empty.
    pub fn get(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .unwrap_or(&EMPTY)
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn blank_cells() {
        assert!(CellValue::Empty.is_blank());
        assert!(CellValue::Number(f64::NAN).is_blank());
        assert!(CellValue::from(" \u{a0} ").is_blank());
        assert!(!CellValue::from("0").is_blank());
        assert!(!CellValue::Number(0.0).is_blank());
    }

    #[test]
    fn numeric_classification() {
        assert_eq!(CellValue::Number(12.5).classify_number(), Numeric::Number(12.5));
        assert_eq!(CellValue::from("150").classify_number(), Numeric::Number(150.0));
        assert_eq!(CellValue::from(" 2.5 ").classify_number(), Numeric::Number(2.5));
        assert_eq!(CellValue::from("1e3").classify_number(), Numeric::Number(1000.0));
        assert_eq!(CellValue::from("12g").classify_number(), Numeric::NotANumber);
        assert_eq!(CellValue::from("").classify_number(), Numeric::NotANumber);
        assert_eq!(CellValue::Empty.classify_number(), Numeric::NotANumber);
    }

    #[test]
    fn nan_text_is_numeric_but_not_a_macro() {
        let cell = CellValue::from("nan");
        assert!(cell.is_number());
        assert_eq!(cell.to_macro(), None);
    }

    #[test]
    fn text_form_of_numbers() {
        assert_eq!(CellValue::Number(2.0).to_string(), "2");
        assert_eq!(CellValue::Number(-3.0).to_string(), "-3");
        assert_eq!(CellValue::Number(2.5).to_string(), "2.5");
        assert_eq!(CellValue::Empty.to_string(), "");
        assert_eq!(CellValue::from("\u{a0}오트밀 ").to_normalized_string(), "오트밀");
    }

    #[test]
    fn reads_outside_extent_are_empty() {
        let grid = Grid::new(vec![vec![CellValue::from("a")], vec![]]);
        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.get(0, 0), &CellValue::from("a"));
        assert_eq!(grid.get(0, 4), &CellValue::Empty);
        assert_eq!(grid.get(1, 0), &CellValue::Empty);
        assert_eq!(grid.get(9, 9), &CellValue::Empty);
    }
}
