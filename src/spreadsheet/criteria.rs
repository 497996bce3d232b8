use glob::Pattern;

/// Criteria for choosing and reading the worksheet that holds a day's log.
#[derive(Clone, Debug, Default)]
pub struct Criteria {
    /// Sheet name patterns; the first sheet (in workbook order) matching any of them is read.
    /// `None` selects the first sheet.
    pub sheet_name_patterns: Option<Vec<Pattern>>,

    /// Read error cells (`#N/A`, `#DIV/0!`) as blank instead of as their error text.
    pub error_as_null: bool,
}

impl Criteria {
    /// Checks if a sheet name matches the criteria patterns.
    /// Returns true if no patterns are specified or if name matches any pattern.
    pub fn accept(&self, sheet_name: &str) -> bool {
        if let Some(patterns) = &self.sheet_name_patterns {
            patterns.iter().any(|pattern| pattern.matches(sheet_name))
        } else {
            true
        }
    }
}
