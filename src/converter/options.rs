use crate::spreadsheet::criteria::Criteria;
use std::path::PathBuf;

/// Settings for one conversion run over a directory of day sheets.
#[derive(Clone, Debug)]
pub struct Options {
    /// Directory searched for workbooks; outputs are written next to their inputs
    pub directory: PathBuf,
    /// Glob pattern for input file names, relative to `directory`
    pub file_pattern: String,
    /// Appended to the input file stem to name the CSV output
    pub output_suffix: String,
    /// Prefix the CSV with a UTF-8 byte order mark so spreadsheet tools detect the encoding
    pub byte_order_mark: bool,
    /// Worksheet selection inside each workbook
    pub criteria: Criteria,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            directory: PathBuf::from("."),
            file_pattern: "*.xlsx".to_owned(),
            output_suffix: "_cleaned".to_owned(),
            byte_order_mark: true,
            criteria: Criteria::default(),
        }
    }
}

impl Options {
    /// Same defaults, rooted at another directory.
    pub fn in_directory(directory: impl Into<PathBuf>) -> Self {
        Options {
            directory: directory.into(),
            ..Options::default()
        }
    }
}
