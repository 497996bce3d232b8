//! # Spreadsheet Reading Module
//!
//! Reads Office Open XML workbooks (.xlsx, .xlsm, .xlam) into an in-memory [`Grid`].
//! Only the cell values are decoded; formulas contribute their cached results and
//! date-formatted numbers are rendered as text.
use crate::error::DietSheetError;
use crate::grid::Grid;
use crate::helpers::reader::SourceReader;
use crate::spreadsheet::criteria::Criteria;
use crate::spreadsheet::sheet::Sheet;
use crate::spreadsheet::xlsx::XlsxSpreadsheet;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

pub(crate) mod cell;
pub mod criteria;
pub(crate) mod excel;
pub(crate) mod reference;
pub(crate) mod sheet;
pub(crate) mod xlsx;

/// Errors raised while locating and decoding workbook contents.
#[derive(Error, Debug)]
pub enum SpreadsheetError {
    /// Extension is not one of the supported Office Open XML formats
    #[error("Cannot read '{0}': only .xlsx, .xlsm and .xlam workbooks are supported")]
    UnsupportedFileFormat(String),

    /// Compound File Binary container: a legacy .xls or a password-protected workbook
    #[error("'{0}' is a legacy or password protected workbook")]
    CompoundDocumentError(String),

    /// A required part is missing from the package
    #[error("Missing package part '{0}'")]
    FileError(String),

    /// Workbook declares no worksheets
    #[error("Spreadsheet '{0}' has no worksheets")]
    SpreadsheetEmptyError(String),

    /// No worksheet satisfies the criteria
    #[error("No matching worksheet in '{0}'")]
    SheetNotFound(String),

    /// A stored cell value cannot be decoded
    #[error("Invalid cell value in '{0}' sheet '{1}' at {2}: {3}")]
    CellValueError(String, String, String, String),
}

/// Common interface over workbook formats.
pub(crate) trait Spreadsheet {
    /// Returns the file name of this spreadsheet
    fn name(&self) -> String;

    /// Worksheet names in workbook order
    fn sheet_names(&self) -> Vec<String>;

    /// Loads the shared string table referenced by string cells
    fn load_shared_strings(&mut self) -> Result<Vec<String>, DietSheetError>;

    /// Reads the cells of the first worksheet accepted by the criteria
    fn read_sheet(&mut self, criteria: &Criteria) -> Result<Sheet, DietSheetError>;
}

/// Opens a spreadsheet from disk, choosing the reader by file extension.
pub(crate) fn open_spreadsheet(path: &Path) -> Result<Box<dyn Spreadsheet>, DietSheetError> {
    let name = path.to_string_lossy().to_string();
    check_extension(&name, path)?;
    let reader = SourceReader::open(path)?;
    Ok(Box::new(XlsxSpreadsheet::open(&name, reader)?))
}

/// Opens a spreadsheet whose bytes are already in memory.
pub(crate) fn open_spreadsheet_bytes(name: &str, bytes: Vec<u8>) -> Result<Box<dyn Spreadsheet>, DietSheetError> {
    check_extension(name, Path::new(name))?;
    let reader = SourceReader::from_bytes(name, bytes)?;
    Ok(Box::new(XlsxSpreadsheet::open(name, reader)?))
}

fn check_extension(name: &str, path: &Path) -> Result<(), DietSheetError> {
    let extension = path
        .extension()
        .map(|extension| extension.to_string_lossy().to_ascii_lowercase());
    match extension.as_deref() {
        Some("xlsx") | Some("xlsm") | Some("xlam") => Ok(()),
        _ => Err(SpreadsheetError::UnsupportedFileFormat(name.to_owned()))?,
    }
}

fn load_grid(mut spreadsheet: Box<dyn Spreadsheet>, criteria: &Criteria) -> Result<Grid, DietSheetError> {
    let shared_strings = spreadsheet.load_shared_strings()?;
    let sheet = spreadsheet.read_sheet(criteria)?;
    debug!(
        file = %spreadsheet.name(),
        sheet = %sheet.name,
        sheets = spreadsheet.sheet_names().len(),
        cells = sheet.cells.len(),
        "loaded worksheet",
    );
    sheet.to_grid(&shared_strings)
}

/// Reads the selected worksheet of a workbook on disk into a grid. Row 0 is the first sheet row.
pub fn read_grid(path: &Path, criteria: &Criteria) -> Result<Grid, DietSheetError> {
    load_grid(open_spreadsheet(path)?, criteria)
}

/// Same as [`read_grid`] for workbook bytes already in memory; `name` must carry the extension.
pub fn read_grid_from_bytes(name: &str, bytes: Vec<u8>, criteria: &Criteria) -> Result<Grid, DietSheetError> {
    load_grid(open_spreadsheet_bytes(name, bytes)?, criteria)
}
