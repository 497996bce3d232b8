//! Office Open XML package helpers shared by the xlsx reader
use crate::error::DietSheetError;
use crate::helpers::reader::SourceReader;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::zip::ZipHelper;
use crate::match_xml_events;
use crate::spreadsheet::cell::CellType;
use crate::spreadsheet::SpreadsheetError;
use quick_xml::events::Event;
use std::borrow::Cow;
use std::collections::HashMap;
use zip::ZipArchive;

/// XML tag name for relationship elements in Excel files
const TAG_RELATIONSHIP: &[u8] = b"Relationship";

/// Signature of a Compound File Binary container (legacy .xls or an encrypted package)
const CFB_SIGNATURE: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Opens an xlsx package and loads its workbook structure
///
/// # Arguments
/// * `name` - File name, used in error messages
/// * `reader` - Source of the package bytes
/// * `load_workbook` - Function to load sheet names, their paths and the date system
/// * `load_number_formats` - Function to load number formatting information
///
/// # Returns
/// Tuple containing:
/// - Zip archive handle
/// - Number format mappings
/// - List of sheet names and their paths
pub(super) fn open<W, F>(name: &str, mut reader: SourceReader, load_workbook: W, load_number_formats: F) -> Result<(
    ZipArchive<SourceReader>,
    Vec<CellType>,
    Vec<(String, String)>
), DietSheetError>
where
    W: Fn(&mut ZipArchive<SourceReader>) -> Result<(Vec<(String, String)>, bool), DietSheetError>,
    F: Fn(&mut ZipArchive<SourceReader>, bool) -> Result<Vec<CellType>, DietSheetError>,
{
    if is_compound_document(&mut reader)? {
        Err(SpreadsheetError::CompoundDocumentError(name.to_owned()))?;
    }

    let mut zip = ZipArchive::new(reader)?;
    let (sheets, is_1904) = load_workbook(&mut zip)?;
    if sheets.is_empty() {
        Err(SpreadsheetError::SpreadsheetEmptyError(name.to_owned()))?
    }

    let number_formats = load_number_formats(&mut zip, is_1904)?;
    Ok((zip, number_formats, sheets))
}

/// Loads worksheet relationships from an Excel file
///
/// # Returns
/// Mapping of relationship IDs to worksheet paths
pub(super) fn load_relationships(zip: &mut ZipArchive<SourceReader>, path: &str) -> Result<HashMap<String, String>, DietSheetError> {
    let mut reader = zip.xml_reader(path)?
        .ok_or_else(|| SpreadsheetError::FileError(path.to_string()))?;
    let mut relationships: HashMap<String, String> = HashMap::new();
    match_xml_events!(reader => {
        Event::Start(event) if event.local_name().as_ref() == TAG_RELATIONSHIP => {
            let id = event.get_attribute_value("Id")?;
            let kind = event.get_attribute_value("Type")?;
            let target = event.get_attribute_value("Target")?;
            // Only worksheet relationships; chartsheets and dialogs carry no cells
            if kind.map(|it| it.ends_with("/worksheet")).unwrap_or(true) {
                if let Some((id, target)) = id.zip(target) {
                    relationships.insert(id.to_string(), to_zip_path(target));
                }
            }
        }
    });
    Ok(relationships)
}

/// Normalizes a relationship target to a path inside the zip archive
pub(crate) fn to_zip_path(path: Cow<'_, str>) -> String {
    if let Some(absolute) = path.strip_prefix('/') {
        absolute.to_string()
    } else if path.starts_with("xl/") {
        path.to_string()
    } else {
        format!("xl/{path}")
    }
}

/// Checks whether the source starts with the CFB signature instead of a zip header
fn is_compound_document(reader: &mut SourceReader) -> Result<bool, DietSheetError> {
    let mut signature = [0u8; 8];
    let read = reader.peek(&mut signature)?;
    Ok(read == signature.len() && signature == CFB_SIGNATURE)
}
