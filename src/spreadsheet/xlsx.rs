use crate::error::DietSheetError;
use crate::helpers::reader::SourceReader;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::xml::XmlReader;
use crate::helpers::xml::XmlTextContextHelper;
use crate::helpers::zip::ZipHelper;
use crate::match_xml_events;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::cell::CellType;
use crate::spreadsheet::criteria::Criteria;
use crate::spreadsheet::excel;
use crate::spreadsheet::excel::load_relationships;
use crate::spreadsheet::reference::reference_to_index;
use crate::spreadsheet::sheet::Sheet;
use crate::spreadsheet::Spreadsheet;
use crate::spreadsheet::SpreadsheetError;
use quick_xml::events::Event;
use quick_xml::name::QName;
use std::collections::HashMap;
use std::io::BufReader;
use tracing::trace;
use zip::read::ZipFile;
use zip::ZipArchive;

const TAG_CUSTOM_FORMAT: QName = QName(b"numFmt");
const TAG_CELL_FORMATS: QName = QName(b"cellXfs");
const TAG_CELL_FORMAT: QName = QName(b"xf");
const TAG_SHARED_STRING_ITEM: QName = QName(b"si");
// Phonetic reading annotations on East Asian text, not part of the value
const TAG_PHONETIC_RUN: QName = QName(b"rPh");
const TAG_TEXT: QName = QName(b"t");
const TAG_WORKBOOK_PROPERTIES: QName = QName(b"workbookPr");
const TAG_SHEET: QName = QName(b"sheet");
const TAG_ROW: QName = QName(b"row");
const TAG_CELL: QName = QName(b"c");
const TAG_INLINE_STRING: QName = QName(b"is");
const TAG_VALUE: QName = QName(b"v");

/// Streaming reader over one part of the package
type PartReader<'a> = XmlReader<BufReader<ZipFile<'a, SourceReader>>>;

/// An Excel XLSX (or macro-enabled XLSM) workbook
pub(crate) struct XlsxSpreadsheet {
    /// File name of the spreadsheet
    pub(crate) name: String,
    /// ZIP archive containing the package parts
    zip: ZipArchive<SourceReader>,
    /// Parsed number formats for cell type detection, indexed by style ID
    number_formats: Vec<CellType>,
    /// List of worksheets with (name, zip_path) pairs, in workbook order
    sheets: Vec<(String, String)>,
}

impl XlsxSpreadsheet {
    /// Opens an XLSX package and parses its structure
    pub(crate) fn open(name: &str, reader: SourceReader) -> Result<XlsxSpreadsheet, DietSheetError> {
        let (zip, number_formats, sheets) = excel::open(name, reader, load_workbook, load_number_formats)?;
        Ok(XlsxSpreadsheet {
            name: name.to_owned(),
            zip,
            number_formats,
            sheets,
        })
    }
}

impl Spreadsheet for XlsxSpreadsheet {
    fn name(&self) -> String {
        self.name.to_owned()
    }

    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|(name, _)| name.to_owned()).collect()
    }

    /// Loads the shared string table; workbooks with only inline strings have none
    fn load_shared_strings(&mut self) -> Result<Vec<String>, DietSheetError> {
        let mut shared_strings = Vec::<String>::new();
        let mut reader = match self.zip.xml_reader("xl/sharedStrings.xml")? {
            Some(reader) => reader,
            None => return Ok(shared_strings),
        };

        match_xml_events!(reader => {
            Event::Start(event) if event.name() == TAG_SHARED_STRING_ITEM => {
                shared_strings.push(read_rich_text(&mut reader, TAG_SHARED_STRING_ITEM)?);
            }
        });
        trace!(file = %self.name, count = shared_strings.len(), "loaded shared strings");
        Ok(shared_strings)
    }

    /// Reads the first worksheet accepted by the criteria
    fn read_sheet(&mut self, criteria: &Criteria) -> Result<Sheet, DietSheetError> {
        let (sheet_name, zip_path) = self.sheets
            .iter()
            .find(|(sheet_name, _)| criteria.accept(sheet_name))
            .cloned()
            .ok_or_else(|| SpreadsheetError::SheetNotFound(self.name.to_owned()))?;
        trace!(file = %self.name, sheet = %sheet_name, path = %zip_path, "reading worksheet");

        let mut sheet = Sheet::new(&self.name, &sheet_name);
        let mut row_count = 0usize;
        let mut col_count = 0usize;
        let mut row = 0usize;
        let mut col = 0usize;
        let mut kind = CellType::default();
        let mut value = String::new();
        let mut reader = self.zip.xml_reader(&zip_path)?
            .ok_or_else(|| SpreadsheetError::FileError(zip_path.to_owned()))?;
        match_xml_events!(reader => {
            Event::Start(event) if event.name() == TAG_ROW => {
                // Rows may omit "r"; then they follow the previous row
                if let Some(index) = event.get_attribute_value("r")?.and_then(|r| r.parse::<usize>().ok()) {
                    row_count = index.saturating_sub(1);
                }
                col_count = 0;
            }
            Event::End(event) if event.name() == TAG_ROW => {
                row_count += 1;
            }
            Event::Start(event) if event.name() == TAG_CELL => {
                (row, col) = event.get_attribute_value("r")?
                    .and_then(|reference| reference_to_index(&reference))
                    .unwrap_or((row_count, col_count));
                col_count = col + 1;
                value.clear();
                kind = event.get_attribute_value("t")?.map(|t| {
                    match t.as_ref() {
                        "inlineStr" | "str" => CellType::InlineString,
                        "s" => CellType::SharedString,
                        "d" => CellType::IsoDateTime,
                        "b" => CellType::Boolean,
                        "e" => if criteria.error_as_null { CellType::Empty } else { CellType::Error },
                        _ => CellType::Number,
                    }
                }).unwrap_or(CellType::Number);
                if let Some(format_id) = event.get_attribute_value("s")? {
                    if kind == CellType::Number && !format_id.is_empty() {
                        let index = format_id.parse::<usize>()?;
                        kind = self.number_formats.get(index).copied().unwrap_or(CellType::Number);
                    }
                }
            }
            Event::Start(event) if kind != CellType::Empty && event.name() == TAG_INLINE_STRING => {
                value = read_rich_text(&mut reader, TAG_INLINE_STRING)?;
            }
            Event::Start(event) if kind != CellType::Empty && event.name() == TAG_VALUE => {
                value = read_value(&mut reader)?;
            }
            Event::End(event) if event.name() == TAG_CELL => {
                if kind != CellType::Empty && !value.is_empty() {
                    sheet.push(Cell {
                        row,
                        col,
                        kind,
                        value: std::mem::take(&mut value),
                    });
                }
                kind = CellType::default();
            },
        });

        trace!(file = %self.name, sheet = %sheet_name, cells = sheet.cells.len(), "read worksheet");
        Ok(sheet)
    }
}

/// Worksheets in workbook order as (name, part path), and whether dates count from 1904.
///
/// Sheets whose relationship is missing or not a worksheet (chartsheets, dialogs) are left out.
fn load_workbook(zip: &mut ZipArchive<SourceReader>) -> Result<(Vec<(String, String)>, bool), DietSheetError> {
    let targets = load_relationships(zip, "xl/_rels/workbook.xml.rels")?;
    let mut reader = zip.xml_reader("xl/workbook.xml")?
        .ok_or_else(|| SpreadsheetError::FileError("xl/workbook.xml".to_owned()))?;

    let mut declared = Vec::<(String, String)>::new();
    let mut is_1904 = false;
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_SHEET => {
            let name = event.get_attribute_value("name")?;
            let relationship = event.get_local_attribute_value(b"id")?;
            if let Some((name, relationship)) = name.zip(relationship) {
                declared.push((name.into_owned(), relationship.into_owned()));
            }
        }
        Event::Start(event) if event.name() == TAG_WORKBOOK_PROPERTIES => {
            is_1904 = event.get_attribute_value("date1904")?
                .is_some_and(|value| matches!(value.as_ref(), "1" | "true"));
        }
    });

    let sheets = declared
        .into_iter()
        .filter_map(|(name, relationship)| targets.get(&relationship).map(|path| (name, path.to_owned())))
        .collect();
    Ok((sheets, is_1904))
}

/// Cell type of every cell style (`cellXfs` entry), indexed by the style id cells refer to.
///
/// `numFmts` precedes `cellXfs` in styles.xml, so custom formats are known by the time
/// the styles that use them are read.
fn load_number_formats(zip: &mut ZipArchive<SourceReader>, is_1904: bool) -> Result<Vec<CellType>, DietSheetError> {
    let Some(mut reader) = zip.xml_reader("xl/styles.xml")? else {
        return Ok(Vec::new());
    };

    let mut custom_formats = HashMap::<String, CellType>::new();
    let mut cell_formats = Vec::<CellType>::new();
    let mut in_cell_formats = false;
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_CUSTOM_FORMAT => {
            let id = event.get_attribute_value("numFmtId")?;
            let code = event.get_attribute_value("formatCode")?;
            if let Some((id, code)) = id.zip(code) {
                custom_formats.insert(id.into_owned(), CellType::parse_custom_number_format(&code, is_1904));
            }
        }
        Event::Start(event) if event.name() == TAG_CELL_FORMATS => in_cell_formats = true,
        Event::End(event) if event.name() == TAG_CELL_FORMATS => in_cell_formats = false,
        Event::Start(event) if in_cell_formats && event.name() == TAG_CELL_FORMAT => {
            let id = event.get_attribute_value("numFmtId")?;
            cell_formats.push(CellType::for_format_id(id.as_deref().unwrap_or("0"), &custom_formats, is_1904));
        }
    });
    Ok(cell_formats)
}

/// Text of a `<v>` element, read up to its end tag.
fn read_value(reader: &mut PartReader<'_>) -> Result<String, DietSheetError> {
    let mut value = String::new();
    match_xml_events!(reader => {
        Event::End(event) if event.name() == TAG_VALUE => break,
        Event::Text(event) => value.push_str(&event.xml_content()?),
        Event::GeneralRef(event) => value.push_bytes_ref(&event)?,
    });
    Ok(value)
}

/// Text of a string item (`<si>` or `<is>`) up to `end_tag`: the `<t>` runs concatenated,
/// phonetic runs left out.
fn read_rich_text(reader: &mut PartReader<'_>, end_tag: QName) -> Result<String, DietSheetError> {
    let mut text = String::new();
    let mut in_phonetic_run = false;
    let mut in_text = false;
    match_xml_events!(reader => {
        Event::End(event) if event.name() == end_tag => break,
        Event::Start(event) if event.name() == TAG_PHONETIC_RUN => in_phonetic_run = true,
        Event::End(event) if event.name() == TAG_PHONETIC_RUN => in_phonetic_run = false,
        Event::Start(event) if event.name() == TAG_TEXT => in_text = !in_phonetic_run,
        Event::End(event) if event.name() == TAG_TEXT => in_text = false,
        Event::Text(event) if in_text => text.push_str(&event.xml_content()?),
        Event::CData(event) if in_text => text.push_str(&event.xml_content()?),
        Event::GeneralRef(event) if in_text => text.push_bytes_ref(&event)?,
    });
    Ok(text)
}
