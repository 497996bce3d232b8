use crate::error::DietSheetError;
use crate::grid::CellValue;
use crate::spreadsheet::reference::index_to_reference;
use crate::spreadsheet::SpreadsheetError;
use chrono::Duration;
use chrono::NaiveDate;
use chrono::NaiveTime;
use chrono::Timelike;
use std::collections::HashMap;

/// Types of cell data in xlsx worksheets.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) enum CellType {
    #[default]
    Empty,
    /// Boolean values (true/false)
    Boolean,
    /// Numeric values
    Number,
    /// Date/time values stored as numbers from 1900 epoch
    NumberDateTime1900,
    /// Date values stored as numbers from 1900 epoch
    NumberDate1900,
    /// Time values stored as numbers from 1900 epoch
    NumberTime1900,
    /// Date/time values stored as numbers from 1904 epoch
    NumberDateTime1904,
    /// Date values stored as numbers from 1904 epoch
    NumberDate1904,
    /// Time values stored as numbers from 1904 epoch
    NumberTime1904,
    /// ISO 8601 date/time strings
    IsoDateTime,
    /// Inline string values
    InlineString,
    /// Shared string table references
    SharedString,
    /// Error values
    Error,
}

impl CellType {
    /// Parses built-in Excel number format IDs to determine cell type.
    pub(crate) fn parse_builtin_number_format_id(id: &str, is_1904: bool) -> Option<Self> {
        match id {
            "22" => Some(if is_1904 { Self::NumberDateTime1904 } else { Self::NumberDateTime1900 }),
            "14" | "15" | "16" | "17" => Some(if is_1904 { Self::NumberDate1904 } else { Self::NumberDate1900 }),
            "18" | "19" | "20" | "21" | "45" | "46" | "47" => Some(if is_1904 { Self::NumberTime1904 } else { Self::NumberTime1900 }),
            _ => None,
        }
    }

    /// Parses custom number format strings to determine cell type.
    /// Date and time letters inside quoted literals, escapes and `[...]` sections are ignored.
    pub(crate) fn parse_custom_number_format(format: &str, is_1904: bool) -> Self {
        let mut is_escaped = false;
        let mut is_literal = false;
        let mut is_date = false;
        let mut is_time = false;
        let mut is_bracket = false;
        for character in format.chars() {
            match character {
                _ if is_escaped => is_escaped = false,
                '_' | '\\' if !is_escaped => is_escaped = true,

                '"' if is_literal => is_literal = false,
                '"' if !is_literal && !is_bracket => is_literal = true,

                ']' if is_bracket => is_bracket = false,
                '[' if !is_bracket && !is_literal => is_bracket = true,
                _ if is_literal || is_bracket => (),

                'Y' | 'y' | 'D' | 'd' => is_date = true,
                'H' | 'h' | 'S' | 's' => is_time = true,
                _ => (),
            }
        }

        match (is_date, is_time, is_1904) {
            (true, true, false) => Self::NumberDateTime1900,
            (true, true, true) => Self::NumberDateTime1904,
            (true, false, false) => Self::NumberDate1900,
            (true, false, true) => Self::NumberDate1904,
            (false, true, false) => Self::NumberTime1900,
            (false, true, true) => Self::NumberTime1904,
            (false, false, _) => Self::Number,
        }
    }

    /// Cell type for a style's `numFmtId`: a custom format declared in the workbook,
    /// else a built-in date or time format, else a plain number.
    pub(crate) fn for_format_id(id: &str, custom_formats: &HashMap<String, CellType>, is_1904: bool) -> Self {
        custom_formats
            .get(id)
            .copied()
            .or_else(|| Self::parse_builtin_number_format_id(id, is_1904))
            .unwrap_or(Self::Number)
    }

    fn is_1904(&self) -> bool {
        matches!(self, Self::NumberDateTime1904 | Self::NumberDate1904 | Self::NumberTime1904)
    }
}

/// A raw worksheet cell as it appears in the package, before shared strings are resolved.
#[derive(Clone, Debug)]
pub(crate) struct Cell {
    /// Row index (0-based)
    pub(crate) row: usize,
    /// Column index (0-based)
    pub(crate) col: usize,
    /// Cell data type
    pub(crate) kind: CellType,
    /// Cell value as stored in the XML
    pub(crate) value: String,
}

impl Cell {
    /// Returns the Excel-style cell reference (e.g., "A1", "B2").
    pub(crate) fn reference(&self) -> String {
        index_to_reference(self.row, self.col)
    }

    /// Converts the stored value into a grid value.
    ///
    /// Date-formatted numbers become text the way they are displayed (`2025-11-11 00:00:00`,
    /// `08:30:00`). Booleans become `1`/`0`, so they count as numbers. Error cells keep
    /// their error text.
    pub(crate) fn to_cell_value(&self, shared_strings: &[String]) -> Result<CellValue, String> {
        let value = match self.kind {
            CellType::Empty => CellValue::Empty,
            CellType::Boolean => CellValue::Number(if self.value == "1" || self.value == "true" { 1.0 } else { 0.0 }),
            CellType::Number => CellValue::Number(self.to_double()?),
            CellType::NumberDateTime1900 | CellType::NumberDate1900
            | CellType::NumberDateTime1904 | CellType::NumberDate1904 => {
                CellValue::Text(to_datetime_string(self.to_double()?, self.kind.is_1904())?)
            }
            CellType::NumberTime1900 | CellType::NumberTime1904 => {
                let serial = self.to_double()?;
                if serial < 1.0 {
                    CellValue::Text(to_time_string(serial)?)
                } else {
                    CellValue::Text(to_datetime_string(serial, self.kind.is_1904())?)
                }
            }
            CellType::IsoDateTime => CellValue::Text(self.value.replace('T', " ")),
            CellType::InlineString | CellType::Error => CellValue::Text(self.value.to_owned()),
            CellType::SharedString => {
                let index = self.value
                    .parse::<usize>()
                    .map_err(|_| format!("invalid shared string index '{}'", self.value))?;
                let string = shared_strings
                    .get(index)
                    .ok_or_else(|| format!("shared string {} out of range", index))?;
                CellValue::Text(string.to_owned())
            }
        };
        Ok(value)
    }

    /// Converts cell value to double-precision floating point.
    fn to_double(&self) -> Result<f64, String> {
        self.value.trim().parse::<f64>().map_err(|_| format!("parse '{}' to double failed", self.value))
    }

    /// Wraps a conversion message with the file, sheet and cell it came from.
    pub(crate) fn value_error(&self, file_name: &str, sheet_name: &str, message: String) -> DietSheetError {
        SpreadsheetError::CellValueError(
            file_name.to_owned(),
            sheet_name.to_owned(),
            self.reference(),
            message,
        ).into()
    }
}

/// Converts an Excel serial date to a calendar date.
/// Serials below 60 sit before the phantom 1900-02-29 of the Lotus 1-2-3 leap year bug.
fn to_date(serial: f64, is_1904: bool) -> Result<NaiveDate, String> {
    let days = serial.trunc() as i64;
    let offset = if is_1904 {
        1462
    } else if days < 60 {
        1
    } else {
        0
    };
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .zip(days.checked_add(offset).and_then(Duration::try_days))
        .and_then(|(epoch, duration)| epoch.checked_add_signed(duration))
        .ok_or_else(|| format!("serial date {} out of range", serial))
}

/// Converts the fractional part of a serial value to a time of day, rounded to milliseconds.
fn to_time(serial: f64) -> Result<NaiveTime, String> {
    let milliseconds = (serial.fract().abs() * 86_400_000f64).round() as i64;
    let milliseconds = milliseconds.min(86_399_999);
    let seconds = (milliseconds / 1_000) as u32;
    NaiveTime::from_num_seconds_from_midnight_opt(seconds, (milliseconds % 1_000) as u32 * 1_000_000)
        .ok_or_else(|| format!("serial time {} out of range", serial))
}

/// Formats a time of day as `HH:MM:SS`, with `.mmm` only when milliseconds are present.
fn format_time(time: NaiveTime) -> String {
    if time.nanosecond() == 0 {
        time.format("%H:%M:%S").to_string()
    } else {
        time.format("%H:%M:%S%.3f").to_string()
    }
}

pub(crate) fn to_time_string(serial: f64) -> Result<String, String> {
    Ok(format_time(to_time(serial)?))
}

pub(crate) fn to_datetime_string(serial: f64, is_1904: bool) -> Result<String, String> {
    let date = to_date(serial, is_1904)?;
    let time = to_time(serial)?;
    Ok(format!("{} {}", date.format("%Y-%m-%d"), format_time(time)))
}
