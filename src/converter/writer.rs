//! CSV output for extracted food records.

use crate::diet::FoodRecord;
use crate::error::DietSheetError;
use std::io::Write;

/// Output header: date, name, quantity, section, fat, carb, protein, calories
pub const HEADER: [&str; 8] = ["날짜", "이름", "양", "분류", "지방", "탄수화물", "단백질", "칼로리"];

/// UTF-8 byte order mark
const BYTE_ORDER_MARK: &[u8] = b"\xEF\xBB\xBF";

/// Writes the header and one line per record. Missing macros are empty fields.
pub fn write_records<W: Write>(mut writer: W, records: &[FoodRecord], byte_order_mark: bool) -> Result<(), DietSheetError> {
    if byte_order_mark {
        writer.write_all(BYTE_ORDER_MARK)?;
    }
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(HEADER)?;
    for record in records {
        let [fat, carb, protein, calories] = record.macros().map(format_macro);
        csv.write_record([
            record.date.as_str(),
            record.name.as_str(),
            record.quantity.as_str(),
            record.section.label(),
            fat.as_str(),
            carb.as_str(),
            protein.as_str(),
            calories.as_str(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

/// Floats keep at least one fractional digit (`150.0`). Very large or small values use a
/// signed exponent of at least two digits (`1e+20`, `1.5e-07`).
fn format_macro(value: Option<f64>) -> String {
    value.map(format_float).unwrap_or_default()
}

fn format_float(value: f64) -> String {
    let shortest = format!("{:?}", value);
    let Some((mantissa, exponent)) = shortest.split_once('e') else {
        return shortest;
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    format!("{}e{}{:0>2}", mantissa, sign, digits)
}
