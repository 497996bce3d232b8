use crate::diet::FoodRecord;
use crate::diet::MealSection;
use crate::grid::CellValue;
use crate::grid::Grid;
use crate::helpers::string::strip_spaces;
use tracing::debug;
use tracing::trace;

/// Column holding dates, meal headers, food names and quantities
const LABEL_COLUMN: usize = 0;
/// Columns holding fat, carb, protein and calories
const MACRO_COLUMNS: [usize; 4] = [1, 2, 3, 4];

/// Scans a day sheet top to bottom and returns a record for every macro row that
/// follows a meal header and has a name row after it.
///
/// A macro row has a blank label cell and at least one numeric macro cell. Its name is
/// the next row with a non-blank label, and its quantity the non-blank label after that
/// (empty when the sheet ends first). Lookahead rows are revisited by the outer scan,
/// where their non-blank labels keep them from being read as macro rows.
pub fn scan_grid(grid: &Grid) -> Vec<FoodRecord> {
    let date = grid.get(0, LABEL_COLUMN).to_normalized_string();
    let mut section: Option<MealSection> = None;
    let mut records = Vec::new();

    for row in 0..grid.row_count() {
        let label = grid.get(row, LABEL_COLUMN);
        if let CellValue::Text(text) = label {
            if let Some(detected) = MealSection::detect(&strip_spaces(text)) {
                debug!(row, section = %detected, "meal section");
                section = Some(detected);
            }
        }

        if !label.is_blank() || !MACRO_COLUMNS.iter().any(|&col| grid.get(row, col).is_number()) {
            continue;
        }

        let Some(section) = section else {
            trace!(row, "macro row before any meal section");
            continue;
        };

        let Some(name_row) = next_labelled_row(grid, row + 1) else {
            debug!(row, "macro row without a name row");
            continue;
        };
        let quantity = next_labelled_row(grid, name_row + 1)
            .map(|quantity_row| grid.get(quantity_row, LABEL_COLUMN).to_normalized_string())
            .unwrap_or_default();

        let [fat, carb, protein, calories] = MACRO_COLUMNS.map(|col| grid.get(row, col).to_macro());
        records.push(FoodRecord {
            date: date.clone(),
            name: grid.get(name_row, LABEL_COLUMN).to_normalized_string(),
            quantity,
            section,
            fat,
            carb,
            protein,
            calories,
        });
    }

    records
}

/// First row at or after `start` whose label cell is not blank.
fn next_labelled_row(grid: &Grid, start: usize) -> Option<usize> {
    (start..grid.row_count()).find(|&row| !grid.get(row, LABEL_COLUMN).is_blank())
}
