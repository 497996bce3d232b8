use crate::error::DietSheetError;
use crate::grid::CellValue;
use crate::grid::Grid;
use crate::spreadsheet::cell::Cell;

/// A worksheet read from a spreadsheet file, holding its non-empty cells in document order.
pub(crate) struct Sheet {
    /// Source file name
    pub(crate) file_name: String,
    /// Sheet name
    pub(crate) name: String,
    /// Non-empty cells
    pub(crate) cells: Vec<Cell>,
    /// Largest row index seen
    pub(crate) row_upper_bound: Option<usize>,
}

impl Sheet {
    pub(super) fn new(file_name: &str, name: &str) -> Self {
        Self {
            file_name: file_name.to_owned(),
            name: name.to_owned(),
            cells: Vec::new(),
            row_upper_bound: None,
        }
    }

    /// Returns true if the sheet contains no cells.
    pub(crate) fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Adds a cell to the sheet, widening the row bound.
    pub(super) fn push(&mut self, cell: Cell) {
        if self.row_upper_bound.map(|row| row < cell.row).unwrap_or(true) {
            self.row_upper_bound = Some(cell.row);
        }
        self.cells.push(cell);
    }

    /// Lays the cells out as a grid anchored at A1, resolving shared strings.
    /// Leading blank rows and columns are kept so that (0, 0) is always cell A1.
    /// Each row only reaches its own rightmost cell; rows without cells stay empty.
    pub(crate) fn to_grid(&self, shared_strings: &[String]) -> Result<Grid, DietSheetError> {
        let Some(row_upper) = self.row_upper_bound.filter(|_| !self.is_empty()) else {
            return Ok(Grid::default());
        };
        let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); row_upper + 1];
        for cell in &self.cells {
            let row = &mut rows[cell.row];
            if row.len() <= cell.col {
                row.resize(cell.col + 1, CellValue::Empty);
            }
            row[cell.col] = cell
                .to_cell_value(shared_strings)
                .map_err(|message| cell.value_error(&self.file_name, &self.name, message))?;
        }
        Ok(Grid::new(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spreadsheet::cell::CellType;
    use pretty_assertions::assert_eq;

    fn push(sheet: &mut Sheet, row: usize, col: usize, kind: CellType, value: &str) {
        sheet.push(Cell {
            row,
            col,
            kind,
            value: value.to_owned(),
        });
    }

    #[test]
    fn sheet_initial() {
        let sheet = Sheet::new("", "");

        assert!(sheet.is_empty());
        assert_eq!(sheet.row_upper_bound, None);
        assert_eq!(sheet.to_grid(&[]).unwrap(), Grid::default());
    }

    #[test]
    fn sheet_to_grid() {
        let mut sheet = Sheet::new("day.xlsx", "Sheet1");
        push(&mut sheet, 1, 0, CellType::SharedString, "0");
        push(&mut sheet, 2, 1, CellType::Number, "150");
        push(&mut sheet, 2, 3, CellType::Number, "5.5");

        assert_eq!(sheet.row_upper_bound, Some(2));

        let grid = sheet.to_grid(&["아침 식사".to_owned()]).unwrap();
        assert_eq!(grid.row_count(), 3);
        assert!(grid.rows()[0].is_empty());
        assert_eq!(grid.rows()[1], vec![CellValue::from("아침 식사")]);
        assert_eq!(grid.get(1, 3), &CellValue::Empty);
        assert_eq!(grid.rows()[2], vec![
            CellValue::Empty,
            CellValue::Number(150.0),
            CellValue::Empty,
            CellValue::Number(5.5),
        ]);
    }

    #[test]
    fn far_cell_only_widens_its_own_row() {
        let mut sheet = Sheet::new("day.xlsx", "Sheet1");
        for row in 0..1000 {
            push(&mut sheet, row, 0, CellType::InlineString, "오트밀");
        }
        // XFD1, the last column of the first row
        push(&mut sheet, 0, 16_383, CellType::Number, "1");

        let grid = sheet.to_grid(&[]).unwrap();
        assert_eq!(grid.row_count(), 1000);
        assert_eq!(grid.rows()[0].len(), 16_384);
        assert_eq!(grid.get(0, 16_383), &CellValue::Number(1.0));
        assert!(grid.rows()[1..].iter().all(|row| row.len() == 1));
        assert_eq!(grid.get(999, 16_383), &CellValue::Empty);
    }

    #[test]
    fn bad_cell_names_its_position() {
        let mut sheet = Sheet::new("day.xlsx", "Sheet1");
        push(&mut sheet, 4, 2, CellType::SharedString, "9");

        let error = sheet.to_grid(&[]).unwrap_err().to_string();
        assert!(error.contains("day.xlsx"), "{}", error);
        assert!(error.contains("C5"), "{}", error);
    }
}
