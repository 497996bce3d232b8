//! # Food log extraction
//!
//! Recovers one [`FoodRecord`] per eaten item from a day sheet whose layout is only
//! implied by position: a date in A1, meal headers in column A, and for each food a
//! macro row (blank column A, numbers in B..E) followed by a name row and a quantity row.

mod record;
mod scanner;
mod section;

pub use record::retain_with_macros;
pub use record::FoodRecord;
pub use scanner::scan_grid;
pub use section::MealSection;

use crate::grid::Grid;

/// Scans a day sheet and drops the records that carry no macro value at all.
pub fn extract_records(grid: &Grid) -> Vec<FoodRecord> {
    retain_with_macros(scan_grid(grid))
}
