//! # Diet Sheet
//!
//! Converts day-by-day food logs exported as Excel workbooks into flat CSV tables.
//!
//! Each workbook holds one day: the date in A1, meal headers (`아침`, `점심`, `저녁`,
//! `간식/기타`) in column A, and for every food a row of macro numbers followed by a
//! name row and a quantity row. Nothing tags these rows, so the layout is inferred
//! from position alone.
//!
//! ## Layers
//!
//! - [`spreadsheet`]: reads the first worksheet of an `.xlsx` workbook into a [`Grid`]
//! - [`diet`]: scans a grid into [`FoodRecord`]s and drops records without macros
//! - [`converter`]: discovers workbooks in a directory and writes one CSV per workbook

pub mod converter;
pub mod diet;
mod error;
pub mod grid;
pub(crate) mod helpers;
pub mod spreadsheet;

pub use diet::extract_records;
pub use diet::FoodRecord;
pub use diet::MealSection;
pub use error::DietSheetError;
pub use grid::CellValue;
pub use grid::Grid;
