//! # Directory conversion
//!
//! Finds day-sheet workbooks in a directory, extracts their food records and writes
//! each non-empty result to `<stem><suffix>.csv` beside the input.

pub mod options;
pub mod writer;

use crate::diet::extract_records;
use crate::diet::FoodRecord;
use crate::error::DietSheetError;
use crate::error::ResultMessage;
use crate::spreadsheet::read_grid;
use options::Options;
use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use tracing::debug;
use tracing::error;
use tracing::info;

/// Outcome of converting a single workbook.
#[derive(Clone, Debug, PartialEq)]
pub enum Conversion {
    /// No record survived filtering; nothing was written
    Skipped,
    /// Records were written to `output`
    Written { output: PathBuf, rows: usize },
}

/// Per-run counts.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Summary {
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Lists input workbooks in the configured directory, sorted by path.
pub fn discover(options: &Options) -> Result<Vec<PathBuf>, DietSheetError> {
    let pattern = glob::Pattern::escape(&options.directory.to_string_lossy()) + "/" + &options.file_pattern;
    let mut files = glob::glob(&pattern)?
        .collect::<Result<Vec<PathBuf>, glob::GlobError>>()?;
    files.retain(|path| path.is_file());
    files.sort();
    Ok(files)
}

/// Output location for an input workbook: same directory, stem plus suffix, `.csv` extension.
pub fn output_path(input: &Path, options: &Options) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_default();
    input.with_file_name(format!("{}{}.csv", stem, options.output_suffix))
}

/// Converts one workbook, writing its CSV when at least one record survives.
pub fn convert_file(input: &Path, options: &Options) -> Result<Conversion, DietSheetError> {
    let grid = read_grid(input, &options.criteria).with_prefix(&input.to_string_lossy())?;
    let records = extract_records(&grid);
    debug!(file = %input.display(), rows = grid.row_count(), records = records.len(), "scanned");
    if records.is_empty() {
        return Ok(Conversion::Skipped);
    }

    let output = output_path(input, options);
    write_output(&output, &records, options.byte_order_mark).with_prefix(&output.to_string_lossy())?;
    Ok(Conversion::Written { output, rows: records.len() })
}

fn write_output(output: &Path, records: &[FoodRecord], byte_order_mark: bool) -> Result<(), DietSheetError> {
    let mut file = BufWriter::new(File::create(output)?);
    writer::write_records(&mut file, records, byte_order_mark)?;
    file.flush()?;
    Ok(())
}

/// Converts every discovered workbook. A failing file is reported and the run moves on.
pub fn run(options: &Options) -> Result<Summary, DietSheetError> {
    let files = discover(options)?;
    let mut summary = Summary::default();
    if files.is_empty() {
        println!("{} 파일이 없습니다.", options.file_pattern);
        info!(directory = %options.directory.display(), pattern = %options.file_pattern, "no input files");
        return Ok(summary);
    }

    for input in &files {
        let input_name = file_name(input);
        match convert_file(input, options) {
            Ok(Conversion::Written { output, rows }) => {
                summary.written += 1;
                println!("{} → {} ({}행) 저장 완료", input_name, file_name(&output), rows);
                info!(input = %input.display(), output = %output.display(), rows, "converted");
            }
            Ok(Conversion::Skipped) => {
                summary.skipped += 1;
                println!("{}: 변환할 레코드가 없습니다 (건너뜀).", input_name);
                info!(input = %input.display(), "no records, skipped");
            }
            Err(err) => {
                summary.failed += 1;
                error!(input = %input.display(), error = %err, "conversion failed");
            }
        }
    }

    info!(written = summary.written, skipped = summary.skipped, failed = summary.failed, "done");
    Ok(summary)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn output_path_appends_suffix() {
        let options = Options::default();
        assert_eq!(
            output_path(Path::new("logs/2025-11-11.xlsx"), &options),
            PathBuf::from("logs/2025-11-11_cleaned.csv"),
        );
        assert_eq!(
            output_path(Path::new("식단.v2.xlsx"), &options),
            PathBuf::from("식단.v2_cleaned.csv"),
        );
    }

    #[test]
    fn discover_sorts_and_filters() {
        let directory = tempfile::tempdir().unwrap();
        for name in ["b.xlsx", "a.xlsx", "notes.txt", "c.csv"] {
            std::fs::write(directory.path().join(name), b"").unwrap();
        }
        std::fs::create_dir(directory.path().join("dir.xlsx")).unwrap();

        let files = discover(&Options::in_directory(directory.path())).unwrap();
        let names: Vec<String> = files.iter().map(|path| file_name(path)).collect();
        assert_eq!(names, vec!["a.xlsx", "b.xlsx"]);
    }

    #[test]
    fn empty_directory_is_not_an_error() {
        let directory = tempfile::tempdir().unwrap();
        let summary = run(&Options::in_directory(directory.path())).unwrap();
        assert_eq!(summary, Summary::default());
    }

    #[test]
    fn unreadable_workbook_is_counted_as_failed() {
        let directory = tempfile::tempdir().unwrap();
        std::fs::write(directory.path().join("broken.xlsx"), b"not a workbook").unwrap();

        let summary = run(&Options::in_directory(directory.path())).unwrap();
        assert_eq!(summary, Summary { written: 0, skipped: 0, failed: 1 });
        assert!(!directory.path().join("broken_cleaned.csv").exists());
    }
}
