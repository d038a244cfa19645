//! # Batch Driver
//!
//! Walks an input directory and runs the CSV exporter and the class generator
//! over every spreadsheet in it. Files are processed one at a time; a file
//! that fails is logged and skipped, while directory-level failures abort the
//! run.
use crate::config::Config;
use crate::error::{ResultMessage, TableError, WorkbookError};
use crate::exporter::{export_csv, CsvOptions};
use crate::generator::class::generate_class;
use crate::generator::loader::generate_loader;
use crate::generator::SOURCE_EXTENSION;
use crate::spreadsheet::Spreadsheet;
use glob::{glob, Pattern};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Outcome of a batch: what was produced and which inputs were skipped.
#[derive(Debug)]
pub struct BatchReport<T> {
    /// Produced artifacts in input order
    pub outputs: Vec<T>,
    /// Inputs (or outputs) that failed, with the reason
    pub failures: Vec<(PathBuf, TableError)>,
}

impl<T> Default for BatchReport<T> {
    fn default() -> Self {
        Self {
            outputs: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> BatchReport<T> {
    fn skip(&mut self, path: &Path, error: TableError) {
        warn!(file = %path.display(), %error, "Skipping spreadsheet");
        self.failures.push((path.to_path_buf(), error));
    }
}

/// Lists the `*.<extension>` files directly inside `input_dir`, sorted by path.
pub fn find_inputs(input_dir: &Path, extension: &str) -> Result<Vec<PathBuf>, TableError> {
    let pattern = format!(
        "{}/*.{}",
        Pattern::escape(&input_dir.to_string_lossy()),
        Pattern::escape(extension)
    );
    let mut files = Vec::new();
    for entry in glob(&pattern)? {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(error) => warn!(%error, "Cannot read directory entry"),
        }
    }
    files.sort();
    Ok(files)
}

/// Table name of a spreadsheet: its file name without the extension.
pub fn table_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn ensure_dir(dir: &Path) -> Result<(), TableError> {
    fs::create_dir_all(dir)
        .map_err(TableError::from)
        .with_prefix(&format!("Cannot create directory '{}'", dir.display()))
}

fn open_spreadsheet(path: &Path) -> Result<Spreadsheet, WorkbookError> {
    Spreadsheet::open(path).map_err(|source| WorkbookError::Open {
        path: path.display().to_string(),
        source,
    })
}

/// Exports one spreadsheet to `<output_dir>/<stem>.csv`.
pub fn convert_file_csv(input: &Path, output_dir: &Path, options: &CsvOptions) -> Result<PathBuf, TableError> {
    let mut spreadsheet = open_spreadsheet(input)?;
    let output = output_dir.join(format!("{}.csv", table_stem(input)));
    let records = export_csv(&mut spreadsheet, &output, options)?;
    info!(file = %output.display(), records, "Exported CSV");
    Ok(output)
}

/// Exports every spreadsheet in `input_dir` to CSV.
///
/// # Errors
///
/// Fails when no spreadsheet is found or the output directory cannot be
/// created. Per-file failures are collected in the report instead.
pub fn convert_all_csv(
    input_dir: &Path,
    output_dir: &Path,
    extension: &str,
    options: &CsvOptions,
) -> Result<BatchReport<PathBuf>, TableError> {
    let files = find_inputs(input_dir, extension)?;
    if files.is_empty() {
        return Err(TableError::NoInputFiles {
            directory: input_dir.display().to_string(),
            extension: extension.to_owned(),
        });
    }
    ensure_dir(output_dir)?;

    let mut report = BatchReport::default();
    for file in &files {
        match convert_file_csv(file, output_dir, options) {
            Ok(output) => report.outputs.push(output),
            Err(error) => report.skip(file, error),
        }
    }
    Ok(report)
}

/// Generates `<output_dir>/<stem>.cs` for one spreadsheet and returns the class name.
pub fn generate_file_class(input: &Path, output_dir: &Path) -> Result<String, TableError> {
    let mut spreadsheet = open_spreadsheet(input)?;
    let stem = table_stem(input);
    let output = output_dir.join(format!("{stem}.{SOURCE_EXTENSION}"));
    generate_class(&mut spreadsheet, &stem, &output)
}

/// Generates a class for every spreadsheet in `input_dir`, then the aggregate loader.
///
/// The report's outputs are the generated class names; only these are
/// referenced by the loader, which is skipped when there are none. A loader
/// write failure is logged and recorded in the report without failing the
/// batch.
pub fn convert_all_classes(
    input_dir: &Path,
    output_dir: &Path,
    extension: &str,
) -> Result<BatchReport<String>, TableError> {
    let files = find_inputs(input_dir, extension)?;
    ensure_dir(output_dir)?;

    let mut report = BatchReport::default();
    for file in &files {
        match generate_file_class(file, output_dir) {
            Ok(class_name) => report.outputs.push(class_name),
            Err(error) => report.skip(file, error),
        }
    }

    if !report.outputs.is_empty() {
        if let Err(error) = generate_loader(output_dir, &report.outputs) {
            warn!(%error, "Cannot write table loader");
            report.failures.push((output_dir.to_path_buf(), error));
        }
    }
    Ok(report)
}

/// Runs the configured batches.
///
/// # Errors
///
/// Returns [`TableError::InputDirectoryMissing`] before doing anything when the
/// input directory does not exist. In [`crate::config::Mode::All`] a failed CSV
/// batch is logged and class generation still runs.
pub fn run(config: &Config) -> Result<(), TableError> {
    if !config.input_dir.is_dir() {
        return Err(TableError::InputDirectoryMissing(
            config.input_dir.display().to_string(),
        ));
    }
    info!(path = %absolute(&config.input_dir).display(), "Input directory");

    if config.mode.exports_csv() {
        info!(path = %absolute(&config.csv_dir).display(), "CSV output directory");
        let result = convert_all_csv(&config.input_dir, &config.csv_dir, &config.extension, &config.csv);
        match result {
            Ok(report) => summarize("CSV export", &report),
            Err(error) if config.mode.generates_classes() => warn!(%error, "CSV export failed"),
            Err(error) => return Err(error),
        }
    }

    if config.mode.generates_classes() {
        info!(path = %absolute(&config.class_dir).display(), "Class output directory");
        let report = convert_all_classes(&config.input_dir, &config.class_dir, &config.extension)?;
        summarize("Class generation", &report);
    }
    Ok(())
}

fn summarize<T>(batch: &str, report: &BatchReport<T>) {
    info!(
        produced = report.outputs.len(),
        failed = report.failures.len(),
        "{batch} finished"
    );
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
