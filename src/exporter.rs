//! CSV export of client-visible columns.
use crate::error::TableError;
use crate::schema::types::is_array_type;
use crate::schema::{
    cell_at, is_client_usage, is_excluded_usage, read_sheet, require_rows, select_sheets, NAME_ROW,
    TYPE_ROW, USAGE_ROW,
};
use crate::spreadsheet::cell::cell_position;
use crate::spreadsheet::Workbook;
use std::path::Path;
use tracing::debug;

/// Rows the CSV path needs from the schema sheet (names, types, usages).
pub const CSV_SCHEMA_ROWS: usize = 3;

/// Separator between groups of an `arr<...>` cell.
const GROUP_SEPARATOR: char = ';';

/// Options for the CSV exporter.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CsvOptions {
    /// Wrap each `arr<...>` group in parentheses instead of stripping them
    pub add_bracket: bool,
}

/// A data column selected for export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsvColumn {
    pub index: usize,
    pub declared_type: String,
}

/// Selects the exported columns from the schema rows.
///
/// A column is exported when it has a declared type and a usage, the usage
/// contains the client code and does not contain the exclusion code.
pub fn csv_columns(schema_rows: &[Vec<String>]) -> Vec<CsvColumn> {
    let width = schema_rows.get(NAME_ROW).map(Vec::len).unwrap_or(0);
    (0..width)
        .filter_map(|index| {
            let declared_type = cell_at(schema_rows, TYPE_ROW, index);
            let usage = cell_at(schema_rows, USAGE_ROW, index);
            if declared_type.is_empty() || usage.is_empty() || is_excluded_usage(usage) {
                return None;
            }
            if !is_client_usage(usage) {
                return None;
            }
            Some(CsvColumn {
                index,
                declared_type: declared_type.to_owned(),
            })
        })
        .collect()
}

/// Normalizes a cell according to its declared type.
///
/// `arr<...>` cells are split into `;`-separated groups whose brackets are
/// stripped or added per [`CsvOptions::add_bracket`]. Every other type passes
/// through unchanged.
pub fn normalize_cell(declared_type: &str, cell: &str, options: &CsvOptions) -> String {
    if is_array_type(declared_type) {
        normalize_groups(cell, options.add_bracket)
    } else {
        cell.to_owned()
    }
}

fn normalize_groups(cell: &str, add_bracket: bool) -> String {
    cell.split(GROUP_SEPARATOR)
        .map(|raw| {
            let group = raw.trim();
            if group.is_empty() {
                // Blank groups are kept as they were written
                return raw.to_owned();
            }
            if add_bracket {
                if !group.starts_with('(') && !group.ends_with(')') {
                    format!("({group})")
                } else {
                    group.to_owned()
                }
            } else {
                let group = group.strip_prefix('(').unwrap_or(group);
                group.strip_suffix(')').unwrap_or(group).to_owned()
            }
        })
        .collect::<Vec<_>>()
        .join(&GROUP_SEPARATOR.to_string())
}

/// Builds the CSV records from the data rows.
///
/// The first data row is the header and is skipped, as is every row whose
/// first cell is blank. Missing cells read as empty strings. A row yields a
/// record only if at least one column was selected.
pub fn export_rows(
    data_rows: &[Vec<String>],
    columns: &[CsvColumn],
    options: &CsvOptions,
) -> Vec<Vec<String>> {
    data_rows
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(row, cells)| {
            let blank = cells.first().map(|cell| cell.trim().is_empty()).unwrap_or(true);
            if blank {
                debug!(position = %cell_position(*row, 0), "Skipping row with blank first cell");
            }
            !blank
        })
        .map(|(_, cells)| {
            columns
                .iter()
                .map(|column| {
                    let cell = cells.get(column.index).map(String::as_str).unwrap_or("");
                    normalize_cell(&column.declared_type, cell, options)
                })
                .collect::<Vec<_>>()
        })
        .filter(|record| !record.is_empty())
        .collect()
}

/// Exports the first sheet of a table workbook to a CSV file.
///
/// The output file is only created once both sheets have been read and the
/// schema sheet has been validated.
///
/// # Returns
///
/// * `Result<usize, TableError>` - Number of records written
///
/// # Errors
///
/// Fails with a workbook error when there are fewer than two sheets, with a
/// schema error when the schema sheet has fewer than three rows, and with an
/// I/O or CSV error when writing fails.
pub fn export_csv<W>(workbook: &mut W, output_path: &Path, options: &CsvOptions) -> Result<usize, TableError>
where
    W: Workbook + ?Sized,
{
    let sheets = select_sheets(workbook)?;
    let data_rows = read_sheet(workbook, &sheets.data)?;
    let schema_rows = read_sheet(workbook, &sheets.schema)?;
    require_rows(&sheets.schema, &schema_rows, CSV_SCHEMA_ROWS)?;

    let columns = csv_columns(&schema_rows);
    let records = export_rows(&data_rows, &columns, options);

    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_path(output_path)?;
    for record in &records {
        writer.write_record(record)?;
    }
    writer.flush()?;
    Ok(records.len())
}
