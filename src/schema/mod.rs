//! # Schema Module
//!
//! A table workbook carries its data on the first sheet and its schema on the
//! second one. The schema sheet describes each data column with four
//! positional header rows: field names, declared types, usage codes and
//! descriptions.
use crate::error::{SchemaError, TableError, WorkbookError};
use crate::spreadsheet::Workbook;
use tracing::debug;

pub mod types;

use types::{map_type, TargetType};

/// Index of the sheet holding data rows.
pub const DATA_SHEET_INDEX: usize = 0;
/// Index of the sheet holding the column schema.
pub const SCHEMA_SHEET_INDEX: usize = 1;

/// Row of the schema sheet holding field names.
pub const NAME_ROW: usize = 0;
/// Row of the schema sheet holding declared types.
pub const TYPE_ROW: usize = 1;
/// Row of the schema sheet holding usage codes.
pub const USAGE_ROW: usize = 2;
/// Row of the schema sheet holding descriptions.
pub const DESCRIPTION_ROW: usize = 3;

/// Rows the full schema (names, types, usages, descriptions) needs.
pub const SCHEMA_ROWS: usize = 4;

/// Usage code marking a column as visible to the client.
const CLIENT_CODE: char = 'c';
/// Usage code marking a column as excluded from exports.
const EXCLUDED_CODE: char = 'n';

/// Returns true if the usage string contains the client code (case-insensitive).
pub fn is_client_usage(usage: &str) -> bool {
    usage.to_lowercase().contains(CLIENT_CODE)
}

/// Returns true if the usage string contains the exclusion code (case-insensitive).
pub fn is_excluded_usage(usage: &str) -> bool {
    usage.to_lowercase().contains(EXCLUDED_CODE)
}

/// Description of one data column, taken from the schema sheet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnSchema {
    /// Position of the column in both the schema and the data sheet
    pub index: usize,
    pub name: String,
    pub declared_type: String,
    pub usage: String,
    /// Empty when the description row is shorter than the name row
    pub description: String,
}

impl ColumnSchema {
    pub fn is_client(&self) -> bool {
        is_client_usage(&self.usage)
    }

    pub fn target_type(&self) -> TargetType {
        map_type(&self.declared_type)
    }
}

/// Names of the data and schema sheets of a table workbook.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableSheets {
    pub data: String,
    pub schema: String,
}

/// Picks the data and schema sheets by position.
///
/// # Errors
///
/// Returns [`WorkbookError::NotEnoughSheets`] when the workbook has fewer than two sheets.
pub fn select_sheets<W>(workbook: &W) -> Result<TableSheets, WorkbookError>
where
    W: Workbook + ?Sized,
{
    match (
        workbook.sheet_name_at(DATA_SHEET_INDEX),
        workbook.sheet_name_at(SCHEMA_SHEET_INDEX),
    ) {
        (Some(data), Some(schema)) => Ok(TableSheets { data, schema }),
        _ => Err(WorkbookError::NotEnoughSheets {
            required: SCHEMA_SHEET_INDEX + 1,
            found: workbook.sheet_names().len(),
        }),
    }
}

/// Reads all rows of a sheet, attributing failures to the workbook layer.
pub fn read_sheet<W>(workbook: &mut W, sheet_name: &str) -> Result<Vec<Vec<String>>, WorkbookError>
where
    W: Workbook + ?Sized,
{
    workbook
        .read_rows(sheet_name)
        .map_err(|source| WorkbookError::Read {
            sheet: sheet_name.to_owned(),
            source,
        })
}

/// Checks that the schema sheet has at least `required` header rows.
pub fn require_rows(sheet: &str, rows: &[Vec<String>], required: usize) -> Result<(), SchemaError> {
    if rows.len() < required {
        return Err(SchemaError::NotEnoughRows {
            sheet: sheet.to_owned(),
            required,
            found: rows.len(),
        });
    }
    Ok(())
}

/// Returns the cell at `(row, column)` or an empty string when the row is too short.
pub fn cell_at(rows: &[Vec<String>], row: usize, column: usize) -> &str {
    rows.get(row)
        .and_then(|cells| cells.get(column))
        .map(String::as_str)
        .unwrap_or("")
}

/// Reads the client-visible columns of a table workbook.
///
/// # Errors
///
/// Fails with a [`WorkbookError`] when the workbook has fewer than two sheets
/// and with a [`SchemaError`] when the schema sheet has fewer than four rows.
pub fn read_schema<W>(workbook: &mut W) -> Result<Vec<ColumnSchema>, TableError>
where
    W: Workbook + ?Sized,
{
    let sheets = select_sheets(workbook)?;
    let rows = read_sheet(workbook, &sheets.schema)?;
    Ok(columns_from_rows(&sheets.schema, &rows)?)
}

/// Builds the client-visible columns from the raw schema rows.
///
/// Columns are walked along the name row. A column is skipped when the type
/// or usage row is too short to reach it, and dropped unless its usage
/// contains the client code. A short description row yields empty descriptions.
pub fn columns_from_rows(sheet: &str, rows: &[Vec<String>]) -> Result<Vec<ColumnSchema>, SchemaError> {
    require_rows(sheet, rows, SCHEMA_ROWS)?;
    let names = &rows[NAME_ROW];
    let types = &rows[TYPE_ROW];
    let usages = &rows[USAGE_ROW];

    let columns = names
        .iter()
        .enumerate()
        .take_while(|(index, _)| *index < types.len() && *index < usages.len())
        .map(|(index, name)| ColumnSchema {
            index,
            name: name.to_owned(),
            declared_type: types[index].to_owned(),
            usage: usages[index].to_owned(),
            description: cell_at(rows, DESCRIPTION_ROW, index).to_owned(),
        })
        .filter(|column| {
            let keep = column.is_client();
            if !keep {
                debug!(sheet, column = %column.name, usage = %column.usage, "Skipping non-client column");
            }
            keep
        })
        .collect();
    Ok(columns)
}
