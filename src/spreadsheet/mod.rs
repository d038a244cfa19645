//! # Spreadsheet Module
//!
//! Thin layer over the calamine readers. The rest of the crate only sees the
//! [`Workbook`] trait: a list of sheet names and, per sheet, its rows as text.
//! Cell decoding is left entirely to calamine; this module only renders the
//! decoded values to strings and keeps rows at their absolute sheet positions.
use crate::spreadsheet::SpreadsheetError::{InvalidFileFormat, SheetNotFound};
use calamine::{
    open_workbook, Data, Ods, OdsError, Range, Reader, Xls, XlsError, Xlsb, XlsbError, Xlsx,
    XlsxError,
};
use std::ffi::OsStr;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

pub mod cell;
pub mod memory;

pub use memory::MemoryWorkbook;

/// Custom error types for spreadsheet operations.
#[derive(Error, Debug)]
pub enum SpreadsheetError {
    /// Error in Excel 2007+ format (.xlsx, .xlsm, .xlam)
    #[error("Invalid xlsx file format: {0}")]
    InvalidXlsxFileFormat(#[from] XlsxError),

    /// Error in Excel Binary format (.xlsb)
    #[error("Invalid xlsb file format: {0}")]
    InvalidXlsbFileFormat(#[from] XlsbError),

    /// Error in legacy Excel format (.xls, .xla)
    #[error("Invalid xls file format: {0}")]
    InvalidXlsFileFormat(#[from] XlsError),

    /// Error in OpenDocument format (.ods)
    #[error("Invalid ods file format: {0}")]
    InvalidOdsFileFormat(#[from] OdsError),

    /// Unsupported or unrecognized file format
    #[error("Cannot detect file format for '{name}'")]
    InvalidFileFormat { name: String },

    /// Requested sheet does not exist in the workbook
    #[error("Sheet '{name}' not found")]
    SheetNotFound { name: String },
}

/// Read access to a workbook, as needed by the exporters and generators.
///
/// Rows are returned at their absolute positions: `rows[0]` is the first row
/// of the sheet even when it is blank. Trailing blank cells of a row and
/// trailing blank rows are dropped, so a row may be shorter than the widest
/// row of the sheet.
pub trait Workbook {
    /// Returns the names of all sheets in workbook order.
    fn sheet_names(&self) -> Vec<String>;

    /// Reads every row of the named sheet as rendered text.
    fn read_rows(&mut self, sheet_name: &str) -> Result<Vec<Vec<String>>, SpreadsheetError>;

    /// Returns the name of the sheet at the specified index.
    fn sheet_name_at(&self, index: usize) -> Option<String> {
        self.sheet_names().get(index).map(|name| name.to_owned())
    }
}

/// Type alias for buffered file reader
pub type FileReader = BufReader<File>;

/// Wrapper enum for different spreadsheet format readers.
///
/// This enum provides a unified interface over the various spreadsheet
/// formats supported by the calamine library.
pub enum Spreadsheet {
    /// Excel 2007+ format reader (.xlsx, .xlsm, .xlam)
    Xlsx(Xlsx<FileReader>),
    /// Excel Binary format reader (.xlsb)
    Xlsb(Xlsb<FileReader>),
    /// Legacy Excel format reader (.xls, .xla)
    Xls(Xls<FileReader>),
    /// OpenDocument format reader (.ods)
    Ods(Ods<FileReader>),
}

impl Spreadsheet {
    /// Opens a spreadsheet file and returns the appropriate reader.
    ///
    /// The format is picked from the file extension (case-insensitive):
    /// - `.xlsx`, `.xlsm`, `.xlam` - Excel 2007+ format
    /// - `.xlsb` - Excel Binary format
    /// - `.xls`, `.xla` - Legacy Excel format
    /// - `.ods` - OpenDocument format
    ///
    /// # Errors
    ///
    /// Returns an error if the extension is not supported or if calamine
    /// fails to open the file.
    pub fn open<P>(path: P) -> Result<Spreadsheet, SpreadsheetError>
    where
        P: AsRef<Path>,
    {
        let extension = path
            .as_ref()
            .extension()
            .and_then(OsStr::to_str)
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("xlsx") | Some("xlsm") | Some("xlam") => Ok(Self::Xlsx(open_workbook(path)?)),
            Some("xlsb") => Ok(Self::Xlsb(open_workbook(path)?)),
            Some("xls") | Some("xla") => Ok(Self::Xls(open_workbook(path)?)),
            Some("ods") => Ok(Self::Ods(open_workbook(path)?)),
            _ => Err(InvalidFileFormat {
                name: path.as_ref().to_string_lossy().to_string(),
            }),
        }
    }
}

impl Workbook for Spreadsheet {
    fn sheet_names(&self) -> Vec<String> {
        match self {
            Self::Xlsx(xlsx) => xlsx.sheet_names(),
            Self::Xlsb(xlsb) => xlsb.sheet_names(),
            Self::Xls(xls) => xls.sheet_names(),
            Self::Ods(ods) => ods.sheet_names(),
        }
    }

    fn read_rows(&mut self, sheet_name: &str) -> Result<Vec<Vec<String>>, SpreadsheetError> {
        if !self.sheet_names().iter().any(|name| name == sheet_name) {
            return Err(SheetNotFound {
                name: sheet_name.to_owned(),
            });
        }
        let range = match self {
            Self::Xlsx(xlsx) => xlsx.worksheet_range(sheet_name)?,
            Self::Xlsb(xlsb) => xlsb.worksheet_range(sheet_name)?,
            Self::Xls(xls) => xls.worksheet_range(sheet_name)?,
            Self::Ods(ods) => ods.worksheet_range(sheet_name)?,
        };
        Ok(range_to_rows(&range))
    }
}

/// Flattens a calamine range into text rows anchored at cell A1.
///
/// calamine ranges start at the first used cell; rows and columns before it
/// are filled with empty strings so positional indexes stay absolute.
fn range_to_rows(range: &Range<Data>) -> Vec<Vec<String>> {
    let Some((row_upper_bound, column_upper_bound)) = range.end() else {
        return Vec::new();
    };

    let mut rows: Vec<Vec<String>> = (0..=row_upper_bound)
        .map(|row| {
            let mut cells: Vec<String> = (0..=column_upper_bound)
                .map(|column| {
                    range
                        .get_value((row, column))
                        .map(cell::render)
                        .unwrap_or_default()
                })
                .collect();
            trim_trailing(&mut cells, String::is_empty);
            cells
        })
        .collect();
    trim_trailing(&mut rows, Vec::is_empty);
    rows
}

fn trim_trailing<T>(items: &mut Vec<T>, is_blank: impl Fn(&T) -> bool) {
    while items.last().is_some_and(&is_blank) {
        items.pop();
    }
}
