use thiserror::Error;

/// Errors raised while opening a workbook or selecting its worksheets.
#[derive(Error, Debug)]
pub enum WorkbookError {
    #[error("Cannot open workbook '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: crate::spreadsheet::SpreadsheetError,
    },

    #[error("Cannot read sheet '{sheet}': {source}")]
    Read {
        sheet: String,
        #[source]
        source: crate::spreadsheet::SpreadsheetError,
    },

    #[error("Workbook needs at least {required} sheets, found {found}")]
    NotEnoughSheets { required: usize, found: usize },
}

/// Errors raised when the schema worksheet does not carry the header rows a component needs.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Schema sheet '{sheet}' needs at least {required} rows, found {found}")]
    NotEnoughRows {
        sheet: String,
        required: usize,
        found: usize,
    },
}

/// Main error type for the table generator.
/// Aggregates errors from the workbook layer, schema validation and output writing.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("{0}")]
    WithContextError(String),

    #[error("{0}")]
    Workbook(#[from] WorkbookError),

    #[error("{0}")]
    Schema(#[from] SchemaError),

    // Standard library errors
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Fmt(#[from] std::fmt::Error),

    // Third-party library errors
    #[error("{0}")]
    Csv(#[from] csv::Error),

    #[error("{0}")]
    Pattern(#[from] glob::PatternError),

    // Driver errors
    #[error("Input directory '{0}' does not exist")]
    InputDirectoryMissing(String),

    #[error("No '*.{extension}' files found in '{directory}'")]
    NoInputFiles { directory: String, extension: String },
}

pub trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, TableError> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| TableError::WithContextError(format!("{}: {}", message, e)))
    }
}
