use crate::spreadsheet::{SpreadsheetError, Workbook};

/// A workbook held entirely in memory.
///
/// Rows are stored exactly as given, so callers control row lengths the same
/// way a trimmed spreadsheet row would look.
#[derive(Clone, Debug, Default)]
pub struct MemoryWorkbook {
    sheets: Vec<(String, Vec<Vec<String>>)>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a sheet after the existing ones.
    pub fn with_sheet<R, C, S>(mut self, name: &str, rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        self.sheets.push((name.to_owned(), rows));
        self
    }
}

impl Workbook for MemoryWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|(name, _)| name.to_owned()).collect()
    }

    fn read_rows(&mut self, sheet_name: &str) -> Result<Vec<Vec<String>>, SpreadsheetError> {
        self.sheets
            .iter()
            .find(|(name, _)| name == sheet_name)
            .map(|(_, rows)| rows.clone())
            .ok_or_else(|| SpreadsheetError::SheetNotFound {
                name: sheet_name.to_owned(),
            })
    }
}
