use crate::exporter::CsvOptions;
use std::path::PathBuf;

/// Input directory used when none is given.
pub const DEFAULT_INPUT_DIR: &str = "./asset/excel";
/// CSV output directory used when none is given.
pub const DEFAULT_CSV_DIR: &str = "./asset/csv";
/// Generated source directory used when none is given.
pub const DEFAULT_CLASS_DIR: &str = "./asset/table";
/// Extension of the spreadsheet files picked up from the input directory.
pub const DEFAULT_EXTENSION: &str = "xlsx";

/// Which artifacts a run produces.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// CSV exports only
    Csv,
    /// Table classes and the aggregate loader only
    Classes,
    /// CSV exports, then table classes
    #[default]
    All,
}

impl Mode {
    pub fn exports_csv(&self) -> bool {
        matches!(self, Self::Csv | Self::All)
    }

    pub fn generates_classes(&self) -> bool {
        matches!(self, Self::Classes | Self::All)
    }
}

/// Settings for one generator run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Directory scanned for spreadsheet files
    pub input_dir: PathBuf,
    /// Directory receiving `<table>.csv` files
    pub csv_dir: PathBuf,
    /// Directory receiving `<table>.cs` files and the loader
    pub class_dir: PathBuf,
    pub mode: Mode,
    pub csv: CsvOptions,
    /// Spreadsheet extension without the dot, e.g. `xlsx`
    pub extension: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            csv_dir: PathBuf::from(DEFAULT_CSV_DIR),
            class_dir: PathBuf::from(DEFAULT_CLASS_DIR),
            mode: Mode::default(),
            csv: CsvOptions::default(),
            extension: DEFAULT_EXTENSION.to_owned(),
        }
    }
}
