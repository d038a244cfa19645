//! # Rusty Table
//!
//! Build-time generator for game configuration tables kept in spreadsheets.
//!
//! Each table workbook holds its data rows on the first sheet and a four-row
//! schema on the second one (field names, declared types, usage codes,
//! descriptions). From a directory of such workbooks the generator produces:
//!
//! - **CSV exports** of the client-visible columns, one file per table
//! - **C# table classes**, one per table, with lookup and bulk-load members
//! - **An aggregate loader** that starts every table's load and awaits them all
//!
//! ## Usage codes
//!
//! A column is client-visible when its usage contains `c` (any case). The CSV
//! export additionally drops columns whose usage contains `n`.
//!
//! ## Formats
//!
//! Workbooks are read through calamine: `.xlsx`, `.xlsm`, `.xlam`, `.xlsb`,
//! `.xls`, `.xla` and `.ods`.
pub mod batch;
pub mod config;
pub mod error;
pub mod exporter;
pub mod generator;
pub mod schema;
pub mod spreadsheet;

pub use batch::{convert_all_classes, convert_all_csv, run, BatchReport};
pub use config::{Config, Mode};
pub use error::{SchemaError, TableError, WorkbookError};
pub use exporter::{export_csv, CsvOptions};
pub use generator::class::generate_class;
pub use generator::loader::generate_loader;
pub use schema::types::{map_type, TargetType};
pub use schema::{read_schema, ColumnSchema};
pub use spreadsheet::{MemoryWorkbook, Spreadsheet, Workbook};
