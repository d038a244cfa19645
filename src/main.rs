use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use rusty_table::config::{
    Config, Mode, DEFAULT_CLASS_DIR, DEFAULT_CSV_DIR, DEFAULT_EXTENSION, DEFAULT_INPUT_DIR,
};
use rusty_table::{CsvOptions, TableError};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rusty-table")]
#[command(about = "Export game configuration spreadsheets to CSV and C# table classes")]
struct Cli {
    /// Log per-row and per-column decisions
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Export client columns of every spreadsheet to CSV
    Csv {
        /// Directory holding the spreadsheets
        #[arg(default_value = DEFAULT_INPUT_DIR)]
        input: PathBuf,

        /// Directory receiving the CSV files
        #[arg(default_value = DEFAULT_CSV_DIR)]
        output: PathBuf,

        /// Wrap each arr<...> group in parentheses instead of stripping them
        #[arg(long)]
        add_bracket: bool,

        /// Spreadsheet file extension to pick up
        #[arg(long, default_value = DEFAULT_EXTENSION)]
        extension: String,
    },

    /// Generate a C# class per spreadsheet and the aggregate loader
    Classes {
        /// Directory holding the spreadsheets
        #[arg(default_value = DEFAULT_INPUT_DIR)]
        input: PathBuf,

        /// Directory receiving the generated sources
        #[arg(default_value = DEFAULT_CLASS_DIR)]
        output: PathBuf,

        /// Spreadsheet file extension to pick up
        #[arg(long, default_value = DEFAULT_EXTENSION)]
        extension: String,
    },

    /// Export CSV files, then generate classes
    All {
        /// Directory holding the spreadsheets
        #[arg(default_value = DEFAULT_INPUT_DIR)]
        input: PathBuf,

        /// Directory receiving the CSV files
        #[arg(long, default_value = DEFAULT_CSV_DIR)]
        csv_dir: PathBuf,

        /// Directory receiving the generated sources
        #[arg(long, default_value = DEFAULT_CLASS_DIR)]
        class_dir: PathBuf,

        /// Wrap each arr<...> group in parentheses instead of stripping them
        #[arg(long)]
        add_bracket: bool,

        /// Spreadsheet file extension to pick up
        #[arg(long, default_value = DEFAULT_EXTENSION)]
        extension: String,
    },
}

impl From<Commands> for Config {
    fn from(command: Commands) -> Self {
        let defaults = Config::default();
        match command {
            Commands::Csv {
                input,
                output,
                add_bracket,
                extension,
            } => Config {
                input_dir: input,
                csv_dir: output,
                mode: Mode::Csv,
                csv: CsvOptions { add_bracket },
                extension,
                ..defaults
            },
            Commands::Classes {
                input,
                output,
                extension,
            } => Config {
                input_dir: input,
                class_dir: output,
                mode: Mode::Classes,
                extension,
                ..defaults
            },
            Commands::All {
                input,
                csv_dir,
                class_dir,
                add_bracket,
                extension,
            } => Config {
                input_dir: input,
                csv_dir,
                class_dir,
                mode: Mode::All,
                csv: CsvOptions { add_bracket },
                extension,
            },
        }
    }
}

/// Message shown for the outcome of a run, if any.
///
/// Failures are reported to the user but never change the exit status.
fn report(result: Result<(), TableError>) -> Option<String> {
    match result {
        Ok(()) => None,
        Err(TableError::InputDirectoryMissing(directory)) => {
            Some(format!("Input directory does not exist: {directory}"))
        }
        Err(error) => Some(format!("Error: {error}")),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .try_init()
        .map_err(|error| anyhow!(error))
        .context("Cannot initialise logging")?;

    let config = Config::from(cli.command);
    if let Some(message) = report(rusty_table::run(&config)) {
        println!("{message}");
    }
    Ok(())
}
