//! restsheet CLI - REST API test cases from Excel workbooks
//!
//! A command-line tool for listing worksheets, projecting header-keyed rows,
//! and dumping decoded cell grids from .xlsx files.

use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use restsheet::render::JsonFormat;
use restsheet::LoadOptions;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

/// REST API test cases from Excel workbooks
#[derive(Parser)]
#[command(
    name = "restsheet",
    author = "iyulab",
    version,
    about = "Read REST API test cases from .xlsx workbooks",
    long_about = "restsheet - Excel-driven REST API test case loader.\n\n\
                  Lists worksheets, projects rows under a header row into JSON, \
                  and dumps decoded cell grids."
)]
struct Cli {
    /// Log parsing details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List worksheet titles with their dimensions
    #[command(visible_alias = "ls")]
    Sheets {
        /// Input file path
        input: PathBuf,
    },

    /// Project rows below a header row into JSON
    Rows {
        /// Input file path
        input: PathBuf,

        /// Worksheet title (case-insensitive)
        #[arg(short, long)]
        sheet: String,

        /// 1-based row number of the header row
        #[arg(long, default_value = "1")]
        header_row: usize,

        /// Comma-separated column names to keep (default: all header names)
        #[arg(short, long, value_delimiter = ',')]
        columns: Option<Vec<String>>,

        /// Keep only rows whose test-case column reads TRUE
        #[arg(short, long)]
        test_cases: bool,

        /// Name of the test-case column
        #[arg(long, default_value = restsheet::options::DEFAULT_TEST_CASE_COLUMN)]
        test_case_column: String,

        /// Output compact JSON (no indentation)
        #[arg(long)]
        compact: bool,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Dump a worksheet's decoded cell grid
    Dump {
        /// Input file path
        input: PathBuf,

        /// Worksheet title (case-insensitive)
        #[arg(short, long)]
        sheet: String,

        /// Only rows whose first cell has text
        #[arg(short, long)]
        populated: bool,

        /// Output format
        #[arg(long, default_value = "text")]
        format: DumpFormat,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

/// Grid dump format
#[derive(Clone, ValueEnum)]
enum DumpFormat {
    /// Tab-separated text
    Text,
    /// Pretty JSON
    Json,
}

/// Writes `log` records to stderr.
struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level = match record.level() {
            log::Level::Error => "error".red().bold(),
            log::Level::Warn => "warn".yellow().bold(),
            log::Level::Info => "info".green(),
            log::Level::Debug => "debug".blue(),
            log::Level::Trace => "trace".dimmed(),
        };
        eprintln!("{} {}", level, record.args());
    }

    fn flush(&self) {}
}

fn init_logging(verbose: bool) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(if verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        });
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Sheets { input } => {
            let pb = create_spinner("Reading workbook...");
            let workbook = restsheet::open_workbook(&input)?;
            pb.finish_and_clear();

            println!("{}", "Worksheets".cyan().bold());
            println!("{}", "─".repeat(40));
            for sheet in workbook.worksheets() {
                println!(
                    "{}  {} rows x {} columns",
                    sheet.title().bold(),
                    sheet.row_count(),
                    sheet.column_count()
                );
            }
            if workbook.is_empty() {
                println!("{} No worksheets found", "!".yellow().bold());
            }
        }

        Commands::Rows {
            input,
            sheet,
            header_row,
            columns,
            test_cases,
            test_case_column,
            compact,
            output,
        } => {
            let pb = create_spinner("Reading workbook...");

            let mut options = LoadOptions::new()
                .with_header_row(header_row)
                .with_test_cases_only(test_cases)
                .with_test_case_column(test_case_column);
            if let Some(columns) = columns {
                options = options.with_columns(columns);
            }

            let rows = restsheet::load_rows_with_options(&input, &sheet, &options)?;
            pb.set_message("Rendering to JSON...");

            let format = if compact {
                JsonFormat::Compact
            } else {
                JsonFormat::Pretty
            };
            let json = restsheet::render::rows_to_json(&rows, format)?;

            pb.finish_and_clear();
            write_output(output.as_ref(), &json)?;

            if let Some(path) = output {
                println!(
                    "{} Wrote {} rows: {}",
                    "✓".green().bold(),
                    rows.len(),
                    path.display()
                );
            }
        }

        Commands::Dump {
            input,
            sheet,
            populated,
            format,
            output,
        } => {
            let pb = create_spinner("Reading workbook...");

            let workbook = restsheet::open_workbook(&input)?;
            let worksheet = workbook.worksheet(&sheet)?;
            let content = match format {
                DumpFormat::Text => restsheet::render::worksheet_to_text(worksheet, populated),
                DumpFormat::Json if populated => {
                    serde_json::to_string_pretty(&worksheet.populated_rows())?
                }
                DumpFormat::Json => {
                    restsheet::render::worksheet_to_json(worksheet, JsonFormat::Pretty)?
                }
            };

            pb.finish_and_clear();
            write_output(output.as_ref(), &content)?;

            if let Some(path) = output {
                println!(
                    "{} Dumped '{}': {}",
                    "✓".green().bold(),
                    worksheet.title(),
                    path.display()
                );
            }
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

fn print_version() {
    println!("{} {}", "restsheet".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("REST API test cases from Excel workbooks");
    println!();
    println!("Supported formats: XLSX");
    println!("Repository: https://github.com/iyulab/restsheet");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn write_output(path: Option<&PathBuf>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", content)?;
        }
    }
    Ok(())
}
