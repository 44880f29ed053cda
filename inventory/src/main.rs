//! table-inventory CLI - inspect what a device table turns into
//!
//! ```bash
//! table-inventory load devices.csv              # Inventory as JSON
//! table-inventory load devices.xlsx             # First worksheet of a workbook
//! table-inventory load devices.csv -c opts.json # With custom load options
//! table-inventory rows devices.csv              # Parsed rows as JSON
//! table-inventory default-config                # Default load options
//! ```
//!
//! Options are read from `--config`, or from the file named by
//! `TABLE_INVENTORY_CONFIG` (a `.env` file is honoured).

use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use table_inventory::config::CONFIG_ENV_VAR;
use table_inventory::diagnostics::format_diagnostic;
use table_inventory::{
    collect_rows, DelimitedSource, InputFormat, JsonRecordsSource, LoadOptions, Normalizer, Row,
    RowSource, SheetSource,
};

#[derive(Parser)]
#[command(name = "table-inventory")]
#[command(about = "Turn flat device tables into a host inventory", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a table and output the inventory
    Load {
        /// Input table (.csv/.tsv/.txt, .xlsx/.xls/.ods, or .json array of objects)
        input: PathBuf,

        /// Load options JSON file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Delimiter (auto-detect if not specified)
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Parse a table and output its rows
    Rows {
        /// Input table
        input: PathBuf,

        /// Delimiter (auto-detect if not specified)
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the default load options
    DefaultConfig,
}

type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Load {
            input,
            config,
            delimiter,
            output,
        } => cmd_load(&input, config.as_deref(), delimiter, output.as_deref()),

        Commands::Rows {
            input,
            delimiter,
            output,
        } => cmd_rows(&input, delimiter, output.as_deref()),

        Commands::DefaultConfig => cmd_default_config(),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn delimited(input: &Path, delimiter: Option<char>) -> CliResult<DelimitedSource> {
    let source = DelimitedSource::from_path(input)?;
    eprintln!("   Encoding: {}", source.encoding());
    let source = match delimiter {
        Some(d) => source.with_delimiter(d),
        None => source,
    };
    eprintln!(
        "   Delimiter: '{}'{}",
        format_delimiter(source.delimiter()),
        if delimiter.is_none() { " (auto-detected)" } else { "" }
    );
    Ok(source)
}

fn sheet(input: &Path) -> CliResult<SheetSource> {
    let source = SheetSource::from_path(input)?;
    eprintln!("   Sheet rows: {}", source.len());
    Ok(source)
}

fn load_options(config: Option<&Path>) -> CliResult<LoadOptions> {
    let path = config
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));

    match path {
        Some(p) => {
            eprintln!("   Options: {}", p.display());
            Ok(LoadOptions::from_json_file(&p)?)
        }
        None => Ok(LoadOptions::default()),
    }
}

fn cmd_load(
    input: &Path,
    config: Option<&Path>,
    delimiter: Option<char>,
    output: Option<&Path>,
) -> CliResult {
    eprintln!("📄 Loading: {}", input.display());

    let normalizer = Normalizer::new(load_options(config)?)?;
    let report = match InputFormat::from_path(input) {
        InputFormat::Json => normalizer.load_source(JsonRecordsSource::from_path(input)?)?,
        InputFormat::Sheet => normalizer.load_source(sheet(input)?)?,
        InputFormat::Delimited => normalizer.load_source(delimited(input, delimiter)?)?,
    };

    for entry in report.diagnostics.iter() {
        eprintln!("{}", format_diagnostic(entry));
    }

    write_output(&report.inventory.to_json()?, output)
}

fn cmd_rows(input: &Path, delimiter: Option<char>, output: Option<&Path>) -> CliResult {
    eprintln!("📄 Parsing: {}", input.display());

    let rows = match InputFormat::from_path(input) {
        InputFormat::Json => read_rows(JsonRecordsSource::from_path(input)?)?,
        InputFormat::Sheet => read_rows(sheet(input)?)?,
        InputFormat::Delimited => read_rows(delimited(input, delimiter)?)?,
    };
    eprintln!("✅ Parsed {} rows", rows.len());

    write_output(&serde_json::to_string_pretty(&rows)?, output)
}

fn read_rows<S: RowSource>(source: S) -> CliResult<Vec<Row>> {
    Ok(collect_rows(source)?)
}

fn cmd_default_config() -> CliResult {
    println!("{}", LoadOptions::default().to_json()?);
    Ok(())
}

fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}

fn write_output(content: &str, path: Option<&Path>) -> CliResult {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
