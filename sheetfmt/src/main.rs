use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use sheetfmt_core::reader::cell_ref::{MAX_COLUMN, column_from_letters};
use sheetfmt_core::{ExtractConfig, Extractor};
use std::path::PathBuf;

mod formatter;

#[derive(Parser)]
#[command(name = "sheetfmt")]
#[command(about = "Report the number format of every styled cell in an XLSX column", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the XLSX workbook
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Sheet to read (repeatable, defaults to every sheet)
    #[arg(short, long = "sheet", value_name = "SHEET")]
    sheets: Vec<String>,

    /// Column to read, as a number (3) or letters (C)
    #[arg(short, long, value_name = "COLUMN", value_parser = parse_column)]
    column: Option<u32>,

    /// Path to configuration file (TOML)
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    format: OutputFormat,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON records, one object per sheet
    Json,
}

fn parse_column(value: &str) -> Result<u32> {
    let value = value.trim();
    let column = if value.chars().all(|c| c.is_ascii_digit()) && !value.is_empty() {
        value
            .parse::<u32>()
            .with_context(|| format!("invalid column number '{}'", value))?
    } else {
        match column_from_letters(value) {
            Some(column) => column,
            None => bail!("'{}' is neither a column number nor column letters", value),
        }
    };

    if column == 0 || column > MAX_COLUMN {
        bail!("column {} is outside 1..={}", column, MAX_COLUMN);
    }
    Ok(column)
}

fn load_config(cli: &Cli) -> Result<ExtractConfig> {
    let mut config = if let Some(config_path) = &cli.config {
        ExtractConfig::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        // Try to load default config from current directory if it exists
        let default_config_path = PathBuf::from("sheetfmt.toml");
        if default_config_path.exists() {
            ExtractConfig::from_file(&default_config_path).with_context(|| {
                format!(
                    "Failed to load config from {}",
                    default_config_path.display()
                )
            })?
        } else {
            ExtractConfig::default()
        }
    };

    // Command-line flags win over the file
    if !cli.sheets.is_empty() {
        config.sheets = cli.sheets.clone();
    }
    if let Some(column) = cli.column {
        config.column = column;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let extractor = Extractor::with_config(config);
    let results = extractor
        .extract_file(&cli.file)
        .with_context(|| format!("Failed to read number formats from {}", cli.file.display()))?;

    match cli.format {
        OutputFormat::Human => {
            formatter::print_human(&cli.file, &results);
        }
        OutputFormat::Json => {
            formatter::print_json(&cli.file, &results)?;
        }
    }

    Ok(())
}
