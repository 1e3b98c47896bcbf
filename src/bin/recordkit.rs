//! recordkit CLI - run function pipelines over JSON or CSV data
//!
//! Reads a JSON document or CSV file, applies a `|`-separated pipeline of
//! recordkit functions and prints the result.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::prelude::*;

use recordkit::{
    generate_usage_decorated, output_to_template, Config, Grid, PipelineEvaluator, Settings, Value,
};

#[derive(Parser)]
#[command(name = "recordkit")]
#[command(version, about = "Filter, sort and tabulate records from the command line", long_about = None)]
struct Cli {
    /// Settings file (falls back to RECORDKIT_CONFIG)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a pipeline over an input file
    Run {
        /// Pipeline source, e.g. 'sort "Volume" "dsc" | head 3 | table'
        #[arg(short, long)]
        template: String,

        /// Input file; stdin when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Input format; guessed from the file extension when omitted
        #[arg(long, value_enum)]
        format: Option<InputFormat>,

        /// Type name given to records read from JSON
        #[arg(long, default_value = "Row")]
        type_name: String,
    },

    /// Describe the structure of an input and the functions available to it
    Describe {
        /// Input file; stdin when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,

        #[arg(long, value_enum)]
        format: Option<InputFormat>,

        #[arg(long, default_value = "Row")]
        type_name: String,
    },

    /// List the enabled functions
    Functions {
        /// Show help for a single function
        #[arg(short, long)]
        name: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InputFormat {
    Json,
    /// Read as a grid of strings; pipe through `totable` to get records
    Csv,
}

fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing; stdout carries the output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref())?;
    let config = settings
        .to_config()
        .context("Failed to build function configuration")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Run {
            template,
            input,
            format,
            type_name,
        } => {
            let value = read_input(input.as_deref(), format, &type_name)?;
            output_to_template(
                &mut out,
                "run",
                &template,
                &value,
                Some(&config),
                &PipelineEvaluator,
            )
            .context("Pipeline failed")?;
            writeln!(out)?;
        }
        Commands::Describe {
            input,
            format,
            type_name,
        } => {
            let value = read_input(input.as_deref(), format, &type_name)?;
            let usage = generate_usage_decorated(&settings.flag, &value, &config)
                .context("Failed to describe input")?;
            write!(out, "{}", usage)?;
        }
        Commands::Functions { name } => print_functions(&mut out, &config, name.as_deref())?,
    }

    Ok(())
}

fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => std::env::var_os("RECORDKIT_CONFIG").map(PathBuf::from),
    };
    match path {
        Some(p) => {
            tracing::debug!("loading settings from {}", p.display());
            Settings::load_from_file(&p)
                .with_context(|| format!("Failed to load settings from {}", p.display()))
        }
        None => Ok(Settings::default()),
    }
}

fn print_functions(out: &mut impl Write, config: &Config, name: Option<&str>) -> Result<()> {
    match name {
        Some(name) => write!(out, "{}", config.function_help_single(name)?)?,
        None => write!(out, "{}", config.function_help())?,
    }
    Ok(())
}

fn read_input(path: Option<&Path>, format: Option<InputFormat>, type_name: &str) -> Result<Value> {
    let contents = match path {
        Some(p) => fs::read_to_string(p)
            .with_context(|| format!("Failed to read input file {}", p.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    let format = format.unwrap_or_else(|| guess_format(path));
    match format {
        InputFormat::Json => {
            let json: serde_json::Value =
                serde_json::from_str(&contents).context("Input is not valid JSON")?;
            Ok(Value::from_json(&json, type_name)?)
        }
        InputFormat::Csv => Ok(Value::Grid(read_grid(&contents)?)),
    }
}

fn guess_format(path: Option<&Path>) -> InputFormat {
    match path.and_then(|p| p.extension()).and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => InputFormat::Csv,
        _ => InputFormat::Json,
    }
}

fn read_grid(contents: &str) -> Result<Grid> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(contents.as_bytes());

    let mut grid = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to parse CSV line {}", i + 1))?;
        grid.push(record.iter().map(str::to_string).collect());
    }
    if grid.is_empty() {
        bail!("CSV input is empty");
    }
    Ok(grid)
}
