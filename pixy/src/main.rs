//! Pixy CLI - Expand PX files into labeled records
//!
//! ```bash
//! pixy records population.px                 # JSON array on stdout
//! pixy records population.px -f csv -o out.csv
//! pixy statements population.px             # Dump every KEY=VALUE statement
//! pixy dimensions population.px             # Show dimensions and record count
//! ```
//!
//! `PIXY_ENCODING`, `PIXY_FORMAT` and `PIXY_LOG_FORMAT` (also read from `.env`)
//! set defaults for `--encoding`, `--format` and `--log-format`.
//!
//! With `-o` the output file is only replaced once the run succeeded.

use clap::{Parser, Subcommand};
use pixy::logs::{init_logging, log_error, log_info, log_success, LogFormat};
use pixy::{
    convert_file, convert_file_to, inspect_file, parse, read_file, ConvertOptions, ExportFormat,
};
use serde_json::json;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pixy")]
#[command(about = "Expand PX statistical files into labeled records", long_about = None)]
struct Cli {
    /// Progress output on stderr
    #[arg(long, global = true, value_enum, env = "PIXY_LOG_FORMAT", default_value = "text")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand DATA into one record per dimension combination
    Records {
        /// Input PX file
        input: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, env = "PIXY_FORMAT", default_value = "json")]
        format: ExportFormat,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Input encoding (auto-detect if not specified)
        #[arg(short, long, env = "PIXY_ENCODING")]
        encoding: Option<String>,

        /// Stop after this many records
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Dump every statement as JSON
    Statements {
        /// Input PX file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Input encoding (auto-detect if not specified)
        #[arg(short, long, env = "PIXY_ENCODING")]
        encoding: Option<String>,
    },

    /// Show dimensions and the expected record count
    Dimensions {
        /// Input PX file
        input: PathBuf,

        /// Input encoding (auto-detect if not specified)
        #[arg(short, long, env = "PIXY_ENCODING")]
        encoding: Option<String>,
    },
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.log_format);

    let result = match cli.command {
        Commands::Records {
            input,
            format,
            output,
            encoding,
            limit,
        } => cmd_records(&input, format, output.as_deref(), encoding, limit),

        Commands::Statements {
            input,
            output,
            encoding,
        } => cmd_statements(&input, output.as_deref(), encoding.as_deref()),

        Commands::Dimensions { input, encoding } => cmd_dimensions(&input, encoding.as_deref()),
    };

    if let Err(e) = result {
        log_error(format!("Error: {}", e));
        std::process::exit(1);
    }
}

fn cmd_records(
    input: &Path,
    format: ExportFormat,
    output: Option<&Path>,
    encoding: Option<String>,
    limit: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = ConvertOptions {
        encoding,
        format,
        limit,
    };

    match output {
        Some(p) => convert_file_to(input, &options, p)?,
        None => convert_file(input, &options, open_output(None)?)?,
    };
    Ok(())
}

fn cmd_statements(
    input: &Path,
    output: Option<&Path>,
    encoding: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    log_info(format!("📄 Parsing PX: {}", input.display()));

    let decoded = read_file(input, encoding)?;
    log_success(format!("Encoding: {}", decoded.encoding));

    let mut statements = Vec::new();
    for statement in parse(&decoded.content) {
        let statement = statement?;
        let values = statement.values.collect_all()?;
        statements.push(json!({ "key": statement.key, "values": values }));
    }
    log_success(format!("Parsed {} statements", statements.len()));

    let mut writer = open_output(output)?;
    serde_json::to_writer_pretty(&mut writer, &statements)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

fn cmd_dimensions(input: &Path, encoding: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let (_, info) = inspect_file(input, encoding)?;

    for (title, count) in &info.dimensions {
        println!("{}\t{}", title, count);
    }
    match info.expected_records {
        Some(n) => println!("records\t{}", n),
        None => println!("records\toverflow"),
    }
    println!("data\t{}", if info.has_data { "present" } else { "missing" });
    Ok(())
}

fn open_output(path: Option<&Path>) -> io::Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) => {
            if let Some(parent) = p.parent().filter(|d| !d.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            Box::new(BufWriter::new(File::create(p)?))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}
