//! flatepool - pooled raw DEFLATE compression from the command line
//!
//! Reads a payload from a file or stdin, runs it through a
//! [`CompressionService`] and writes the result to a file or stdout.

mod json_output;
mod settings;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flatepool_compression::CompressionService;
use json_output::StatsReport;
use settings::Overrides;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// flatepool - pooled raw DEFLATE compression
#[derive(Parser)]
#[command(
    name = "flatepool",
    version = env!("CARGO_PKG_VERSION"),
    about = "Compress and decompress raw DEFLATE streams",
    long_about = "flatepool compresses and decompresses raw DEFLATE (RFC 1951) streams\n\
                  through a service that reuses engines and buffers between calls."
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Verbose mode - detailed output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Compression level (0-9)
    #[arg(short, long, global = true)]
    level: Option<u32>,

    /// Maximum decompressed size in bytes
    #[arg(long, global = true, conflicts_with = "no_output_limit")]
    max_output: Option<usize>,

    /// Disable the decompressed size ceiling
    #[arg(long, global = true)]
    no_output_limit: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress input into a raw DEFLATE stream
    Compress {
        /// Input file (stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Decompress a raw DEFLATE stream
    Decompress {
        /// Input file (stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the effective configuration as TOML
    Config {
        /// Write the configuration to this file instead of stdout
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Round-trip the input and print service statistics as JSON
    Stats {
        /// Input file (stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.debug, cli.quiet, cli.verbose)?;

    info!("flatepool v{} starting", env!("CARGO_PKG_VERSION"));

    let overrides = Overrides {
        level: cli.level,
        max_output: cli.max_output,
        no_output_limit: cli.no_output_limit,
    };
    let config = settings::resolve(cli.config.as_deref(), &overrides)?;

    match cli.command {
        Commands::Compress { input, output } => {
            let service = CompressionService::new(config)?;
            let data = read_input(input.as_deref())?;
            let compressed = service.compress(&data).context("Compression failed")?;
            info!(
                "Compressed {} bytes into {} bytes",
                data.len(),
                compressed.len()
            );
            write_output(output.as_deref(), &compressed)?;
        }
        Commands::Decompress { input, output } => {
            let service = CompressionService::new(config)?;
            let data = read_input(input.as_deref())?;
            let decompressed = service
                .decompress(&data)
                .context("Decompression failed")?;
            info!(
                "Decompressed {} bytes into {} bytes",
                data.len(),
                decompressed.len()
            );
            write_output(output.as_deref(), &decompressed)?;
        }
        Commands::Config { save } => match save {
            Some(path) => {
                settings::save_to_file(&config, &path)?;
                info!("Configuration saved to {}", path.display());
            }
            None => print!("{}", settings::to_toml(&config)?),
        },
        Commands::Stats { input } => {
            let service = CompressionService::new(config)?;
            let data = read_input(input.as_deref())?;
            let report = stats_command(&service, &data)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            if !report.roundtrip_ok {
                anyhow::bail!("Round trip did not reproduce the input");
            }
        }
    }

    Ok(())
}

fn init_logging(debug: bool, quiet: bool, verbose: bool) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else if quiet {
        "error"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .context("Invalid log filter")?;

    // stdout carries payload bytes, so logs go to stderr
    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    Ok(())
}

fn stats_command(service: &CompressionService, data: &[u8]) -> Result<StatsReport> {
    let compressed = service.compress(data).context("Compression failed")?;
    let decompressed = service
        .decompress(&compressed)
        .context("Decompression failed")?;

    Ok(StatsReport::new(
        service.level().get(),
        data.len(),
        compressed.len(),
        decompressed == data,
        service.stats(),
    ))
}

fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) => {
            fs::read(path).with_context(|| format!("Failed to read input {}", path.display()))
        }
        None => {
            let mut data = Vec::new();
            io::stdin()
                .lock()
                .read_to_end(&mut data)
                .context("Failed to read stdin")?;
            Ok(data)
        }
    }
}

fn write_output(path: Option<&Path>, data: &[u8]) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, data).with_context(|| format!("Failed to write output {}", path.display()))
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(data).context("Failed to write stdout")?;
            stdout.flush().context("Failed to flush stdout")
        }
    }
}
