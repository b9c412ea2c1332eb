//! precompress CLI - compress bundler output ahead of time.
//!
//! # Commands
//!
//! - `precompress run <dir>` - Compress eligible files under `<dir>` once
//! - `precompress watch <dir>` - Compress, then recompress on every change
//! - `precompress algorithms` - List the algorithms compiled into this build
//!
//! Settings are read from `precompress.toml` or `precompress.json` in the
//! working directory (or `--config`), and flags override them.

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod console;
mod error;
mod settings;

use commands::{run, watch};
use error::CliResult;

/// precompress - Ahead-of-time compression for build output
#[derive(Parser)]
#[command(name = "precompress")]
#[command(author = "Pegasus Heavy Industries LLC")]
#[command(version)]
#[command(about = "Write .gz / .br companions next to bundler output")]
#[command(long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Enable debug logging (overridden by PRECOMPRESS_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a build output directory once
    #[command(alias = "r")]
    Run(CompressArgs),

    /// Compress, then keep recompressing changed files
    #[command(alias = "w")]
    Watch(WatchArgs),

    /// List supported algorithm identifiers
    Algorithms,
}

/// Options shared by `run` and `watch`.
#[derive(Args, Debug, Clone)]
pub struct CompressArgs {
    /// Build output directory, absolute or relative to the working directory
    pub dir: PathBuf,

    /// Configuration file (default: precompress.toml / precompress.json)
    #[arg(short, long, env = "PRECOMPRESS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Algorithm identifier (gzip, deflate, deflateRaw, brotliCompress, zstd)
    #[arg(short, long)]
    pub algorithm: Option<String>,

    /// Output suffix; defaults to .gz for gzip and .br for brotliCompress
    #[arg(short, long)]
    pub ext: Option<String>,

    /// Minimum file size in bytes
    #[arg(short, long)]
    pub threshold: Option<u64>,

    /// Regex selecting candidate files
    #[arg(short, long, conflicts_with = "all")]
    pub filter: Option<String>,

    /// Consider every file, not just scripts, styles and markup
    #[arg(long)]
    pub all: bool,

    /// Remove original files once compressed
    #[arg(long)]
    pub delete_origin: bool,

    /// Do not print the per-file summary
    #[arg(short, long)]
    pub quiet: bool,

    /// Compression option override, e.g. `level=6` or `params.quality=9`
    #[arg(short = 'o', long = "option", value_name = "KEY=VALUE")]
    pub options: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct WatchArgs {
    #[command(flatten)]
    pub compress: CompressArgs,

    /// Quiet period before a batch of changes triggers a run
    #[arg(long, default_value = "300")]
    pub debounce_ms: u64,
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env("PRECOMPRESS_LOG")
        .unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn list_algorithms() -> CliResult<()> {
    for algorithm in precompress_core::CompressionAlgorithm::all() {
        let ext = precompress_core::default_extension(algorithm.identifier()).unwrap_or("-");
        println!(
            "  {:<16} {} level {}-{}",
            algorithm.identifier().bright_cyan(),
            ext.dimmed(),
            algorithm.min_level(),
            algorithm.max_level()
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Handle color preferences
    if cli.no_color {
        colored::control::set_override(false);
    }
    init_tracing(cli.verbose);

    let result: CliResult<()> = match cli.command {
        Commands::Run(args) => run::run(&args).await,
        Commands::Watch(args) => watch::run(&args).await,
        Commands::Algorithms => list_algorithms(),
    };

    if let Err(e) = result {
        eprintln!("\n  {} {}\n", "Error:".red().bold(), e);
        std::process::exit(1);
    };
}
