//! Command-line interface for vidcat.
//!
//! `vidcat merge` concatenates the ordered video files from an input
//! directory into one output file; `vidcat info` probes and lists them
//! without merging.

use clap::{Parser, Subcommand};
use console::style;
use std::path::PathBuf;
use std::process;

mod commands;
mod logging;
mod progress;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "vidcat: ordered video concatenation",
    long_about = "Merges an ordered set of video files into one output using \
                  ffmpeg's concat demuxer (stream copy, no re-encoding)."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output on the console
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Merges the video files from the input directory into one file
    Merge(MergeArgs),
    /// Probes the input files and prints their metadata without merging
    Info(InfoArgs),
}

#[derive(Parser, Debug)]
pub struct MergeArgs {
    /// Directory containing the input files
    #[arg(default_value = "video", value_name = "INPUT_DIR")]
    pub input_dir: PathBuf,

    /// Directory the merged file is written to
    #[arg(short = 'd', long = "output-dir", default_value = "output", value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Output filename (defaults to merged_<timestamp> with the container extension)
    #[arg(short = 'o', long = "output", value_name = "NAME")]
    pub output_name: Option<String>,

    /// Kill the merge if it runs longer than this many seconds
    #[arg(long = "timeout", value_name = "SECONDS")]
    pub timeout_secs: Option<u64>,
}

#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Directory containing the input files
    #[arg(default_value = "video", value_name = "INPUT_DIR")]
    pub input_dir: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    let log_dir = match &cli.command {
        Commands::Merge(args) => args.output_dir.join("logs"),
        Commands::Info(_) => std::env::temp_dir().join("vidcat_logs"),
    };
    if let Err(e) = logging::setup(&log_dir, cli.verbose) {
        eprintln!("{} {e:#}", style("Error:").red().bold());
        process::exit(1);
    }

    let result = match cli.command {
        Commands::Merge(args) => commands::merge::run_merge(args),
        Commands::Info(args) => commands::info::run_info(args),
    };

    if let Err(e) = result {
        log::error!("{e:#}");
        eprintln!("{} {e:#}", style("Error:").red().bold());
        process::exit(1);
    }
}
