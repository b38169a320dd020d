//! CLI argument definitions.

use super::validators::{parse_imgsz, parse_threshold};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Segetal plant species segmentation masks and their accuracy on UAV imagery.
#[derive(Debug, Parser)]
#[command(name = "segflora")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (default: platform config directory).
    #[arg(long, global = true, env = "SEGFLORA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Root directory the default layout is resolved against.
    #[arg(long, global = true, env = "SEGFLORA_DATA_ROOT")]
    pub data_root: Option<PathBuf>,

    /// Suppress progress output and info logging.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable progress bars.
    #[arg(long, global = true)]
    pub no_progress: bool,

    /// Increase verbosity (-v: debug, -vv: trace+ORT info, -vvv: trace+ORT debug).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Segment tiles and write per-species masks.
    Predict(PredictArgs),
    /// Compare predicted masks with ground truth and write the result table.
    Evaluate(EvaluateArgs),
    /// List configured species and their resolved directories.
    Species,
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

/// Arguments for the predict command.
#[derive(Debug, Args)]
pub struct PredictArgs {
    /// Species to process by key or name (default: all configured).
    #[arg(short, long, value_delimiter = ',')]
    pub species: Vec<String>,

    /// Directory with input tiles.
    #[arg(short, long, env = "SEGFLORA_TILES_DIR")]
    pub tiles: Option<PathBuf>,

    /// ONNX model file (only with a single species).
    #[arg(short, long)]
    pub model: Option<PathBuf>,

    /// Minimum detection confidence (0.0-1.0).
    #[arg(short, long, value_parser = parse_threshold)]
    pub confidence: Option<f32>,

    /// Network input size in pixels.
    #[arg(long, value_parser = parse_imgsz)]
    pub imgsz: Option<u32>,

    /// Also write tiles with the species mask blended in.
    #[arg(long)]
    pub save_annotated: bool,

    /// Stop on first error.
    #[arg(long)]
    pub fail_fast: bool,
}

/// Arguments for the evaluate command.
#[derive(Debug, Args)]
pub struct EvaluateArgs {
    /// Species to evaluate by key or name (default: all configured).
    #[arg(short, long, value_delimiter = ',')]
    pub species: Vec<String>,

    /// Result CSV path.
    #[arg(short, long, env = "SEGFLORA_RESULTS_CSV")]
    pub output: Option<PathBuf>,

    /// Also write a JSON summary to this path.
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Skip masks that fail to evaluate instead of aborting.
    #[arg(long)]
    pub keep_going: bool,

    /// Disable UTF-8 BOM in CSV output.
    #[arg(long)]
    pub no_csv_bom: bool,
}
