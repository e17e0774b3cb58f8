use clap::{ArgGroup, Parser, Subcommand};
use retmap_lib::FileType;
use simplelog::LevelFilter;
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Log level for output (error, warn, info, debug, trace)
    #[arg(global = true, long, default_value = "info")]
    pub loglevel: LevelFilter,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute retinotopic maps from a recorded dataset
    Compute(ComputeArgs),

    /// List the fields of a dataset container
    Inspect(InspectArgs),
}

#[derive(Parser)]
#[command(group = ArgGroup::new("sink").required(true).multiple(true).args(&["output", "print"]))]
pub struct ComputeArgs {
    /// Input dataset container
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output file for the computed maps
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Specify output format, 'rtm' or 'csv'
    #[arg(long, default_value = "rtm")]
    pub format: FileType,

    /// Sampling interval of the movies in seconds
    #[arg(long, default_value = "0.1")]
    pub sample_interval: f64,

    /// Warm-up samples trimmed from the start of each movie
    #[arg(long, default_value = "20")]
    pub trim: usize,

    /// Delay ceiling for the vertical-bar (left/right) axis in seconds
    #[arg(long, default_value = "9.3")]
    pub vertical_ceiling: f64,

    /// Delay ceiling for the horizontal-bar (up/down) axis in seconds
    #[arg(long, default_value = "8.6")]
    pub horizontal_ceiling: f64,

    /// Frequency bin of the stimulus fundamental
    #[arg(long, default_value = "1")]
    pub frequency_bin: usize,

    /// Skip the legacy re-anchoring of the azimuth map by its own minimum
    #[arg(long, default_value = "false")]
    pub no_azimuth_shift: bool,

    /// Whether to print per-map summary statistics
    #[arg(long, default_value = "false")]
    pub print: bool,
}

#[derive(Parser)]
pub struct InspectArgs {
    /// Input dataset container
    #[arg(short, long)]
    pub input: PathBuf,
}
