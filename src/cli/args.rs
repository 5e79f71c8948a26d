//! Command line argument parsing for the segscan CLI using clap.

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::backend::BackendKind;

/// segscan - segmented scans over integer vectors
#[derive(Parser, Debug, Clone)]
#[command(name = "segscan")]
#[command(about = "Run segmented prefix scans over integer vectors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct SegScanArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Backend configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE", env = "SEGSCAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Backend to run on (overrides the config file)
    #[arg(short, long)]
    pub backend: Option<BackendArg>,

    /// Number of worker threads for the parallel backend
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl SegScanArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the head or tail flags of a segment vector
    Flags(FlagsArgs),

    /// Run a scan over a vector of integers
    Scan(ScanArgs),
}

/// Arguments for printing boundary flags
#[derive(Parser, Debug, Clone)]
pub struct FlagsArgs {
    /// Segment lengths, comma separated
    #[arg(short, long, value_delimiter = ',', required = true)]
    pub segments: Vec<usize>,

    /// Print tail flags instead of head flags
    #[arg(long)]
    pub tail: bool,
}

/// Arguments for running a scan
#[derive(Parser, Debug, Clone)]
pub struct ScanArgs {
    /// Combining operator
    #[arg(short, long, default_value = "sum")]
    pub op: ScanOp,

    /// Kind of scan
    #[arg(short, long, default_value = "inclusive")]
    pub kind: ScanKind,

    /// Input values, comma separated
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub values: Vec<i64>,

    /// Segment lengths, comma separated; without them the scan is flat
    #[arg(short, long, value_delimiter = ',')]
    pub segments: Option<Vec<usize>>,

    /// JSON file with `values` and optional `segments` (overrides --values/--segments)
    #[arg(short, long, value_name = "INPUT_FILE")]
    pub input: Option<PathBuf>,

    /// Scan right-to-left
    #[arg(short, long)]
    pub right: bool,

    /// Also report per-segment totals (segmented exclusive scans only)
    #[arg(long)]
    pub sums: bool,
}

/// Scan input read from a JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanInput {
    pub values: Vec<i64>,
    #[serde(default)]
    pub segments: Option<Vec<usize>>,
}

/// Combining operators available on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanOp {
    /// Wrapping addition, identity 0
    Sum,
    /// Wrapping multiplication, identity 1
    Product,
    /// Maximum, identity i64::MIN
    Max,
    /// Minimum, identity i64::MAX
    Min,
}

impl ScanOp {
    /// Apply the operator.
    pub fn apply(self, a: i64, b: i64) -> i64 {
        match self {
            ScanOp::Sum => a.wrapping_add(b),
            ScanOp::Product => a.wrapping_mul(b),
            ScanOp::Max => a.max(b),
            ScanOp::Min => a.min(b),
        }
    }

    /// Identity element of the operator.
    pub fn identity(self) -> i64 {
        match self {
            ScanOp::Sum => 0,
            ScanOp::Product => 1,
            ScanOp::Max => i64::MIN,
            ScanOp::Min => i64::MAX,
        }
    }
}

/// Kinds of scan
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanKind {
    /// Inclusive scan
    Inclusive,
    /// Exclusive scan seeded with the operator identity
    Exclusive,
    /// Exclusive scan (same result as `exclusive`, computed without padding)
    Prescan,
    /// Inclusive scan with the identity combined in
    Postscan,
}

/// Backends selectable on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendArg {
    Sequential,
    Parallel,
}

impl From<BackendArg> for BackendKind {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Sequential => BackendKind::Sequential,
            BackendArg::Parallel => BackendKind::Parallel,
        }
    }
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
