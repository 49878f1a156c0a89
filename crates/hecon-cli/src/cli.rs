//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use hecon_analytics::{EstimatorKind, ForecastStrategy};
use hecon_model::Granularity;

#[derive(Parser)]
#[command(
    name = "hecon",
    version,
    about = "Hospital economics - anonymize and analyze discharge extracts",
    long_about = "Anonymize hospital discharge extracts and compute economic metrics.\n\n\
                  `anonymize` writes a de-identified CSV plus a compliance report.\n\
                  `analyze` writes aggregate metrics, forecasts, clusters and alerts as JSON."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// TOML configuration file with [schema], [anonymize] and [analysis] tables.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// De-identify a discharge extract and write a compliance report.
    Anonymize(AnonymizeArgs),

    /// Compute metrics, forecasts, clusters and alerts for an extract.
    Analyze(AnalyzeArgs),
}

#[derive(Parser)]
pub struct AnonymizeArgs {
    /// Delimited discharge extract.
    #[arg(value_name = "CSV")]
    pub input: PathBuf,

    /// Output directory (default: the input's directory).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Secret mixed into identifier hashes (overrides the config file).
    #[arg(long = "salt")]
    pub salt: Option<String>,

    /// Period granularity for generalized dates.
    #[arg(long = "granularity", value_enum)]
    pub granularity: Option<GranularityArg>,

    /// Drop columns that no policy list mentions.
    #[arg(long = "drop-unlisted")]
    pub drop_unlisted: bool,

    /// Also hash id-like columns and generalize every date column by name
    /// (detail exports).
    #[arg(long = "detail")]
    pub detail: bool,
}

#[derive(Parser)]
pub struct AnalyzeArgs {
    /// Delimited discharge extract.
    #[arg(value_name = "CSV")]
    pub input: PathBuf,

    /// Metrics JSON path (default: <STEM>.metrics.json next to the input).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Forecast strategy.
    #[arg(long = "strategy", value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Growth estimator for predictive alerts.
    #[arg(long = "estimator", value_enum)]
    pub estimator: Option<EstimatorArg>,

    /// Seed for the noise-based growth estimator.
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    /// Number of rank bands for service segmentation.
    #[arg(long = "clusters", value_name = "N")]
    pub clusters: Option<usize>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum GranularityArg {
    Month,
    Quarter,
    Year,
}

impl From<GranularityArg> for Granularity {
    fn from(arg: GranularityArg) -> Self {
        match arg {
            GranularityArg::Month => Granularity::Month,
            GranularityArg::Quarter => Granularity::Quarter,
            GranularityArg::Year => Granularity::Year,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    Disabled,
    Simple,
    Advanced,
}

impl From<StrategyArg> for ForecastStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Disabled => ForecastStrategy::Disabled,
            StrategyArg::Simple => ForecastStrategy::Simple,
            StrategyArg::Advanced => ForecastStrategy::Advanced,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum EstimatorArg {
    NormalNoise,
    TrendSlope,
    Flat,
}

impl From<EstimatorArg> for EstimatorKind {
    fn from(arg: EstimatorArg) -> Self {
        match arg {
            EstimatorArg::NormalNoise => EstimatorKind::NormalNoise,
            EstimatorArg::TrendSlope => EstimatorKind::TrendSlope,
            EstimatorArg::Flat => EstimatorKind::Flat,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
