//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for ranking reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Full report: ranking, deep dives, statistics, timings
    Full,
    /// Ranked table only
    Ranking,
    /// JSON report
    Json,
}

impl OutputFormat {
    /// Parse a config-file format name; the `--output` flag bypasses this
    pub fn from_config_name(name: &str) -> Option<Self> {
        match name {
            "full" => Some(Self::Full),
            "ranking" => Some(Self::Ranking),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// CLI arguments for paper-triage
#[derive(Parser, Debug)]
#[command(name = "paper-triage")]
#[command(author, version, about = "Two-stage LLM triage for paper pools")]
#[command(long_about = r#"
Paper Triage ranks a pool of papers using redundant LLM judgments.

The pipeline has two stages:
1. Scoring: every paper is scored twice, in shuffled batches; papers whose
   two judgments disagree get a third, tie-breaking judgment
2. Analysis: the top-ranked papers each get an individual deep dive

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./triage.toml       Project-level config
3. ~/.config/paper-triage/config.toml   Global config

Example:
  paper-triage papers.json
  paper-triage --top-n 5 --batch-size 8 papers.json
  paper-triage --output json --save report.json papers.json
"#)]
pub struct Cli {
    /// Path to the candidate pool (not required with --show-config)
    pub input: Option<PathBuf>,

    /// Target batch size for stage-1 scoring
    #[arg(long, value_name = "N")]
    pub batch_size: Option<usize>,

    /// How many top papers get a stage-2 deep dive (0 disables stage 2)
    #[arg(long, value_name = "N")]
    pub top_n: Option<usize>,

    /// Total attempts per batch, including the first
    #[arg(long, value_name = "N")]
    pub max_retries: Option<u32>,

    /// Shuffle seed for reproducible batch assignments
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Cancel the run after this many seconds
    #[arg(long, value_name = "SECS")]
    pub deadline_secs: Option<u64>,

    /// Also write the JSON report to this path
    #[arg(long, value_name = "PATH")]
    pub save: Option<PathBuf>,

    /// Output format (defaults to the config file's choice, then full)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
