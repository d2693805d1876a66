//! Command-line interface wiring for lexsum-oracle.

use anyhow::Result;
use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand, ValueEnum};

use crate::config::Settings;

pub mod balance;
pub mod evaluate;
pub mod filter;
pub mod merge;
pub mod oracle;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Oracle label generation for extractive summarisation",
    long_about = None
)]
pub struct Cli {
    /// Raise log verbosity (-v debug, -vv trace); `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Default log filter implied by `--verbose`.
    pub fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }

    /// Dispatch the selected sub-command.
    pub async fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Commands::Filter(args) => filter::run(args, settings).await,
            Commands::Oracle(args) => oracle::run(args, settings).await,
            Commands::Merge(args) => merge::run(args, settings).await,
            Commands::Balance(args) => balance::run(args, settings).await,
            Commands::EvaluateLabels(args) => evaluate::run_labels(args, settings).await,
            Commands::EvaluateSummaries(args) => evaluate::run_summaries(args, settings).await,
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Set aside documents above the sentence ceiling.
    Filter(filter::Args),
    /// Filter, then generate greedy oracle summaries and labels in batches.
    Oracle(oracle::Args),
    /// Concatenate oracle batch files of a split.
    Merge(merge::Args),
    /// Down-sample negative sentences to match positives.
    Balance(balance::Args),
    /// Macro precision/recall/F1 of predicted labels against gold labels.
    EvaluateLabels(evaluate::LabelArgs),
    /// Average ROUGE of `===`-separated summaries against references.
    EvaluateSummaries(evaluate::SummaryArgs),
}

/// Corpus split selector shared by the pipeline commands.
#[derive(Debug, Clone, ClapArgs)]
pub struct SplitArgs {
    /// Split name, used as the file name stem (`train`, `val`, `test`).
    #[arg(long, default_value = "train")]
    pub split: String,
}

/// Layout of persisted oracle batches.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// Summaries with `===` separators plus label lines.
    Legacy,
    /// One JSON outcome per line.
    Jsonl,
}
