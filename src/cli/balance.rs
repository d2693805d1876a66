//! CLI entry-point for balancing oracle labels.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{
    cli::SplitArgs,
    config::Settings,
    data::{corpus, output},
    labels::balance,
};

/// Args for the `balance` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    #[command(flatten)]
    pub split: SplitArgs,
    /// Sentence-block source; defaults to the filtered split.
    #[arg(long)]
    pub source: Option<PathBuf>,
    /// Label lines; defaults to the merged oracle labels of the split.
    #[arg(long)]
    pub labels: Option<PathBuf>,
    /// Sampling seed; overrides `BALANCE_SEED`.
    #[arg(long)]
    pub seed: Option<u64>,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let split = &args.split.split;
    let source = args
        .source
        .unwrap_or_else(|| settings.join_processed(format!("filtered-{split}.source")));
    let labels = args
        .labels
        .unwrap_or_else(|| settings.join_processed(output::merged_labels_name(split)));

    let documents = corpus::read_block_documents(&source)
        .with_context(|| format!("reading {}", source.display()))?;
    let label_lines = output::read_label_lines(&labels)
        .with_context(|| format!("reading {}", labels.display()))?;

    let balanced = balance::balance(
        &documents,
        &label_lines,
        args.seed.unwrap_or(settings.balance_seed),
    )?;

    let label_text: Vec<String> = balanced
        .labels
        .iter()
        .map(|line| {
            line.iter()
                .map(|l| l.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();
    corpus::write_block_documents(
        &settings.join_processed(format!("{split}-balanced.source")),
        &balanced.documents,
    )?;
    corpus::write_lines(
        &settings.join_processed(format!("{split}-balanced_oracle_labels.txt")),
        &label_text,
    )?;
    println!("Balanced: {} docs saved.", balanced.documents.len());
    Ok(())
}
