//! CLI entry-points for label and summary evaluation.

use std::{fs::File, path::PathBuf};

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{
    config::Settings,
    data::{corpus, output},
    labels::metrics,
    nlp::rouge,
};

/// Args for the `evaluate-labels` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct LabelArgs {
    /// Reference label lines.
    #[arg(long)]
    pub gold: PathBuf,
    /// Predicted label lines.
    #[arg(long)]
    pub predicted: PathBuf,
}

/// Args for the `evaluate-summaries` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct SummaryArgs {
    /// Summaries in the `===` separated layout.
    #[arg(long)]
    pub summaries: PathBuf,
    /// One reference summary per line.
    #[arg(long)]
    pub references: PathBuf,
}

#[instrument(skip(settings))]
pub async fn run_labels(args: LabelArgs, settings: Settings) -> Result<()> {
    let gold = output::read_label_lines(&args.gold)
        .with_context(|| format!("reading {}", args.gold.display()))?;
    let predicted = output::read_label_lines(&args.predicted)
        .with_context(|| format!("reading {}", args.predicted.display()))?;
    let scores = metrics::macro_prf(&gold, &predicted)?;

    write_report(&settings, "label_metrics.json", &scores)?;
    println!("Macro Precision: {:.4}", scores.precision);
    println!("Macro Recall:    {:.4}", scores.recall);
    println!("Macro F1:        {:.4}", scores.f1);
    Ok(())
}

#[instrument(skip(settings))]
pub async fn run_summaries(args: SummaryArgs, settings: Settings) -> Result<()> {
    let summaries = output::read_legacy_summaries(&args.summaries)
        .with_context(|| format!("reading {}", args.summaries.display()))?;
    let references = corpus::read_lines(&args.references)
        .with_context(|| format!("reading {}", args.references.display()))?;
    let scores = rouge::corpus_scores(&references, &summaries)?;

    write_report(&settings, "summary_metrics.json", &scores)?;
    println!("Average ROUGE-1 F1: {:.4}", scores.rouge1);
    println!("Average ROUGE-2 F1: {:.4}", scores.rouge2);
    println!("Average ROUGE-L F1: {:.4}", scores.rouge_l);
    Ok(())
}

fn write_report<T: serde::Serialize>(settings: &Settings, name: &str, report: &T) -> Result<()> {
    let path = settings.join_output(name);
    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(file, report)?;
    info!(path = %path.display(), "wrote evaluation report");
    Ok(())
}
