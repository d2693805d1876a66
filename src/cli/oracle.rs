//! CLI entry-point for batched oracle label generation.

use std::fs::File;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{
    cli::{filter, OutputFormat, SplitArgs},
    config::Settings,
    data::output::{self, JsonlBatchWriter, LegacyBatchWriter},
    error::OracleError,
    nlp::RougeScorer,
    oracle::{BatchCoordinator, BatchOptions, BatchSink, RunSummary, SelectOptions},
};

/// Args for the `oracle` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    #[command(flatten)]
    pub split: SplitArgs,
    /// Documents per batch; overrides `ORACLE_BATCH_SIZE`.
    #[arg(long)]
    pub batch_size: Option<usize>,
    /// Worker threads; overrides `ORACLE_WORKERS`.
    #[arg(long)]
    pub workers: Option<usize>,
    /// Greedy rounds per document; overrides `ORACLE_MAX_SENTENCES`.
    #[arg(long)]
    pub max_sentences: Option<usize>,
    /// Sentence ceiling; overrides `MAX_DOC_SENTENCES`.
    #[arg(long)]
    pub max_doc_sentences: Option<usize>,
    /// Allow sentences that repeat trigrams of the current selection.
    #[arg(long)]
    pub no_trigram_blocking: bool,
    /// Batch output layout.
    #[arg(long, value_enum, default_value = "legacy")]
    pub format: OutputFormat,
    /// Write legacy summaries in document order rather than pick order.
    #[arg(long)]
    pub document_order: bool,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let split = args.split.split.clone();
    let ceiling = args.max_doc_sentences.unwrap_or(settings.max_doc_sentences);
    let kept = filter::partition_split(&settings, &split, ceiling)?.kept;

    let select = SelectOptions {
        max_sentences: args.max_sentences.unwrap_or(settings.oracle_max_sentences),
        trigram_blocking: settings.trigram_blocking && !args.no_trigram_blocking,
    };
    let batch = BatchOptions {
        batch_size: args.batch_size.unwrap_or(settings.batch_size),
        workers: args.workers.unwrap_or(settings.workers),
    };
    info!(?select, ?batch, documents = kept.len(), "starting oracle run");

    let coordinator = BatchCoordinator::new(RougeScorer::oracle_default(), select, batch);
    let dir = settings.processed_dir();
    let sink_split = split.clone();
    let format = args.format;
    let document_order = args.document_order;
    let summary = tokio::task::spawn_blocking(move || -> Result<RunSummary, OracleError> {
        output::clear_batches(&dir, &sink_split)?;
        let mut sink: Box<dyn BatchSink> = match format {
            OutputFormat::Legacy => Box::new(
                LegacyBatchWriter::new(dir, sink_split).with_document_order(document_order),
            ),
            OutputFormat::Jsonl => Box::new(JsonlBatchWriter::new(dir, sink_split)),
        };
        coordinator.run(&kept.documents, &kept.references, sink.as_mut())
    })
    .await
    .context("oracle worker task failed")??;

    let report_path = settings.join_output(format!("{split}-oracle_run.json"));
    let file = File::create(&report_path)
        .with_context(|| format!("creating {}", report_path.display()))?;
    serde_json::to_writer_pretty(file, &summary)?;
    info!(path = %report_path.display(), "wrote run summary");

    for batch in &summary.batches {
        println!("Batch {} Average ROUGE-1: {:.4}", batch.index, batch.average);
    }
    println!("Overall average ROUGE-1: {:.4}", summary.overall_average);
    Ok(())
}
