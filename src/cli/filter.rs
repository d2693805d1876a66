//! CLI entry-point for length-based corpus filtering.

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{
    cli::SplitArgs,
    config::Settings,
    data::{
        corpus,
        prefilter::{self, Corpus, Partition, PartitionPaths},
    },
};

/// Args for the `filter` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    #[command(flatten)]
    pub split: SplitArgs,
    /// Sentence ceiling; overrides `MAX_DOC_SENTENCES`.
    #[arg(long)]
    pub max_doc_sentences: Option<usize>,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let ceiling = args.max_doc_sentences.unwrap_or(settings.max_doc_sentences);
    let partition = partition_split(&settings, &args.split.split, ceiling)?;
    println!(
        "Kept {} / {} docs",
        partition.kept.len(),
        partition.kept.len() + partition.skipped.len()
    );
    println!("Skipped {} docs", partition.skipped.len());
    Ok(())
}

/// Load a raw split, partition it at `ceiling` and persist both halves.
pub fn partition_split(settings: &Settings, split: &str, ceiling: usize) -> Result<Partition> {
    let source_path = settings.join_raw(format!("{split}.source"));
    let target_path = settings.join_raw(format!("{split}.target"));
    let documents = corpus::read_line_documents(&source_path)
        .with_context(|| format!("reading {}", source_path.display()))?;
    let references = corpus::read_lines(&target_path)
        .with_context(|| format!("reading {}", target_path.display()))?;

    let partition = prefilter::partition(Corpus::new(documents, references)?, ceiling);
    let paths = PartitionPaths {
        kept_source: settings.join_processed(format!("filtered-{split}.source")),
        kept_target: settings.join_processed(format!("filtered-{split}.target")),
        skipped_source: settings.join_raw(format!("skipped-{split}.source")),
        skipped_target: settings.join_raw(format!("skipped-{split}.target")),
    };
    prefilter::persist(&partition, &paths).context("persisting filtered corpus")?;
    Ok(partition)
}
