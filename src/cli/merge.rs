//! CLI entry-point for merging oracle batch files.

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{
    cli::SplitArgs,
    config::Settings,
    data::output::{self, merged_labels_name, merged_summaries_name},
};

/// Args for the `merge` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    #[command(flatten)]
    pub split: SplitArgs,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let split = &args.split.split;
    let merged = output::merge_batches(&settings.processed_dir(), split)
        .context("merging oracle batches")?;
    println!("Merged {merged} batches into:");
    println!("- {}", merged_summaries_name(split));
    println!("- {}", merged_labels_name(split));
    Ok(())
}
