//! Runtime configuration utilities for lexsum-oracle.

use std::{
    env,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::Context;
use serde::Deserialize;

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Root folder for raw and processed corpus artefacts.
    pub data_dir: PathBuf,
    /// Root folder for run and evaluation reports.
    pub outputs_dir: PathBuf,
    /// Documents with more sentences than this are excluded from oracle generation.
    pub max_doc_sentences: usize,
    /// Upper bound on greedy rounds per document.
    pub oracle_max_sentences: usize,
    /// Reject candidates that repeat a trigram already in the selection.
    pub trigram_blocking: bool,
    /// Documents per batch.
    pub batch_size: usize,
    /// Worker threads per batch.
    pub workers: usize,
    /// Seed for label balancing.
    pub balance_seed: u64,
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let data_dir = env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));
        let outputs_dir = env::var("OUTPUTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./outputs"));

        let settings = Self {
            data_dir,
            outputs_dir,
            max_doc_sentences: parsed_var("MAX_DOC_SENTENCES", 200),
            oracle_max_sentences: parsed_var("ORACLE_MAX_SENTENCES", 32),
            trigram_blocking: parsed_var("ORACLE_TRIGRAM_BLOCKING", true),
            batch_size: parsed_var("ORACLE_BATCH_SIZE", 300),
            workers: parsed_var("ORACLE_WORKERS", 2),
            balance_seed: parsed_var("BALANCE_SEED", 42),
        };

        std::fs::create_dir_all(settings.raw_dir()).context("creating raw data dir")?;
        std::fs::create_dir_all(settings.processed_dir())
            .context("creating processed data dir")?;
        std::fs::create_dir_all(&settings.outputs_dir).context("creating outputs dir")?;

        Ok(settings)
    }

    /// Folder holding `{split}.source` / `{split}.target` inputs.
    pub fn raw_dir(&self) -> PathBuf {
        self.data_dir.join("raw")
    }

    /// Folder holding filtered corpora, oracle batches and merged labels.
    pub fn processed_dir(&self) -> PathBuf {
        self.data_dir.join("processed")
    }

    /// Convenience helper for derived raw path segments.
    pub fn join_raw<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.raw_dir().join(path)
    }

    /// Convenience helper for derived processed path segments.
    pub fn join_processed<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.processed_dir().join(path)
    }

    /// Convenience helper for derived output path segments.
    pub fn join_output<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.outputs_dir.join(path)
    }
}

fn parsed_var<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
