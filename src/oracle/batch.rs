//! Batch-wise fan-out of oracle selection over a worker pool.

use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::{prelude::*, ThreadPool, ThreadPoolBuilder};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::{
    error::{OracleError, Result},
    oracle::{greedy, Document, OracleOutcome, OverlapScorer, SelectOptions},
};

/// Receives each finished batch, in input order, before the next one starts.
pub trait BatchSink {
    fn persist(&mut self, batch: usize, outcomes: &[OracleOutcome]) -> Result<()>;
}

/// In-memory sink keeping every batch.
impl BatchSink for Vec<Vec<OracleOutcome>> {
    fn persist(&mut self, _batch: usize, outcomes: &[OracleOutcome]) -> Result<()> {
        self.push(outcomes.to_vec());
        Ok(())
    }
}

/// Partitioning and parallelism of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    pub batch_size: usize,
    pub workers: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            batch_size: 300,
            workers: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub index: usize,
    pub documents: usize,
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub batches: Vec<BatchSummary>,
    pub documents: usize,
    pub overall_average: f64,
}

/// Runs the greedy selector over a corpus, one batch at a time.
pub struct BatchCoordinator<S> {
    scorer: S,
    select: SelectOptions,
    batch: BatchOptions,
}

impl<S: OverlapScorer> BatchCoordinator<S> {
    pub fn new(scorer: S, select: SelectOptions, batch: BatchOptions) -> Self {
        Self {
            scorer,
            select,
            batch,
        }
    }

    /// Select oracle sentences for every document and persist batch results.
    ///
    /// Inputs are validated before any selection starts. The first failing
    /// document aborts the run; batches already handed to `sink` stay there.
    #[instrument(skip_all, fields(documents = documents.len()))]
    pub fn run(
        &self,
        documents: &[Document],
        references: &[String],
        sink: &mut dyn BatchSink,
    ) -> Result<RunSummary> {
        self.validate(documents, references)?;
        if documents.is_empty() {
            warn!("no documents to process");
            return Ok(RunSummary {
                batches: Vec::new(),
                documents: 0,
                overall_average: 0.0,
            });
        }

        let pool = ThreadPoolBuilder::new()
            .num_threads(self.batch.workers)
            .thread_name(|i| format!("oracle-worker-{i}"))
            .build()?;

        let mut batches = Vec::new();
        let chunks = documents
            .chunks(self.batch.batch_size)
            .zip(references.chunks(self.batch.batch_size));
        for (index, (docs, refs)) in chunks.enumerate() {
            let outcomes = self.process_batch(&pool, index, docs, refs)?;
            let scores: Vec<f64> = outcomes.iter().map(|o| o.score).collect();
            let average = mean(&scores);
            info!(
                batch = index,
                documents = outcomes.len(),
                average,
                "batch complete"
            );
            sink.persist(index, &outcomes)?;
            batches.push(BatchSummary {
                index,
                documents: outcomes.len(),
                average,
            });
        }

        let overall_average = weighted_average(&batches);
        info!(
            documents = documents.len(),
            batches = batches.len(),
            overall_average,
            "oracle run complete"
        );
        Ok(RunSummary {
            batches,
            documents: documents.len(),
            overall_average,
        })
    }

    fn validate(&self, documents: &[Document], references: &[String]) -> Result<()> {
        if documents.len() != references.len() {
            return Err(OracleError::DocumentCountMismatch {
                documents: documents.len(),
                references: references.len(),
            });
        }
        if self.batch.batch_size == 0 {
            return Err(OracleError::InvalidArgument(
                "batch_size must be at least 1".into(),
            ));
        }
        if self.batch.workers == 0 {
            return Err(OracleError::InvalidArgument(
                "worker_count must be at least 1".into(),
            ));
        }
        if self.select.max_sentences == 0 {
            return Err(OracleError::InvalidArgument(
                "max_sentences must be at least 1".into(),
            ));
        }
        Ok(())
    }

    fn process_batch(
        &self,
        pool: &ThreadPool,
        batch: usize,
        documents: &[Document],
        references: &[String],
    ) -> Result<Vec<OracleOutcome>> {
        let total = documents.len();
        let completed = AtomicUsize::new(0);
        // Indexed parallel collect keeps results in input order.
        pool.install(|| {
            documents
                .par_iter()
                .zip(references.par_iter())
                .map(|(document, reference)| -> Result<OracleOutcome> {
                    let outcome = greedy::select(
                        document.as_slice(),
                        reference,
                        &self.select,
                        &self.scorer,
                    )?;
                    let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                    info!(batch, done, total, "processed document");
                    Ok(outcome)
                })
                .collect::<Result<Vec<_>>>()
        })
    }
}

/// Arithmetic mean, zero for an empty slice.
pub fn mean(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    }
}

fn weighted_average(batches: &[BatchSummary]) -> f64 {
    let documents: usize = batches.iter().map(|b| b.documents).sum();
    if documents == 0 {
        return 0.0;
    }
    batches
        .iter()
        .map(|b| b.average * b.documents as f64)
        .sum::<f64>()
        / documents as f64
}
