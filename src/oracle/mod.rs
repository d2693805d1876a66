//! Greedy oracle selection and the batch coordinator that drives it.
//!
//! The selector turns a (document, reference summary) pair into the subset of
//! sentences that best approximates the reference under an overlap metric,
//! plus one binary label per sentence. The coordinator fans documents out to
//! a worker pool batch by batch and hands each finished batch to a sink.

pub mod batch;
pub mod greedy;
pub mod trigram;

pub use batch::{BatchCoordinator, BatchOptions, BatchSink, BatchSummary, RunSummary};
pub use greedy::{select, OracleOutcome, SelectOptions};

use crate::error::ScoreError;

/// A document as its ordered list of sentences.
pub type Document = Vec<String>;

/// Pure overlap metric between a reference and a candidate summary.
///
/// Implementations must be deterministic and return a value in `[0, 1]`.
pub trait OverlapScorer: Send + Sync {
    fn overlap(&self, reference: &str, candidate: &str) -> Result<f64, ScoreError>;
}

impl<F> OverlapScorer for F
where
    F: Fn(&str, &str) -> Result<f64, ScoreError> + Send + Sync,
{
    fn overlap(&self, reference: &str, candidate: &str) -> Result<f64, ScoreError> {
        self(reference, candidate)
    }
}
