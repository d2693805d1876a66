//! Error types shared by the oracle core and the corpus plumbing.

use std::path::PathBuf;

use thiserror::Error;

/// Failure raised by an overlap scorer.
#[derive(Debug, Error)]
#[error("overlap scoring failed: {message}")]
pub struct ScoreError {
    message: String,
}

impl ScoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors produced while generating or post-processing oracle labels.
///
/// Every variant is fatal for the run that produced it.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("document count ({documents}) does not match reference count ({references})")]
    DocumentCountMismatch { documents: usize, references: usize },
    #[error("document count ({documents}) does not match label line count ({labels})")]
    LabelCountMismatch { documents: usize, labels: usize },
    #[error("document {document} has {sentences} sentences but {labels} labels")]
    LabelLengthMismatch {
        document: usize,
        sentences: usize,
        labels: usize,
    },
    #[error("invalid label token {token:?} on line {line} of {}", path.display())]
    InvalidLabel {
        path: PathBuf,
        line: usize,
        token: String,
    },
    #[error("{split} oracle batches are not numbered 0..{count}: found {found:?}")]
    MissingBatches {
        split: String,
        count: usize,
        found: Vec<usize>,
    },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Scoring(#[from] ScoreError),
    #[error("overlap score {score} is outside [0, 1]")]
    ScoreOutOfRange { score: f64 },
    #[error("failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = OracleError> = std::result::Result<T, E>;
