//! Post-processing of oracle labels into classifier training data.

pub mod balance;
pub mod metrics;

use crate::{
    error::{OracleError, Result},
    oracle::Document,
};

/// Check that every document has exactly one label per sentence.
pub fn check_alignment(documents: &[Document], labels: &[Vec<u8>]) -> Result<()> {
    if documents.len() != labels.len() {
        return Err(OracleError::LabelCountMismatch {
            documents: documents.len(),
            labels: labels.len(),
        });
    }
    for (document, (sentences, line)) in documents.iter().zip(labels).enumerate() {
        if sentences.len() != line.len() {
            return Err(OracleError::LabelLengthMismatch {
                document,
                sentences: sentences.len(),
                labels: line.len(),
            });
        }
    }
    Ok(())
}
