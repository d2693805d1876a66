//! Length-based exclusion of documents before oracle generation.
//!
//! Selection cost grows with document length squared, so documents above a
//! sentence ceiling are set aside whole. They are never truncated: cutting
//! the tail would bias oracle labels toward early content.

use std::path::PathBuf;

use tracing::info;

use crate::{
    data::corpus,
    error::{OracleError, Result},
    oracle::Document,
};

/// Aligned documents and references.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corpus {
    pub documents: Vec<Document>,
    pub references: Vec<String>,
}

impl Corpus {
    pub fn new(documents: Vec<Document>, references: Vec<String>) -> Result<Self> {
        if documents.len() != references.len() {
            return Err(OracleError::DocumentCountMismatch {
                documents: documents.len(),
                references: references.len(),
            });
        }
        Ok(Self {
            documents,
            references,
        })
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn push(&mut self, document: Document, reference: String) {
        self.documents.push(document);
        self.references.push(reference);
    }
}

/// Result of splitting a corpus at the sentence ceiling.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    pub kept: Corpus,
    pub skipped: Corpus,
}

/// Keep documents with at most `ceiling` sentences; set the rest aside.
pub fn partition(corpus: Corpus, ceiling: usize) -> Partition {
    let mut partition = Partition::default();
    for (document, reference) in corpus.documents.into_iter().zip(corpus.references) {
        if document.len() <= ceiling {
            partition.kept.push(document, reference);
        } else {
            partition.skipped.push(document, reference);
        }
    }
    info!(
        kept = partition.kept.len(),
        skipped = partition.skipped.len(),
        ceiling,
        "partitioned corpus by sentence count"
    );
    partition
}

/// Where the two halves of a partition are written.
#[derive(Debug, Clone)]
pub struct PartitionPaths {
    pub kept_source: PathBuf,
    pub kept_target: PathBuf,
    pub skipped_source: PathBuf,
    pub skipped_target: PathBuf,
}

/// Persist both halves as sentence blocks plus line-per-reference targets.
pub fn persist(partition: &Partition, paths: &PartitionPaths) -> Result<()> {
    corpus::write_block_documents(&paths.skipped_source, &partition.skipped.documents)?;
    corpus::write_lines(&paths.skipped_target, &partition.skipped.references)?;
    corpus::write_block_documents(&paths.kept_source, &partition.kept.documents)?;
    corpus::write_lines(&paths.kept_target, &partition.kept.references)?;
    Ok(())
}
