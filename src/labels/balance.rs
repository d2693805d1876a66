//! Down-sampling of negative sentences to match positives per document.

use rand::{rngs::StdRng, seq::index, SeedableRng};
use tracing::info;

use crate::{error::Result, labels::check_alignment, oracle::Document};

/// Balanced training documents with their labels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Balanced {
    pub documents: Vec<Document>,
    pub labels: Vec<Vec<u8>>,
}

/// Keep every positive sentence and as many randomly drawn negatives.
///
/// Documents without positives are dropped. Kept sentences stay in document
/// order. The same seed always yields the same sample.
pub fn balance(documents: &[Document], labels: &[Vec<u8>], seed: u64) -> Result<Balanced> {
    check_alignment(documents, labels)?;

    let mut rng = StdRng::seed_from_u64(seed);
    let mut balanced = Balanced::default();
    for (sentences, line) in documents.iter().zip(labels) {
        let positives: Vec<usize> = positions(line, 1);
        if positives.is_empty() {
            continue;
        }
        let negatives: Vec<usize> = positions(line, 0);
        let keep = positives.len().min(negatives.len());

        let mut kept = positives;
        kept.extend(
            index::sample(&mut rng, negatives.len(), keep)
                .into_iter()
                .map(|i| negatives[i]),
        );
        kept.sort_unstable();

        balanced
            .documents
            .push(kept.iter().map(|&i| sentences[i].clone()).collect());
        balanced.labels.push(kept.iter().map(|&i| line[i]).collect());
    }

    info!(
        input = documents.len(),
        kept = balanced.documents.len(),
        "balanced oracle labels"
    );
    Ok(balanced)
}

fn positions(line: &[u8], label: u8) -> Vec<usize> {
    line.iter()
        .enumerate()
        .filter(|&(_, &l)| l == label)
        .map(|(i, _)| i)
        .collect()
}
