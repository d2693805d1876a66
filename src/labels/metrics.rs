//! Per-document binary precision, recall and F1, macro-averaged.

use serde::Serialize;

use crate::error::{OracleError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct LabelMetrics {
    pub documents: usize,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// Precision, recall and F1 of the positive class; undefined ratios are 0.
pub fn binary_prf(gold: &[u8], predicted: &[u8]) -> (f64, f64, f64) {
    let mut tp = 0usize;
    let mut fp = 0usize;
    let mut fn_ = 0usize;
    for (&g, &p) in gold.iter().zip(predicted) {
        match (g, p) {
            (1, 1) => tp += 1,
            (0, 1) => fp += 1,
            (1, 0) => fn_ += 1,
            _ => {}
        }
    }
    let precision = ratio(tp, tp + fp);
    let recall = ratio(tp, tp + fn_);
    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };
    (precision, recall, f1)
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Average per-document scores over aligned gold and predicted label lines.
pub fn macro_prf(gold: &[Vec<u8>], predicted: &[Vec<u8>]) -> Result<LabelMetrics> {
    if gold.len() != predicted.len() {
        return Err(OracleError::LabelCountMismatch {
            documents: gold.len(),
            labels: predicted.len(),
        });
    }
    let mut totals = LabelMetrics {
        documents: gold.len(),
        ..LabelMetrics::default()
    };
    for (document, (g, p)) in gold.iter().zip(predicted).enumerate() {
        if g.len() != p.len() {
            return Err(OracleError::LabelLengthMismatch {
                document,
                sentences: g.len(),
                labels: p.len(),
            });
        }
        let (precision, recall, f1) = binary_prf(g, p);
        totals.precision += precision;
        totals.recall += recall;
        totals.f1 += f1;
    }
    if totals.documents > 0 {
        let n = totals.documents as f64;
        totals.precision /= n;
        totals.recall /= n;
        totals.f1 /= n;
    }
    Ok(totals)
}
