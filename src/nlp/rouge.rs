//! ROUGE-N and ROUGE-L scoring over stemmed, lowercased tokens.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::{
    error::{OracleError, Result, ScoreError},
    nlp::stem,
    oracle::OverlapScorer,
};

static NON_ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid regex"));

/// Which ROUGE family member to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RougeMetric {
    Rouge1,
    Rouge2,
    RougeL,
}

/// Precision, recall and F-measure of one candidate against one reference.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RougeScore {
    pub precision: f64,
    pub recall: f64,
    pub fmeasure: f64,
}

impl RougeScore {
    fn from_overlap(overlap: usize, candidate_total: usize, reference_total: usize) -> Self {
        let precision = overlap as f64 / candidate_total.max(1) as f64;
        let recall = overlap as f64 / reference_total.max(1) as f64;
        Self {
            precision,
            recall,
            fmeasure: fmeasure(precision, recall),
        }
    }
}

fn fmeasure(precision: f64, recall: f64) -> f64 {
    if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    }
}

/// Stateless ROUGE scorer.
#[derive(Debug, Clone, Copy)]
pub struct RougeScorer {
    metric: RougeMetric,
    use_stemmer: bool,
}

impl RougeScorer {
    pub fn new(metric: RougeMetric, use_stemmer: bool) -> Self {
        Self {
            metric,
            use_stemmer,
        }
    }

    /// ROUGE-1 with stemming, the signal the oracle optimises.
    pub fn oracle_default() -> Self {
        Self::new(RougeMetric::Rouge1, true)
    }

    /// Lowercase, replace non-alphanumerics with spaces, optionally stem.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        NON_ALPHANUMERIC
            .replace_all(&lowered, " ")
            .split_whitespace()
            .map(|token| {
                if self.use_stemmer {
                    stem::stem(token)
                } else {
                    token.to_string()
                }
            })
            .collect()
    }

    /// Score `candidate` against `reference`.
    pub fn score(&self, reference: &str, candidate: &str) -> RougeScore {
        let reference = self.tokenize(reference);
        let candidate = self.tokenize(candidate);
        match self.metric {
            RougeMetric::Rouge1 => ngram_score(&reference, &candidate, 1),
            RougeMetric::Rouge2 => ngram_score(&reference, &candidate, 2),
            RougeMetric::RougeL => lcs_score(&reference, &candidate),
        }
    }
}

impl OverlapScorer for RougeScorer {
    fn overlap(&self, reference: &str, candidate: &str) -> Result<f64, ScoreError> {
        Ok(self.score(reference, candidate).fmeasure)
    }
}

/// Mean stemmed ROUGE F-measures over aligned candidate/reference pairs.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CorpusRouge {
    pub documents: usize,
    pub rouge1: f64,
    pub rouge2: f64,
    pub rouge_l: f64,
}

pub fn corpus_scores(references: &[String], candidates: &[String]) -> Result<CorpusRouge> {
    if references.len() != candidates.len() {
        return Err(OracleError::DocumentCountMismatch {
            documents: candidates.len(),
            references: references.len(),
        });
    }
    let scorers = [RougeMetric::Rouge1, RougeMetric::Rouge2, RougeMetric::RougeL]
        .map(|metric| RougeScorer::new(metric, true));
    let mut totals = [0.0f64; 3];
    for (reference, candidate) in references.iter().zip(candidates) {
        for (total, scorer) in totals.iter_mut().zip(&scorers) {
            *total += scorer.score(reference, candidate).fmeasure;
        }
    }
    let n = references.len().max(1) as f64;
    Ok(CorpusRouge {
        documents: references.len(),
        rouge1: totals[0] / n,
        rouge2: totals[1] / n,
        rouge_l: totals[2] / n,
    })
}

fn ngram_counts(tokens: &[String], n: usize) -> HashMap<&[String], usize> {
    let mut counts = HashMap::new();
    if tokens.len() >= n {
        for gram in tokens.windows(n) {
            *counts.entry(gram).or_insert(0) += 1;
        }
    }
    counts
}

fn ngram_score(reference: &[String], candidate: &[String], n: usize) -> RougeScore {
    let reference_counts = ngram_counts(reference, n);
    let candidate_counts = ngram_counts(candidate, n);
    let overlap = reference_counts
        .iter()
        .map(|(gram, count)| (*count).min(candidate_counts.get(gram).copied().unwrap_or(0)))
        .sum();
    RougeScore::from_overlap(
        overlap,
        candidate_counts.values().sum(),
        reference_counts.values().sum(),
    )
}

fn lcs_score(reference: &[String], candidate: &[String]) -> RougeScore {
    if reference.is_empty() || candidate.is_empty() {
        return RougeScore::default();
    }
    let lcs = lcs_length(reference, candidate);
    RougeScore::from_overlap(lcs, candidate.len(), reference.len())
}

fn lcs_length(a: &[String], b: &[String]) -> usize {
    let mut previous = vec![0usize; b.len() + 1];
    let mut current = vec![0usize; b.len() + 1];
    for token_a in a {
        for (j, token_b) in b.iter().enumerate() {
            current[j + 1] = if token_a == token_b {
                previous[j] + 1
            } else {
                current[j].max(previous[j + 1])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn tokenizer_strips_punctuation_and_stems() {
        let scorer = RougeScorer::oracle_default();
        assert_eq!(
            scorer.tokenize("Cats and dogs are Mammals."),
            vec!["cat", "and", "dog", "are", "mammal"]
        );
        let raw = RougeScorer::new(RougeMetric::Rouge1, false);
        assert_eq!(raw.tokenize("Article 5(1)"), vec!["article", "5", "1"]);
    }

    #[test]
    fn spelling_variants_of_one_inflection_match() {
        let scorer = RougeScorer::oracle_default();
        let score = scorer.score(
            "This directive harmonises labelling rules.",
            "This directive harmonised labelling rules.",
        );
        assert!(close(score.fmeasure, 1.0));
    }

    #[test]
    fn identical_texts_score_one() {
        for metric in [RougeMetric::Rouge1, RougeMetric::Rouge2, RougeMetric::RougeL] {
            let scorer = RougeScorer::new(metric, true);
            let score = scorer.score("the council adopted it", "the council adopted it");
            assert!(close(score.fmeasure, 1.0), "{metric:?}");
        }
    }

    #[test]
    fn rouge1_partial_overlap() {
        let scorer = RougeScorer::new(RougeMetric::Rouge1, false);
        let score = scorer.score("the cat sat", "the cat");
        assert!(close(score.precision, 1.0));
        assert!(close(score.recall, 2.0 / 3.0));
        assert!(close(score.fmeasure, 0.8));
    }

    #[test]
    fn rouge1_counts_are_clipped() {
        let scorer = RougeScorer::new(RougeMetric::Rouge1, false);
        let score = scorer.score("the cat", "the the the");
        assert!(close(score.precision, 1.0 / 3.0));
        assert!(close(score.recall, 0.5));
    }

    #[test]
    fn rouge2_uses_bigrams() {
        let scorer = RougeScorer::new(RougeMetric::Rouge2, false);
        let score = scorer.score("a b c d", "a b x d");
        assert!(close(score.precision, 1.0 / 3.0));
        assert!(close(score.recall, 1.0 / 3.0));
    }

    #[test]
    fn rouge_l_uses_longest_common_subsequence() {
        let scorer = RougeScorer::new(RougeMetric::RougeL, false);
        let score = scorer.score("a b c d e", "a x c y e");
        assert!(close(score.recall, 3.0 / 5.0));
        assert!(close(score.precision, 3.0 / 5.0));
    }

    #[test]
    fn corpus_scores_average_each_metric() {
        let references = vec!["the cat sat".to_string(), "a b".to_string()];
        let candidates = vec!["the cat sat".to_string(), "x y".to_string()];
        let scores = corpus_scores(&references, &candidates).unwrap();
        assert_eq!(scores.documents, 2);
        assert!(close(scores.rouge1, 0.5));
        assert!(close(scores.rouge2, 0.5));
        assert!(close(scores.rouge_l, 0.5));
        assert!(corpus_scores(&references, &candidates[..1]).is_err());
    }

    #[test]
    fn empty_inputs_score_zero() {
        for metric in [RougeMetric::Rouge1, RougeMetric::Rouge2, RougeMetric::RougeL] {
            let scorer = RougeScorer::new(metric, true);
            assert_eq!(scorer.score("", "something").fmeasure, 0.0);
            assert_eq!(scorer.score("something", "").fmeasure, 0.0);
            assert_eq!(scorer.score("...", "!!!").fmeasure, 0.0);
        }
    }
}
