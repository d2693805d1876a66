//! Greedy forward selection of oracle sentences with trigram blocking.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{OracleError, Result},
    oracle::{
        trigram::{trigrams, Trigram},
        OverlapScorer,
    },
};

/// Knobs for a single oracle selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectOptions {
    /// Upper bound on greedy rounds; must be at least 1.
    pub max_sentences: usize,
    /// Skip candidates sharing any trigram with the current selection.
    pub trigram_blocking: bool,
}

impl Default for SelectOptions {
    fn default() -> Self {
        Self {
            max_sentences: 32,
            trigram_blocking: true,
        }
    }
}

/// Result of selecting oracle sentences for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleOutcome {
    /// Selected sentences in the order they were picked.
    pub selection: Vec<String>,
    /// Document positions of `selection`, same order.
    pub indices: Vec<usize>,
    /// Overlap score of the final selection.
    pub score: f64,
    /// One label per document sentence, 1 when selected.
    pub labels: Vec<u8>,
}

impl OracleOutcome {
    fn empty(sentence_count: usize) -> Self {
        Self {
            selection: Vec::new(),
            indices: Vec::new(),
            score: 0.0,
            labels: vec![0; sentence_count],
        }
    }

    /// The selection re-sorted into document order.
    pub fn document_order(&self) -> Vec<&str> {
        let mut ranked: Vec<(usize, &str)> = self
            .indices
            .iter()
            .copied()
            .zip(self.selection.iter().map(String::as_str))
            .collect();
        ranked.sort_by_key(|(index, _)| *index);
        ranked.into_iter().map(|(_, sentence)| sentence).collect()
    }

    /// Labels as space separated `0`/`1` tokens.
    pub fn label_line(&self) -> String {
        self.labels
            .iter()
            .map(|label| label.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Per-document mutable state of one greedy run.
struct SelectionState<'a> {
    order: Vec<usize>,
    chosen: HashSet<usize>,
    used_trigrams: HashSet<Trigram<'a>>,
    joined: String,
    best_score: f64,
}

impl<'a> SelectionState<'a> {
    fn new() -> Self {
        Self {
            order: Vec::new(),
            chosen: HashSet::new(),
            used_trigrams: HashSet::new(),
            joined: String::new(),
            best_score: 0.0,
        }
    }

    /// Current selection followed by `candidate`, space separated.
    fn hypothetical(&self, candidate: &str) -> String {
        if self.order.is_empty() {
            candidate.to_string()
        } else {
            format!("{} {}", self.joined, candidate)
        }
    }

    fn commit(&mut self, index: usize, sentence: &str, grams: &HashSet<Trigram<'a>>, score: f64) {
        self.joined = self.hypothetical(sentence);
        self.order.push(index);
        self.chosen.insert(index);
        self.used_trigrams.extend(grams.iter().copied());
        self.best_score = score;
    }
}

struct Candidate {
    index: usize,
    score: f64,
    gain: f64,
}

/// Greedily pick sentences that maximise `scorer` against `reference`.
///
/// Each round scores every remaining sentence appended to the current
/// selection and commits the one with the largest strictly positive gain;
/// ties go to the earliest sentence. Stops when no candidate improves the
/// score or after `max_sentences` rounds. Scorer failures abort immediately.
pub fn select<T, S>(
    sentences: &[T],
    reference: &str,
    options: &SelectOptions,
    scorer: &S,
) -> Result<OracleOutcome>
where
    T: AsRef<str>,
    S: OverlapScorer + ?Sized,
{
    if options.max_sentences == 0 {
        return Err(OracleError::InvalidArgument(
            "max_sentences must be at least 1".into(),
        ));
    }
    if sentences.is_empty() {
        return Ok(OracleOutcome::empty(0));
    }

    let grams: Vec<HashSet<Trigram<'_>>> = if options.trigram_blocking {
        sentences.iter().map(|s| trigrams(s.as_ref())).collect()
    } else {
        vec![HashSet::new(); sentences.len()]
    };

    let mut state = SelectionState::new();
    for _ in 0..options.max_sentences {
        let mut best: Option<Candidate> = None;
        for (index, sentence) in sentences.iter().enumerate() {
            if state.chosen.contains(&index) {
                continue;
            }
            if options.trigram_blocking && !grams[index].is_disjoint(&state.used_trigrams) {
                continue;
            }
            let hypothetical = state.hypothetical(sentence.as_ref());
            let score = checked(scorer.overlap(reference, &hypothetical)?)?;
            let gain = score - state.best_score;
            if gain > best.as_ref().map_or(0.0, |b| b.gain) {
                best = Some(Candidate { index, score, gain });
            }
        }

        let Some(candidate) = best else {
            break;
        };
        state.commit(
            candidate.index,
            sentences[candidate.index].as_ref(),
            &grams[candidate.index],
            candidate.score,
        );
    }

    let mut labels = vec![0u8; sentences.len()];
    for &index in &state.order {
        labels[index] = 1;
    }
    let selection: Vec<String> = state
        .order
        .iter()
        .map(|&index| sentences[index].as_ref().to_string())
        .collect();
    debug_assert_eq!(
        labels.iter().map(|&l| l as usize).sum::<usize>(),
        selection.len()
    );
    debug!(
        sentences = sentences.len(),
        selected = selection.len(),
        score = state.best_score,
        "oracle selection complete"
    );

    Ok(OracleOutcome {
        selection,
        indices: state.order,
        score: state.best_score,
        labels,
    })
}

fn checked(score: f64) -> Result<f64> {
    if score.is_finite() && (0.0..=1.0).contains(&score) {
        Ok(score)
    } else {
        Err(OracleError::ScoreOutOfRange { score })
    }
}
