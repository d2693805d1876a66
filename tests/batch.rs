use std::{
    sync::atomic::{AtomicUsize, Ordering},
    thread,
    time::Duration,
};

use lexsum_oracle::{
    error::{OracleError, ScoreError},
    oracle::{BatchCoordinator, BatchOptions, Document, OracleOutcome, SelectOptions},
};

fn corpus(n: usize) -> (Vec<Document>, Vec<String>) {
    let references: Vec<String> = (0..n).map(|i| format!("doc {i}")).collect();
    let documents = references.iter().map(|r| vec![r.clone()]).collect();
    (documents, references)
}

fn exact_match(reference: &str, candidate: &str) -> Result<f64, ScoreError> {
    Ok(if reference == candidate { 1.0 } else { 0.0 })
}

#[test]
fn results_follow_input_order_despite_reversed_latency() {
    let n = 8;
    let (documents, references) = corpus(n);
    // Earlier documents finish last.
    let scorer = move |reference: &str, candidate: &str| -> Result<f64, ScoreError> {
        let index: u64 = reference
            .trim_start_matches("doc ")
            .parse()
            .map_err(|_| ScoreError::new("bad reference"))?;
        thread::sleep(Duration::from_millis((n as u64 - index) * 10));
        exact_match(reference, candidate)
    };
    let coordinator = BatchCoordinator::new(
        scorer,
        SelectOptions::default(),
        BatchOptions {
            batch_size: 3,
            workers: 4,
        },
    );

    let mut batches: Vec<Vec<OracleOutcome>> = Vec::new();
    let summary = coordinator
        .run(&documents, &references, &mut batches)
        .unwrap();

    let sizes: Vec<usize> = batches.iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![3, 3, 2]);
    let selected: Vec<String> = batches
        .into_iter()
        .flatten()
        .map(|outcome| outcome.selection.concat())
        .collect();
    assert_eq!(selected, references);
    assert_eq!(summary.documents, n);
    assert_eq!(summary.overall_average, 1.0);
}

#[test]
fn batch_average_matches_document_scores() {
    let documents: Vec<Document> = vec![vec!["s".to_string()]; 4];
    let references: Vec<String> = ["0.5", "0.7", "0.3", "0.9"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let scorer = |reference: &str, _: &str| -> Result<f64, ScoreError> {
        reference
            .parse()
            .map_err(|_| ScoreError::new("not a number"))
    };
    let coordinator = BatchCoordinator::new(
        scorer,
        SelectOptions::default(),
        BatchOptions {
            batch_size: 3,
            workers: 2,
        },
    );
    let mut batches: Vec<Vec<OracleOutcome>> = Vec::new();
    let summary = coordinator
        .run(&documents, &references, &mut batches)
        .unwrap();

    assert_eq!(summary.batches[0].average, 0.5);
    assert_eq!(summary.batches[1].average, 0.9);
    assert!((summary.overall_average - 0.6).abs() < 1e-12);
}

#[test]
fn count_mismatch_fails_before_any_scoring() {
    let calls = AtomicUsize::new(0);
    let scorer = |reference: &str, candidate: &str| -> Result<f64, ScoreError> {
        calls.fetch_add(1, Ordering::SeqCst);
        exact_match(reference, candidate)
    };
    let (documents, mut references) = corpus(3);
    references.pop();
    let coordinator =
        BatchCoordinator::new(scorer, SelectOptions::default(), BatchOptions::default());
    let mut batches: Vec<Vec<OracleOutcome>> = Vec::new();
    let err = coordinator
        .run(&documents, &references, &mut batches)
        .unwrap_err();

    assert!(matches!(
        err,
        OracleError::DocumentCountMismatch {
            documents: 3,
            references: 2
        }
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(batches.is_empty());
}

#[test]
fn scorer_failure_aborts_run_and_keeps_completed_batches() {
    let (documents, mut references) = corpus(4);
    references[3] = "poison".to_string();
    let scorer = |reference: &str, candidate: &str| -> Result<f64, ScoreError> {
        if reference == "poison" {
            return Err(ScoreError::new("malformed reference"));
        }
        exact_match(reference, candidate)
    };
    let coordinator = BatchCoordinator::new(
        scorer,
        SelectOptions::default(),
        BatchOptions {
            batch_size: 2,
            workers: 2,
        },
    );
    let mut batches: Vec<Vec<OracleOutcome>> = Vec::new();
    let err = coordinator
        .run(&documents, &references, &mut batches)
        .unwrap_err();

    assert!(matches!(err, OracleError::Scoring(_)));
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].len(), 2);
}

#[test]
fn zero_sized_batches_and_pools_are_rejected() {
    let (documents, references) = corpus(2);
    for options in [
        BatchOptions {
            batch_size: 0,
            workers: 1,
        },
        BatchOptions {
            batch_size: 1,
            workers: 0,
        },
    ] {
        let coordinator = BatchCoordinator::new(exact_match, SelectOptions::default(), options);
        let mut batches: Vec<Vec<OracleOutcome>> = Vec::new();
        let err = coordinator
            .run(&documents, &references, &mut batches)
            .unwrap_err();
        assert!(matches!(err, OracleError::InvalidArgument(_)));
    }
}

#[test]
fn empty_corpus_averages_to_zero() {
    let coordinator =
        BatchCoordinator::new(exact_match, SelectOptions::default(), BatchOptions::default());
    let mut batches: Vec<Vec<OracleOutcome>> = Vec::new();
    let summary = coordinator.run(&[], &[], &mut batches).unwrap();
    assert_eq!(summary.documents, 0);
    assert_eq!(summary.overall_average, 0.0);
    assert!(batches.is_empty());
}
