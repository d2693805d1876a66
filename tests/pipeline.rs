use std::fs;

use lexsum_oracle::{
    data::{
        corpus,
        output::{self, JsonlBatchWriter, LegacyBatchWriter},
    },
    error::OracleError,
    labels::balance,
    nlp::RougeScorer,
    oracle::{BatchCoordinator, BatchOptions, BatchSink, Document, OracleOutcome, SelectOptions},
};

fn legal_corpus() -> (Vec<Document>, Vec<String>) {
    let documents = vec![
        vec![
            "The Council adopted the regulation on plant health.".to_string(),
            "It enters into force on the twentieth day.".to_string(),
            "Member States shall notify the Commission of outbreaks.".to_string(),
        ],
        vec![
            "This directive harmonises labelling rules.".to_string(),
            "Annex I lists the mandatory particulars.".to_string(),
        ],
        vec!["Nothing here matches.".to_string()],
    ];
    let references = vec![
        "The regulation on plant health requires Member States to notify outbreaks.".to_string(),
        "The directive harmonises labelling rules.".to_string(),
        "Completely unrelated words.".to_string(),
    ];
    (documents, references)
}

#[test]
fn legacy_batches_merge_and_balance() {
    let dir = tempfile::tempdir().unwrap();
    let (documents, references) = legal_corpus();
    let coordinator = BatchCoordinator::new(
        RougeScorer::oracle_default(),
        SelectOptions::default(),
        BatchOptions {
            batch_size: 2,
            workers: 2,
        },
    );
    let mut writer = LegacyBatchWriter::new(dir.path(), "val");
    let summary = coordinator
        .run(&documents, &references, &mut writer)
        .unwrap();
    assert_eq!(summary.batches.len(), 2);

    assert_eq!(output::merge_batches(dir.path(), "val").unwrap(), 2);
    let labels = output::read_label_lines(&dir.path().join("val-oracle_labels_merged.txt")).unwrap();
    assert_eq!(labels.len(), documents.len());
    for (line, document) in labels.iter().zip(&documents) {
        assert_eq!(line.len(), document.len());
    }
    assert_eq!(labels[2], vec![0]);

    let summaries =
        output::read_legacy_summaries(&dir.path().join("val-oracle_summaries_merged.txt"))
            .unwrap();
    assert_eq!(summaries.len(), documents.len());
    assert_eq!(summaries[1], "This directive harmonises labelling rules.");
    assert_eq!(summaries[2], "");

    let source = dir.path().join("filtered-val.source");
    corpus::write_block_documents(&source, &documents).unwrap();
    let reloaded = corpus::read_block_documents(&source).unwrap();
    let balanced = balance::balance(&reloaded, &labels, 42).unwrap();
    // The third document has no positive sentence.
    assert_eq!(balanced.documents.len(), 2);
    for line in &balanced.labels {
        let positives = line.iter().filter(|&&l| l == 1).count();
        assert!(line.len() <= positives * 2);
    }
}

fn write_legacy_batch(dir: &std::path::Path, split: &str, batch: usize) {
    fs::write(
        dir.join(output::summaries_batch_name(split, batch)),
        format!("s{batch}\n===\n"),
    )
    .unwrap();
    // Missing trailing newline is repaired on merge.
    fs::write(dir.join(output::labels_batch_name(split, batch)), "1").unwrap();
}

#[test]
fn merge_orders_batches_numerically() {
    let dir = tempfile::tempdir().unwrap();
    for batch in (0..=10usize).rev() {
        write_legacy_batch(dir.path(), "train", batch);
    }
    assert_eq!(output::merge_batches(dir.path(), "train").unwrap(), 11);
    let merged =
        fs::read_to_string(dir.path().join("train-oracle_summaries_merged.txt")).unwrap();
    let expected: String = (0..=10).map(|batch| format!("s{batch}\n===\n")).collect();
    assert_eq!(merged, expected);
    let labels = fs::read_to_string(dir.path().join("train-oracle_labels_merged.txt")).unwrap();
    assert_eq!(labels, "1\n".repeat(11));
}

#[test]
fn merge_rejects_gaps_in_batch_numbers() {
    let dir = tempfile::tempdir().unwrap();
    for batch in [0usize, 1, 3] {
        write_legacy_batch(dir.path(), "train", batch);
    }
    let err = output::merge_batches(dir.path(), "train").unwrap_err();
    assert!(matches!(
        err,
        OracleError::MissingBatches { ref found, .. } if found == &vec![0, 1, 3]
    ));
    assert!(!dir.path().join("train-oracle_labels_merged.txt").exists());
}

#[test]
fn merge_rejects_summaries_without_labels() {
    let dir = tempfile::tempdir().unwrap();
    write_legacy_batch(dir.path(), "val", 0);
    write_legacy_batch(dir.path(), "val", 1);
    fs::remove_file(dir.path().join(output::labels_batch_name("val", 1))).unwrap();
    assert!(matches!(
        output::merge_batches(dir.path(), "val"),
        Err(OracleError::MissingBatches { .. })
    ));
}

#[test]
fn clearing_batches_leaves_other_splits_and_merged_files() {
    let dir = tempfile::tempdir().unwrap();
    for batch in 0..3 {
        write_legacy_batch(dir.path(), "train", batch);
        fs::write(dir.path().join(output::jsonl_batch_name("train", batch)), "{}\n").unwrap();
    }
    write_legacy_batch(dir.path(), "val", 0);
    fs::write(dir.path().join(output::merged_labels_name("train")), "1\n").unwrap();

    assert_eq!(output::clear_batches(dir.path(), "train").unwrap(), 9);
    assert!(!dir.path().join(output::summaries_batch_name("train", 2)).exists());
    assert!(dir.path().join(output::merged_labels_name("train")).exists());
    assert!(dir.path().join(output::labels_batch_name("val", 0)).exists());
    assert_eq!(output::merge_batches(dir.path(), "train").unwrap(), 0);
}

#[test]
fn jsonl_writer_emits_one_outcome_per_line() {
    let dir = tempfile::tempdir().unwrap();
    let mut writer = JsonlBatchWriter::new(dir.path(), "test");
    let outcome = OracleOutcome {
        selection: vec!["B.".to_string()],
        indices: vec![1],
        score: 0.5,
        labels: vec![0, 1],
    };
    writer.persist(0, &[outcome.clone()]).unwrap();
    let text = fs::read_to_string(dir.path().join("test-oracle_batch_0.jsonl")).unwrap();
    let line = text.lines().next().unwrap();
    insta::assert_snapshot!(line, @r#"{"selection":["B."],"indices":[1],"score":0.5,"labels":[0,1]}"#);
    let parsed: OracleOutcome = serde_json::from_str(line).unwrap();
    assert_eq!(parsed, outcome);
}
