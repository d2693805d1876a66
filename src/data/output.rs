//! Persisted oracle batches and the readers that consume them.
//!
//! The legacy layout is two text files per batch: selected sentences one per
//! line with a `===` line closing every document, and one line of
//! space-separated `0`/`1` labels per document. The JSONL layout stores one
//! [`OracleOutcome`] object per line instead.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use tracing::{info, warn};

use crate::{
    data::corpus::create,
    error::{OracleError, Result},
    oracle::{BatchSink, OracleOutcome},
};

/// Line closing every document in a legacy summaries file.
pub const DOCUMENT_SEPARATOR: &str = "===";

pub fn summaries_batch_name(split: &str, batch: usize) -> String {
    format!("{split}-oracle_summaries_batch_{batch}.txt")
}

pub fn labels_batch_name(split: &str, batch: usize) -> String {
    format!("{split}-oracle_labels_batch_{batch}.txt")
}

pub fn jsonl_batch_name(split: &str, batch: usize) -> String {
    format!("{split}-oracle_batch_{batch}.jsonl")
}

pub fn merged_summaries_name(split: &str) -> String {
    format!("{split}-oracle_summaries_merged.txt")
}

pub fn merged_labels_name(split: &str) -> String {
    format!("{split}-oracle_labels_merged.txt")
}

/// Writes each batch as a legacy summaries file and a labels file.
#[derive(Debug, Clone)]
pub struct LegacyBatchWriter {
    dir: PathBuf,
    split: String,
    document_order: bool,
}

impl LegacyBatchWriter {
    pub fn new(dir: impl Into<PathBuf>, split: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            split: split.into(),
            document_order: false,
        }
    }

    /// Write selections in document order instead of pick order.
    pub fn with_document_order(mut self, document_order: bool) -> Self {
        self.document_order = document_order;
        self
    }
}

impl BatchSink for LegacyBatchWriter {
    fn persist(&mut self, batch: usize, outcomes: &[OracleOutcome]) -> Result<()> {
        let summaries_path = self.dir.join(summaries_batch_name(&self.split, batch));
        let mut summaries = create(&summaries_path)?;
        for outcome in outcomes {
            let sentences: Vec<&str> = if self.document_order {
                outcome.document_order()
            } else {
                outcome.selection.iter().map(String::as_str).collect()
            };
            write!(summaries, "{}\n{DOCUMENT_SEPARATOR}\n", sentences.join("\n"))?;
        }
        summaries.flush()?;

        let labels_path = self.dir.join(labels_batch_name(&self.split, batch));
        let mut labels = create(&labels_path)?;
        for outcome in outcomes {
            writeln!(labels, "{}", outcome.label_line())?;
        }
        labels.flush()?;

        info!(
            summaries = %summaries_path.display(),
            labels = %labels_path.display(),
            documents = outcomes.len(),
            "wrote oracle batch"
        );
        Ok(())
    }
}

/// Writes each batch as newline-delimited JSON outcomes.
#[derive(Debug, Clone)]
pub struct JsonlBatchWriter {
    dir: PathBuf,
    split: String,
}

impl JsonlBatchWriter {
    pub fn new(dir: impl Into<PathBuf>, split: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            split: split.into(),
        }
    }
}

impl BatchSink for JsonlBatchWriter {
    fn persist(&mut self, batch: usize, outcomes: &[OracleOutcome]) -> Result<()> {
        let path = self.dir.join(jsonl_batch_name(&self.split, batch));
        let mut out = create(&path)?;
        for outcome in outcomes {
            serde_json::to_writer(&mut out, outcome)?;
            writeln!(out)?;
        }
        out.flush()?;
        info!(path = %path.display(), rows = outcomes.len(), "wrote oracle batch");
        Ok(())
    }
}

/// Parse a legacy summaries file into one space-joined summary per document.
pub fn read_legacy_summaries(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)?;
    let mut summaries = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line == DOCUMENT_SEPARATOR {
            summaries.push(current.join(" "));
            current.clear();
        } else if !line.is_empty() {
            current.push(line);
        }
    }
    if !current.is_empty() {
        warn!(path = %path.display(), "trailing summary without separator");
        summaries.push(current.join(" "));
    }
    Ok(summaries)
}

/// Parse label lines; blank lines are ignored.
pub fn read_label_lines(path: &Path) -> Result<Vec<Vec<u8>>> {
    let text = fs::read_to_string(path)?;
    let mut documents = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let labels = line
            .split_whitespace()
            .map(|token| match token {
                "0" => Ok(0),
                "1" => Ok(1),
                other => Err(OracleError::InvalidLabel {
                    path: path.to_path_buf(),
                    line: line_no + 1,
                    token: other.to_string(),
                }),
            })
            .collect::<Result<Vec<u8>>>()?;
        documents.push(labels);
    }
    Ok(documents)
}

/// Batch numbers of files in `dir` named `{prefix}{n}{extension}`.
fn batch_numbers(dir: &Path, prefix: &str, extension: &str) -> Result<Vec<usize>> {
    let mut batches = Vec::new();
    for entry in fs::read_dir(dir)? {
        let name = entry?.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if let Some(batch) = name
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_suffix(extension))
            .and_then(|number| number.parse().ok())
        {
            batches.push(batch);
        }
    }
    batches.sort_unstable();
    Ok(batches)
}

/// Remove every batch file of `split` in `dir`, in either layout.
///
/// Runs before a fresh oracle run so a smaller batch count cannot leave
/// higher-numbered files from an earlier run behind. Returns the number of
/// files removed.
pub fn clear_batches(dir: &Path, split: &str) -> Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }
    let layouts: [(String, &str, fn(&str, usize) -> String); 3] = [
        (format!("{split}-oracle_summaries_batch_"), ".txt", summaries_batch_name),
        (format!("{split}-oracle_labels_batch_"), ".txt", labels_batch_name),
        (format!("{split}-oracle_batch_"), ".jsonl", jsonl_batch_name),
    ];
    let mut removed = 0;
    for (prefix, extension, name) in &layouts {
        for batch in batch_numbers(dir, prefix, extension)? {
            fs::remove_file(dir.join(name(split, batch)))?;
            removed += 1;
        }
    }
    if removed > 0 {
        info!(split, removed, dir = %dir.display(), "removed stale oracle batches");
    }
    Ok(removed)
}

/// Concatenate every legacy batch of `split` in `dir`, in batch order.
///
/// Batches must be numbered `0..n` with no gaps, and every summaries file
/// needs its labels file. Returns the number of batches merged.
pub fn merge_batches(dir: &Path, split: &str) -> Result<usize> {
    let batches = batch_numbers(dir, &format!("{split}-oracle_summaries_batch_"), ".txt")?;
    let labelled = batch_numbers(dir, &format!("{split}-oracle_labels_batch_"), ".txt")?;
    let contiguous = batches.iter().enumerate().all(|(i, &batch)| i == batch);
    if !contiguous || labelled != batches {
        return Err(OracleError::MissingBatches {
            split: split.to_string(),
            count: batches.len().max(labelled.len()),
            found: batches,
        });
    }

    let summaries_path = dir.join(merged_summaries_name(split));
    let labels_path = dir.join(merged_labels_name(split));
    let mut summaries = create(&summaries_path)?;
    let mut labels = create(&labels_path)?;
    for &batch in &batches {
        append(&mut summaries, &dir.join(summaries_batch_name(split, batch)))?;
        append(&mut labels, &dir.join(labels_batch_name(split, batch)))?;
    }
    summaries.flush()?;
    labels.flush()?;

    info!(
        batches = batches.len(),
        summaries = %summaries_path.display(),
        labels = %labels_path.display(),
        "merged oracle batches"
    );
    Ok(batches.len())
}

fn append(out: &mut impl Write, path: &Path) -> Result<()> {
    let text = fs::read_to_string(path)?;
    out.write_all(text.as_bytes())?;
    if !text.is_empty() && !text.ends_with('\n') {
        out.write_all(b"\n")?;
    }
    Ok(())
}
